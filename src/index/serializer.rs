//! State serialization
//!
//! Converts the trie and its document tables to a portable value tree and
//! back. The tree is plain serde data: `serde_json` renders it as a
//! JSON-compatible document, `bincode` as a compact blob for storage
//! backends. Rebuilding validates the input; malformed state is rejected
//! rather than silently accepted.

use crate::error::{IndexError, Result};
use crate::index::node::TrieNode;
use crate::types::{Document, Relation, Timestamp};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One trie node in portable form. Children are a sorted map so equal
/// tries serialize identically; depth, frequency, and access time are
/// recomputed on rebuild.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedNode {
    pub prefix_count: u32,
    pub is_end_of_word: bool,
    /// `(doc_id, insertion_count)` pairs, sorted by id
    pub document_refs: Vec<(String, u32)>,
    pub weight: f64,
    pub children: BTreeMap<char, SerializedNode>,
}

/// Complete portable index state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedState {
    pub trie: SerializedNode,
    /// `(id, document)` pairs, sorted by id
    pub documents: Vec<(String, Document)>,
    /// `(id, relations)` pairs, sorted by id
    pub document_links: Vec<(String, Vec<Relation>)>,
    pub total_documents: usize,
    pub max_word_length: usize,
}

impl SerializedState {
    /// Encode as a compact binary blob for a state store.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a blob produced by [`to_bytes`](Self::to_bytes). A blob
    /// that does not parse is malformed state, not an I/O failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes)
            .map_err(|e| IndexError::Validation(format!("malformed state blob: {e}")))
    }

    /// Render as a JSON value tree.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Parse from a JSON value tree.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| IndexError::Validation(format!("malformed state tree: {e}")))
    }
}

/// Snapshot a live node into portable form.
pub(crate) fn snapshot_node(node: &TrieNode) -> SerializedNode {
    let mut document_refs: Vec<(String, u32)> = node
        .document_refs
        .iter()
        .map(|(id, count)| (id.clone(), *count))
        .collect();
    document_refs.sort();

    let children = node
        .children
        .iter()
        .map(|(&c, child)| (c, snapshot_node(child)))
        .collect();

    SerializedNode {
        prefix_count: node.prefix_count,
        is_end_of_word: node.is_end_of_word,
        document_refs,
        weight: node.weight,
        children,
    }
}

/// Rebuild a live node at `depth`, validating every stored invariant.
///
/// Frequency is not persisted; it is restored from the weight, which each
/// terminating insertion advanced in unit steps alongside it.
pub(crate) fn rebuild_node(
    stored: &SerializedNode,
    depth: u32,
    now: Timestamp,
) -> Result<TrieNode> {
    if !stored.weight.is_finite() || stored.weight < 0.0 {
        return Err(IndexError::Validation(format!(
            "node at depth {depth} has invalid weight {}",
            stored.weight
        )));
    }
    if !stored.document_refs.is_empty() && !stored.is_end_of_word {
        return Err(IndexError::Validation(format!(
            "node at depth {depth} has document refs but is not end-of-word"
        )));
    }

    let mut document_refs = AHashMap::with_capacity(stored.document_refs.len());
    for (id, count) in &stored.document_refs {
        if id.is_empty() || *count == 0 {
            return Err(IndexError::Validation(format!(
                "node at depth {depth} has invalid document ref ({id:?}, {count})"
            )));
        }
        if document_refs.insert(id.clone(), *count).is_some() {
            return Err(IndexError::Validation(format!(
                "node at depth {depth} repeats document ref {id:?}"
            )));
        }
    }

    let mut children = AHashMap::with_capacity(stored.children.len());
    for (&c, stored_child) in &stored.children {
        children.insert(c, rebuild_node(stored_child, depth + 1, now)?);
    }

    Ok(TrieNode {
        children,
        is_end_of_word: stored.is_end_of_word,
        document_refs,
        weight: stored.weight,
        frequency: stored.weight.round().clamp(0.0, f64::from(u32::MAX)) as u32,
        prefix_count: stored.prefix_count,
        depth,
        last_accessed: now,
    })
}
