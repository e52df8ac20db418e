//! Relevance scoring
//!
//! All scores derive from node statistics: weight, termination frequency,
//! depth, recency of access, plus corpus-level document counts. Every
//! computation is guarded: a non-finite result short-circuits to the raw
//! node weight so callers never observe NaN.

use crate::index::node::TrieNode;
use crate::types::{Document, Timestamp};

/// Recency decay constant for node scores: one day in milliseconds.
const RECENCY_DECAY_MS: f64 = 86_400_000.0;

/// Floor of the freshness blend; stale documents keep 70% of their score.
const FRESHNESS_FLOOR: f64 = 0.7;

fn guard(score: f64, fallback: f64) -> f64 {
    if score.is_finite() {
        score
    } else {
        fallback
    }
}

/// Intrinsic score of a node, independent of any query or document:
/// weight, log-damped frequency, exponential recency decay, and depth
/// damping.
pub(crate) fn node_base_score(node: &TrieNode, now: Timestamp) -> f64 {
    let age_ms = now.millis_since(node.last_accessed) as f64;
    let score = node.weight
        * (1.0 + (1.0 + f64::from(node.frequency)).ln())
        * (-age_ms / RECENCY_DECAY_MS).exp()
        / (f64::from(node.depth) + 1.0);
    guard(score, node.weight)
}

/// Score of an exact or prefix match for one referencing document.
///
/// `doc_tf` is the number of insertions the document contributed to this
/// term (1 for ids registered through bare `insert`). Falls back to the
/// raw node weight when the corpus is empty or the node has no references,
/// where tf-idf is undefined.
pub(crate) fn term_score(
    node: &TrieNode,
    term_len: usize,
    doc_tf: u32,
    total_documents: usize,
    now: Timestamp,
) -> f64 {
    let df = node.document_refs.len();
    if total_documents == 0 || df == 0 {
        return node.weight;
    }

    let base = node_base_score(node, now);
    let idf = (1.0 + total_documents as f64 / df as f64).ln();
    let len_norm = 1.0 / (term_len.max(1) as f64).sqrt();
    let score = base * (1.0 + f64::from(doc_tf) * idf) * len_norm;
    guard(score, node.weight)
}

/// Fuzzy matches decay exponentially with edit distance. Distance zero
/// still pays a nominal 0.001 so fuzzy hits rank below exact ones.
pub(crate) fn fuzzy_score(exact: f64, distance: u32) -> f64 {
    exact * (-f64::from(distance).max(0.001)).exp()
}

/// Blend a match score with document freshness: linear decay from 1.0 at
/// age zero to the 0.7 floor at `max_age_days` and beyond.
pub(crate) fn freshness_adjusted(
    score: f64,
    document: &Document,
    max_age_days: f64,
    now: Timestamp,
) -> f64 {
    let age_days = now.days_since(document.metadata.last_modified);
    let recency = (1.0 - age_days / max_age_days).max(0.0);
    let adjusted = score * (FRESHNESS_FLOOR + (1.0 - FRESHNESS_FLOOR) * guard(recency, 0.0));
    guard(adjusted, score)
}
