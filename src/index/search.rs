//! Trie search façade
//!
//! [`TrieSearch`] owns the trie, the document table, and the link table,
//! and exposes the full query surface: exact lookup, prefix completion,
//! bounded-edit fuzzy search, autocomplete suggestions, removal with
//! pruning, and state snapshot/restore through a [`StateStore`].
//!
//! Design point: the index is single-writer / many-reader with external
//! coordination. Mutating calls take `&mut self`; query calls are pure
//! reads and may run concurrently among themselves.

use crate::config::IndexConfig;
use crate::error::{IndexError, Result};
use crate::index::fuzzy::collect_fuzzy_matches;
use crate::index::node::TrieNode;
use crate::index::scorer::{freshness_adjusted, fuzzy_score, node_base_score, term_score};
use crate::index::serializer::{rebuild_node, snapshot_node, SerializedState};
use crate::index::tokenizer::{DelimiterTokenizer, Tokenizer};
use crate::storage::StateStore;
use crate::types::{Document, Relation, Timestamp};
use ahash::{AHashMap, AHashSet};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Default number of autocomplete suggestions.
pub const DEFAULT_MAX_SUGGESTIONS: usize = 5;

/// Knobs for [`TrieSearch::search`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Use bounded-edit-distance matching
    pub fuzzy: bool,
    /// Edit-distance bound when `fuzzy` is set
    pub max_distance: u32,
    /// Treat each query token as a prefix
    pub prefix_match: bool,
    /// Truncate the final ranked list
    pub max_results: usize,
    /// Discard matches scoring below this
    pub min_score: f64,
    /// Disable case folding during query tokenization
    pub case_sensitive: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            fuzzy: false,
            max_distance: 2,
            prefix_match: false,
            max_results: 10,
            min_score: 0.1,
            case_sensitive: false,
        }
    }
}

/// One ranked match.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Identifier of the matched document
    pub doc_id: String,
    /// Relevance score, higher is better
    pub score: f64,
    /// The stored term that matched
    pub term: String,
    /// The stored document, when the id is in the document table
    pub document: Option<Document>,
    /// Matched terms (one entry per contributing query token)
    pub matches: Vec<String>,
    /// Edit distance; present only for fuzzy matches
    pub distance: Option<u32>,
}

/// Aggregate statistics over the index.
#[derive(Debug, Clone)]
pub struct IndexStats {
    pub total_documents: usize,
    pub unique_terms: usize,
    pub node_count: usize,
}

/// Weighted character-trie full-text index.
pub struct TrieSearch {
    root: TrieNode,
    documents: AHashMap<String, Document>,
    document_links: AHashMap<String, Vec<Relation>>,
    total_documents: usize,
    config: IndexConfig,
}

impl Default for TrieSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl TrieSearch {
    /// Create an empty index with default configuration.
    pub fn new() -> Self {
        Self::with_config(IndexConfig::default())
    }

    /// Create an empty index with a custom term-length capacity bound.
    pub fn with_max_word_length(max_word_length: usize) -> Self {
        Self::with_config(IndexConfig::with_max_word_length(max_word_length))
    }

    /// Create an empty index with the given configuration.
    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            root: TrieNode::root(),
            documents: AHashMap::new(),
            document_links: AHashMap::new(),
            total_documents: 0,
            config,
        }
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Look up a stored document by id.
    pub fn get_document(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    /// Relations recorded for a document, if any.
    pub fn relations(&self, id: &str) -> Option<&[Relation]> {
        self.document_links.get(id).map(Vec::as_slice)
    }

    /// Aggregate index statistics, computed by trie walk.
    pub fn stats(&self) -> IndexStats {
        let mut node_count = 0;
        let mut unique_terms = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            node_count += 1;
            if node.is_end_of_word {
                unique_terms += 1;
            }
            stack.extend(node.children.values());
        }
        IndexStats {
            total_documents: self.total_documents,
            unique_terms,
            node_count,
        }
    }

    // ------------------------------------------------------------------
    // Ingest
    // ------------------------------------------------------------------

    /// Index one term for `doc_id`. Terms are normalized (lowercased) at
    /// index time. Terms longer than the configured capacity bound are
    /// skipped without error.
    pub fn insert(&mut self, word: &str, doc_id: &str) {
        let word = word.to_lowercase();
        let length = word.chars().count();
        if length == 0 {
            return;
        }
        if length > self.config.max_word_length {
            debug!(
                word = %word,
                limit = self.config.max_word_length,
                "term exceeds capacity bound, skipped"
            );
            return;
        }

        self.root.prefix_count = self.root.prefix_count.saturating_add(1);
        let mut node = &mut self.root;
        for c in word.chars() {
            node = node.child_or_insert(c);
            node.prefix_count = node.prefix_count.saturating_add(1);
        }
        node.is_end_of_word = true;
        node.add_ref(doc_id);
        node.increment_weight(1.0);
    }

    /// Store and index a document. Invalid documents (empty id or no
    /// fields) are logged and ignored. Re-adding an existing id replaces
    /// the stored document and re-indexes it from scratch; the original
    /// `indexed` timestamp survives the replacement and `last_modified`
    /// is refreshed.
    pub fn add_document(&mut self, mut document: Document) {
        if !document.is_valid() {
            warn!(id = %document.id, "rejected document without id or fields");
            return;
        }

        let id = document.id.clone();
        if let Some(previous) = self.documents.get(&id) {
            document.metadata.indexed = previous.metadata.indexed;
            document.touch();
            self.unindex(&id);
        } else {
            self.total_documents += 1;
        }

        // One insertion per unique token per field value
        let tokenizer = DelimiterTokenizer::default();
        let mut terms: Vec<String> = Vec::new();
        for value in document.fields.values() {
            let texts: Vec<&str> = match value {
                crate::types::FieldValue::Text(s) => vec![s.as_str()],
                crate::types::FieldValue::List(items) => {
                    items.iter().map(String::as_str).collect()
                }
                crate::types::FieldValue::Content { text } => vec![text.as_str()],
            };

            let mut seen = AHashSet::new();
            for text in texts {
                for token in tokenizer.tokenize(text) {
                    if seen.insert(token.clone()) {
                        terms.push(token);
                    }
                }
            }
        }
        for term in &terms {
            self.insert(term, &id);
        }

        self.document_links.insert(id.clone(), document.relations.clone());
        self.documents.insert(id, document);
    }

    /// Remove a document: scrub its references from every node, rebalance
    /// weights and prefix counts along the affected paths, prune subtrees
    /// that no longer contribute, and drop the table entries. Returns
    /// whether a stored document was removed. The trie scrub also covers
    /// ids registered through bare [`insert`](Self::insert).
    pub fn remove_document(&mut self, id: &str) -> bool {
        if scrub_node(&mut self.root, id) > 0 {
            prune_children(&mut self.root);
        }

        let existed = self.documents.remove(id).is_some();
        self.document_links.remove(id);
        if existed {
            self.total_documents -= 1;
        }
        existed
    }

    /// Scrub a document's trie contributions without touching the tables.
    fn unindex(&mut self, id: &str) {
        if scrub_node(&mut self.root, id) > 0 {
            prune_children(&mut self.root);
        }
    }

    /// Drop everything: trie, documents, links.
    pub fn clear(&mut self) {
        self.root = TrieNode::root();
        self.documents.clear();
        self.document_links.clear();
        self.total_documents = 0;
    }

    // ------------------------------------------------------------------
    // Query
    // ------------------------------------------------------------------

    /// Run a query. Each token retrieves exact, prefix, or fuzzy matches
    /// per the options (`fuzzy` takes precedence over `prefix_match`);
    /// results merge across tokens keeping the best score per document,
    /// then filter by `min_score`, sort by score descending (docId
    /// ascending on ties), and truncate to `max_results`.
    pub fn search(&self, query: &str, options: &SearchOptions) -> Vec<SearchResult> {
        let tokens = DelimiterTokenizer::new(options.case_sensitive).tokenize(query);
        if tokens.is_empty() {
            return Vec::new();
        }

        let now = Timestamp::now();
        let mut best: AHashMap<String, SearchResult> = AHashMap::new();
        for token in &tokens {
            let matches = if options.fuzzy {
                self.fuzzy_matches(token, options.max_distance, now)
            } else if options.prefix_match {
                self.prefix_matches(token, now)
            } else {
                self.exact_matches(token, now)
            };
            merge_best(&mut best, matches);
        }

        let mut results: Vec<SearchResult> = best
            .into_values()
            .filter(|r| r.score >= options.min_score)
            .collect();
        sort_ranked(&mut results);
        results.truncate(options.max_results);
        results
    }

    /// Direct fuzzy lookup of a single word: every stored term within
    /// `max_distance` edits, one best-scoring result per document, sorted
    /// by score. Unlike [`search`](Self::search), applies no score floor
    /// and no truncation.
    pub fn fuzzy_search(&self, word: &str, max_distance: u32) -> Vec<SearchResult> {
        let normalized = word.to_lowercase();
        let now = Timestamp::now();
        let mut best: AHashMap<String, SearchResult> = AHashMap::new();
        merge_best(&mut best, self.fuzzy_matches(&normalized, max_distance, now));

        let mut results: Vec<SearchResult> = best.into_values().collect();
        sort_ranked(&mut results);
        results
    }

    /// Autocomplete: the top `max_results` stored words under `prefix`,
    /// ranked by node base score (ties broken alphabetically).
    pub fn get_suggestions(&self, prefix: &str, max_results: usize) -> Vec<String> {
        let normalized = prefix.to_lowercase();
        let Some(start) = self.walk(&normalized) else {
            return Vec::new();
        };

        let now = Timestamp::now();
        let mut scored: Vec<(String, f64)> = collect_words(start, &normalized)
            .into_iter()
            .map(|(word, node)| {
                let score = node_base_score(node, now);
                (word, score)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored.truncate(max_results);
        scored.into_iter().map(|(word, _)| word).collect()
    }

    fn walk(&self, term: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for c in term.chars() {
            node = node.child(c)?;
        }
        Some(node)
    }

    fn exact_matches(&self, term: &str, now: Timestamp) -> Vec<SearchResult> {
        match self.walk(term) {
            Some(node) if node.is_end_of_word => self.emit(node, term, None, now),
            _ => Vec::new(),
        }
    }

    fn prefix_matches(&self, prefix: &str, now: Timestamp) -> Vec<SearchResult> {
        let Some(start) = self.walk(prefix) else {
            return Vec::new();
        };
        collect_words(start, prefix)
            .into_iter()
            .flat_map(|(word, node)| self.emit(node, &word, None, now))
            .collect()
    }

    fn fuzzy_matches(&self, word: &str, max_distance: u32, now: Timestamp) -> Vec<SearchResult> {
        collect_fuzzy_matches(&self.root, word, max_distance)
            .into_iter()
            .filter_map(|(term, distance)| {
                self.walk(&term).map(|node| self.emit(node, &term, Some(distance), now))
            })
            .flatten()
            .collect()
    }

    /// One result per referencing document of a matched node.
    fn emit(
        &self,
        node: &TrieNode,
        term: &str,
        distance: Option<u32>,
        now: Timestamp,
    ) -> Vec<SearchResult> {
        let term_len = term.chars().count();
        node.document_refs
            .iter()
            .map(|(doc_id, &doc_tf)| {
                let mut score = term_score(node, term_len, doc_tf, self.total_documents, now);
                if let Some(d) = distance {
                    score = fuzzy_score(score, d);
                }
                let document = self.documents.get(doc_id).cloned();
                if let Some(doc) = &document {
                    score = freshness_adjusted(score, doc, self.config.max_age_days, now);
                }
                SearchResult {
                    doc_id: doc_id.clone(),
                    score,
                    term: term.to_string(),
                    document,
                    matches: vec![term.to_string()],
                    distance,
                }
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Snapshot the index as a portable value tree.
    pub fn serialize_state(&self) -> SerializedState {
        let mut documents: Vec<(String, Document)> = self
            .documents
            .iter()
            .map(|(id, doc)| (id.clone(), doc.clone()))
            .collect();
        documents.sort_by(|a, b| a.0.cmp(&b.0));

        let mut document_links: Vec<(String, Vec<Relation>)> = self
            .document_links
            .iter()
            .map(|(id, links)| (id.clone(), links.clone()))
            .collect();
        document_links.sort_by(|a, b| a.0.cmp(&b.0));

        SerializedState {
            trie: snapshot_node(&self.root),
            documents,
            document_links,
            total_documents: self.total_documents,
            max_word_length: self.config.max_word_length,
        }
    }

    /// Replace this index with a deserialized snapshot. The input is
    /// validated first; on any error the in-memory index is left
    /// untouched. The document counter is recomputed from the document
    /// table rather than trusted from the snapshot.
    pub fn deserialize_state(&mut self, state: &SerializedState) -> Result<()> {
        let now = Timestamp::now();
        let root = rebuild_node(&state.trie, 0, now)?;

        let mut documents = AHashMap::with_capacity(state.documents.len());
        for (id, document) in &state.documents {
            if id.is_empty() {
                return Err(IndexError::Validation("document with empty id".to_string()));
            }
            if documents.insert(id.clone(), document.clone()).is_some() {
                return Err(IndexError::Validation(format!(
                    "duplicate document id {id:?}"
                )));
            }
        }

        let mut document_links = AHashMap::with_capacity(state.document_links.len());
        for (id, links) in &state.document_links {
            if document_links.insert(id.clone(), links.clone()).is_some() {
                return Err(IndexError::Validation(format!(
                    "duplicate link entry for {id:?}"
                )));
            }
        }

        self.total_documents = documents.len();
        self.root = root;
        self.documents = documents;
        self.document_links = document_links;
        self.config.max_word_length = state.max_word_length;
        Ok(())
    }

    /// Serialize and persist the index under `key`.
    pub fn save_state(&self, store: &dyn StateStore, key: &str) -> Result<()> {
        let bytes = self.serialize_state().to_bytes()?;
        store.store(key, &bytes)
    }

    /// Load and adopt persisted state from `key`. Returns `Ok(false)`
    /// when the key holds nothing, leaving the index untouched.
    pub fn load_state(&mut self, store: &dyn StateStore, key: &str) -> Result<bool> {
        match store.retrieve(key)? {
            Some(bytes) => {
                let state = SerializedState::from_bytes(&bytes)?;
                self.deserialize_state(&state)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Remove `id` from every node of the subtree. Returns the number of
/// insertions removed beneath (and at) this node; the node's prefix
/// count drops by exactly that many, so counts stay consistent along
/// every affected path.
fn scrub_node(node: &mut TrieNode, id: &str) -> u32 {
    let mut removed = 0;
    if let Some(count) = node.remove_ref(id) {
        for _ in 0..count {
            node.decrement_weight(1.0);
        }
        removed += count;
    }
    for child in node.children.values_mut() {
        removed += scrub_node(child, id);
    }
    if removed > 0 {
        node.prefix_count = node.prefix_count.saturating_sub(removed);
    }
    removed
}

/// Post-order prune sweep: drop children whose subtrees no longer hold
/// any term, reference, weight, or frequency.
fn prune_children(node: &mut TrieNode) {
    for child in node.children.values_mut() {
        prune_children(child);
    }
    node.children.retain(|_, child| !child.is_prunable());
}

/// Collect every stored word at or below `start`, paired with its
/// terminal node. Explicit work list: traversal depth is bounded by the
/// configured word length, but no stack frame rides on it.
fn collect_words<'a>(start: &'a TrieNode, prefix: &str) -> Vec<(String, &'a TrieNode)> {
    let mut found = Vec::new();
    let mut stack = vec![(prefix.to_string(), start)];
    while let Some((word, node)) = stack.pop() {
        if node.is_end_of_word {
            found.push((word.clone(), node));
        }
        for (&c, child) in &node.children {
            let mut next = word.clone();
            next.push(c);
            stack.push((next, child));
        }
    }
    found
}

fn merge_best(best: &mut AHashMap<String, SearchResult>, matches: Vec<SearchResult>) {
    for result in matches {
        let keep = best
            .get(&result.doc_id)
            .map_or(true, |current| result.score > current.score);
        if keep {
            best.insert(result.doc_id.clone(), result);
        }
    }
}

/// Score descending; equal scores order by ascending docId so rankings
/// are deterministic.
fn sort_ranked(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.doc_id.cmp(&b.doc_id))
    });
}
