//! Lexitrie Search Engine
//!
//! In-memory full-text search index built on a weighted character trie.
//! Documents with typed fields are tokenized and indexed per term; queries
//! answer three shapes — exact lookup, prefix completion, and bounded-edit
//! fuzzy matching — as ranked `(document, score)` lists.
//!
//! ## Architecture
//! - Index layer: weighted trie + tokenizer + scorer + fuzzy matcher
//! - Façade: [`TrieSearch`] owning the trie and document tables
//! - Persistence: portable serialized state through a narrow
//!   key→bytes [`StateStore`] contract (memory and file backends bundled)
//!
//! The index is single-writer / many-reader with external coordination;
//! it takes no internal locks and exposes no references into the trie.

pub mod config;
pub mod index;
pub mod storage;
pub mod types;

mod error;

pub use config::IndexConfig;
pub use error::{IndexError, Result};

// Primary API surface
pub use index::{
    DelimiterTokenizer, IndexStats, SearchOptions, SearchResult, SerializedNode,
    SerializedState, Tokenizer, TrieSearch, DEFAULT_MAX_SUGGESTIONS,
};
pub use storage::{FileStore, MemoryStore, StateStore};
pub use types::{Document, DocumentMetadata, FieldValue, Relation, Timestamp};
