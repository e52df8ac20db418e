//! Storage layer
//!
//! The narrow key→bytes contract the index persists through, plus the
//! bundled backends. The index never assumes durability ordering beyond
//! per-operation completion; a failed call leaves in-memory state
//! untouched.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Minimal key→value store for serialized index state.
///
/// Keys are opaque strings, values opaque byte blobs. Implementations
/// decide placement, durability, and encoding of their own framing.
pub trait StateStore: Send + Sync {
    /// Prepare the backend for use (create directories, open handles).
    fn initialize(&self) -> Result<()>;

    /// Persist `value` under `key`, replacing any prior value.
    fn store(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Fetch the value under `key`, or `None` when absent.
    fn retrieve(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Drop every stored key.
    fn clear(&self) -> Result<()>;

    /// Release resources. Further calls may fail.
    fn close(&self) -> Result<()>;
}
