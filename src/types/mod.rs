//! Core value types shared across the index

pub mod document;
pub mod timestamp;

pub use document::{Document, DocumentMetadata, FieldValue, Relation};
pub use timestamp::Timestamp;
