//! Document value types
//!
//! A [`Document`] is the unit of ingestion: an identifier plus a map of
//! typed fields. Field values are a closed variant set so the indexer can
//! dispatch on the tag instead of sniffing dynamic types.

use crate::types::Timestamp;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// A typed field value inside a document.
///
/// Externally tagged with lowercase tags (`text`, `list`, `content`) so
/// the value tree round-trips through both the JSON and the binary
/// encodings of serialized state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldValue {
    /// Plain text field (`title`, `author`, `version`, ...)
    Text(String),

    /// Ordered sequence of strings (`tags`, ...); flattened one level when indexed
    List(Vec<String>),

    /// Structured content object contributing its `text` body
    Content { text: String },
}

impl FieldValue {
    /// Plain text field value
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    /// Sequence-of-strings field value
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }

    /// Content-object field value
    pub fn content(text: impl Into<String>) -> Self {
        FieldValue::Content { text: text.into() }
    }
}

/// A directed relation between two documents.
///
/// Relations are opaque payload data: the index stores and returns them but
/// never traverses them, so cycles are harmless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub weight: Option<f64>,
}

/// Indexing timestamps attached to every stored document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// When the document was first handed to the index
    pub indexed: Timestamp,
    /// Last replacement time; drives the freshness component of scoring
    pub last_modified: Timestamp,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        let now = Timestamp::now();
        Self {
            indexed: now,
            last_modified: now,
        }
    }
}

/// The document value object consumed by the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Non-empty identifier; documents are keyed and replaced by it
    pub id: String,

    /// Field map; recognized keys are `title`, `content`, `author`,
    /// `tags`, and `version`, but any key is indexed by its value type
    pub fields: AHashMap<String, FieldValue>,

    #[serde(default)]
    pub metadata: DocumentMetadata,

    /// Prior version labels, oldest first
    #[serde(default)]
    pub versions: Vec<String>,

    /// Relations to other documents, kept as opaque data
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl Document {
    /// Create an empty document with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: AHashMap::new(),
            metadata: DocumentMetadata::default(),
            versions: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Add a field (builder style).
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Attach relations (builder style).
    pub fn with_relations(mut self, relations: Vec<Relation>) -> Self {
        self.relations = relations;
        self
    }

    /// A document is indexable iff it has an id and at least one field.
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty() && !self.fields.is_empty()
    }

    /// Refresh `last_modified` to now.
    pub fn touch(&mut self) {
        self.metadata.last_modified = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_builder() {
        let doc = Document::new("doc1")
            .with_field("title", FieldValue::text("JavaScript Programming"))
            .with_field("tags", FieldValue::list(["web", "js"]))
            .with_field("content", FieldValue::content("Learn JavaScript"));

        assert!(doc.is_valid());
        assert_eq!(doc.fields.len(), 3);
        assert_eq!(
            doc.fields.get("title"),
            Some(&FieldValue::Text("JavaScript Programming".to_string()))
        );
    }

    #[test]
    fn test_validity() {
        assert!(!Document::new("").is_valid());
        assert!(!Document::new("doc1").is_valid());
        assert!(Document::new("doc1")
            .with_field("title", FieldValue::text("x"))
            .is_valid());
    }

    #[test]
    fn test_field_value_tagged_shapes() {
        let text: FieldValue = serde_json::from_str("{\"text\": \"hello\"}").unwrap();
        assert_eq!(text, FieldValue::Text("hello".to_string()));

        let list: FieldValue = serde_json::from_str("{\"list\": [\"a\", \"b\"]}").unwrap();
        assert_eq!(list, FieldValue::list(["a", "b"]));

        let content: FieldValue =
            serde_json::from_str("{\"content\": {\"text\": \"body\"}}").unwrap();
        assert_eq!(content, FieldValue::content("body"));

        assert_eq!(
            serde_json::to_string(&text).unwrap(),
            "{\"text\":\"hello\"}"
        );
        assert_eq!(
            serde_json::to_string(&content).unwrap(),
            "{\"content\":{\"text\":\"body\"}}"
        );
    }

    #[test]
    fn test_field_value_binary_round_trip() {
        let values = vec![
            FieldValue::text("hello"),
            FieldValue::list(["a", "b"]),
            FieldValue::content("body"),
        ];
        let bytes = bincode::serialize(&values).unwrap();
        let back: Vec<FieldValue> = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn test_relation_weight_optional() {
        let rel: Relation =
            serde_json::from_str("{\"source\": \"a\", \"target\": \"b\"}").unwrap();
        assert_eq!(rel.weight, None);

        let weighted: Relation =
            serde_json::from_str("{\"source\": \"a\", \"target\": \"b\", \"weight\": 0.5}")
                .unwrap();
        assert_eq!(weighted.weight, Some(0.5));
    }
}
