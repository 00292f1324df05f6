//! Untyped document model and the YAML/JSON codec around it.
//!
//! A decoded configuration is a closed tree of [`Document`] values. Only
//! [`Document::String`] leaves are ever candidates for secret substitution;
//! the other scalar variants exist so numbers, booleans and nulls survive a
//! decode/encode round-trip unchanged.

use super::error::ResolveError;
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Number, Value};
use std::path::Path;

/// A decoded configuration document.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Sequence(Vec<Document>),
    /// Key/value pairs in decoded order. Keys are unique and may be any
    /// document, not just strings.
    Mapping(Vec<(Document, Document)>),
    Tagged(Box<TaggedDocument>),
}

/// A value carrying an explicit YAML tag, e.g. `!vault ENC[db]`.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedDocument {
    pub tag: Tag,
    pub value: Document,
}

impl Document {
    /// Returns the string content if this is a string scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Document::String(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a mapping value by string key.
    pub fn get(&self, key: &str) -> Option<&Document> {
        match self {
            Document::Mapping(entries) => entries
                .iter()
                .find(|(k, _)| k.as_str() == Some(key))
                .map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns the element at `index` if this is a sequence.
    pub fn index(&self, index: usize) -> Option<&Document> {
        match self {
            Document::Sequence(items) => items.get(index),
            _ => None,
        }
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Document::Null,
            Value::Bool(b) => Document::Bool(b),
            Value::Number(n) => Document::Number(n),
            Value::String(s) => Document::String(s),
            Value::Sequence(items) => {
                Document::Sequence(items.into_iter().map(Document::from).collect())
            }
            Value::Mapping(map) => Document::Mapping(
                map.into_iter()
                    .map(|(k, v)| (Document::from(k), Document::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => {
                let TaggedValue { tag, value } = *tagged;
                Document::Tagged(Box::new(TaggedDocument {
                    tag,
                    value: Document::from(value),
                }))
            }
        }
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        match doc {
            Document::Null => Value::Null,
            Document::Bool(b) => Value::Bool(b),
            Document::Number(n) => Value::Number(n),
            Document::String(s) => Value::String(s),
            Document::Sequence(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            Document::Mapping(entries) => Value::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| (Value::from(k), Value::from(v)))
                    .collect::<Mapping>(),
            ),
            Document::Tagged(tagged) => {
                let TaggedDocument { tag, value } = *tagged;
                Value::Tagged(Box::new(TaggedValue {
                    tag,
                    value: Value::from(value),
                }))
            }
        }
    }
}

/// Serialization format of a document on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DocumentFormat {
    #[default]
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Picks the format from a file extension; anything but `.json` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Decode raw bytes into a [`Document`]. Blank input decodes to `Null`.
pub fn decode(bytes: &[u8], format: DocumentFormat) -> Result<Document, ResolveError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Document::Null);
    }

    let value: Value = match format {
        DocumentFormat::Yaml => {
            serde_yaml::from_slice(bytes).map_err(|e| ResolveError::Decode(e.to_string()))?
        }
        DocumentFormat::Json => {
            serde_json::from_slice(bytes).map_err(|e| ResolveError::Decode(e.to_string()))?
        }
    };

    Ok(Document::from(value))
}

/// Encode a [`Document`] back into bytes of the given format.
pub fn encode(doc: &Document, format: DocumentFormat) -> Result<Vec<u8>, ResolveError> {
    let value = Value::from(doc.clone());

    match format {
        DocumentFormat::Yaml => serde_yaml::to_string(&value)
            .map(String::into_bytes)
            .map_err(|e| ResolveError::Encode(e.to_string())),
        DocumentFormat::Json => {
            let mut out =
                serde_json::to_vec_pretty(&value).map_err(|e| ResolveError::Encode(e.to_string()))?;
            out.push(b'\n');
            Ok(out)
        }
    }
}
