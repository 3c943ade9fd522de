use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{QuillError, QuillResult};

/// Formatting attributes of an operation, in document key order.
pub type Attributes = Map<String, Value>;

/// A rich-text document: an ordered list of insert operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Delta {
    pub ops: Vec<Operation>,
}

/// One insert (text or embed) plus its formatting attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct Operation {
    /// `None` when the operation has no usable `insert`
    pub insert: Option<Insert>,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insert {
    Text(String),
    Embed(Embed),
}

/// A non-text insertion. Counts as one character of content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Embed {
    Image(String),
    Video(String),
    Formula(String),
    /// Embed with no recognized key; carries the first key seen (if any)
    Unknown(String),
}

/// Raw input accepted wherever a Delta is expected.
#[derive(Debug, Clone, Copy)]
pub enum DeltaInput<'a> {
    /// Persisted JSON text
    Json(&'a str),
    /// Already-decoded structured value
    Value(&'a Value),
    /// Already-parsed Delta
    Parsed(&'a Delta),
}

impl<'a> From<&'a str> for DeltaInput<'a> {
    fn from(raw: &'a str) -> Self {
        DeltaInput::Json(raw)
    }
}

impl<'a> From<&'a String> for DeltaInput<'a> {
    fn from(raw: &'a String) -> Self {
        DeltaInput::Json(raw.as_str())
    }
}

impl<'a> From<&'a Value> for DeltaInput<'a> {
    fn from(raw: &'a Value) -> Self {
        DeltaInput::Value(raw)
    }
}

impl<'a> From<&'a Delta> for DeltaInput<'a> {
    fn from(delta: &'a Delta) -> Self {
        DeltaInput::Parsed(delta)
    }
}

impl DeltaInput<'_> {
    /// True when there is no content at all to look at (blank text, null, `{}` or `[]`).
    pub fn is_empty(&self) -> bool {
        match self {
            DeltaInput::Json(raw) => raw.trim().is_empty(),
            DeltaInput::Value(value) => match value {
                Value::Null => true,
                Value::String(s) => s.is_empty(),
                Value::Array(a) => a.is_empty(),
                Value::Object(o) => o.is_empty(),
                _ => false,
            },
            DeltaInput::Parsed(_) => false,
        }
    }
}

/// Parse a Delta from JSON text or a structured value.
///
/// Only the document shape is checked here: `ops` must exist and be a sequence.
/// Individual operations are left to the validator and renderer.
pub fn parse_delta<'a>(raw: impl Into<DeltaInput<'a>>) -> QuillResult<Delta> {
    match raw.into() {
        DeltaInput::Json(text) => {
            let value: Value = serde_json::from_str(text)?;
            Delta::from_value(&value)
        }
        DeltaInput::Value(value) => Delta::from_value(value),
        DeltaInput::Parsed(delta) => Ok(delta.clone()),
    }
}

impl Delta {
    pub fn new(ops: Vec<Operation>) -> Self {
        Self { ops }
    }

    /// Build a Delta from a decoded JSON value.
    pub fn from_value(value: &Value) -> QuillResult<Self> {
        let ops = value
            .get("ops")
            .and_then(Value::as_array)
            .ok_or(QuillError::MissingOps)?;
        Ok(Self {
            ops: ops.iter().map(Operation::from_value).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// True for the two canonical empty documents: no ops, or a single `"\n"` insert.
    pub fn is_blank(&self) -> bool {
        match self.ops.as_slice() {
            [] => true,
            [only] => matches!(&only.insert, Some(Insert::Text(text)) if text == "\n"),
            _ => false,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.ops.iter()
    }

    pub fn to_value(&self) -> Value {
        let ops = self.ops.iter().map(Operation::to_value).collect();
        let mut root = Map::new();
        root.insert("ops".to_string(), Value::Array(ops));
        Value::Object(root)
    }

    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

impl<'a> IntoIterator for &'a Delta {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}

impl TryFrom<Value> for Delta {
    type Error = QuillError;

    fn try_from(value: Value) -> QuillResult<Self> {
        Delta::from_value(&value)
    }
}

impl From<Delta> for Value {
    fn from(delta: Delta) -> Self {
        delta.to_value()
    }
}

impl Operation {
    /// Plain text insert with no attributes.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            insert: Some(Insert::Text(text.into())),
            attributes: Attributes::new(),
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            insert: Some(Insert::Embed(embed)),
            attributes: Attributes::new(),
        }
    }

    /// Attach an attribute, builder style.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        if !value.is_null() {
            self.attributes.insert(key.into(), value);
        }
        self
    }

    /// Read one operation leniently. Anything unusable becomes a missing insert
    /// rather than an error; callers decide how strict to be.
    pub fn from_value(value: &Value) -> Self {
        let insert = match value.get("insert") {
            Some(Value::String(text)) => Some(Insert::Text(text.clone())),
            Some(Value::Object(map)) => Some(Insert::Embed(Embed::from_map(map))),
            _ => None,
        };
        let attributes = value
            .get("attributes")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        Self { insert, attributes }
    }

    pub fn to_value(&self) -> Value {
        let mut op = Map::new();
        match &self.insert {
            Some(Insert::Text(text)) => {
                op.insert("insert".to_string(), Value::String(text.clone()));
            }
            Some(Insert::Embed(embed)) => {
                op.insert("insert".to_string(), embed.to_value());
            }
            None => {}
        }
        if !self.attributes.is_empty() {
            op.insert("attributes".to_string(), Value::Object(self.attributes.clone()));
        }
        Value::Object(op)
    }

    /// Attribute value for rendering; a `null` value reads as absent.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key).filter(|v| !v.is_null())
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attribute(key).is_some()
    }

    /// Every attribute key as written, `null`-valued ones included.
    pub fn attribute_keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Attribute value as display text (strings as-is, numbers and booleans formatted).
    pub fn attribute_text(&self, key: &str) -> Option<String> {
        self.attribute(key).and_then(scalar_text)
    }
}

impl From<Value> for Operation {
    fn from(value: Value) -> Self {
        Operation::from_value(&value)
    }
}

impl From<Operation> for Value {
    fn from(op: Operation) -> Self {
        op.to_value()
    }
}

impl Embed {
    /// Recognized keys are checked in the order image, video, formula.
    /// A recognized key holding `null` does not count.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let present = |key: &str| map.get(key).filter(|v| !v.is_null());
        let payload = |key: &str| present(key).and_then(scalar_text).unwrap_or_default();
        if present("image").is_some() {
            Embed::Image(payload("image"))
        } else if present("video").is_some() {
            Embed::Video(payload("video"))
        } else if present("formula").is_some() {
            Embed::Formula(payload("formula"))
        } else {
            Embed::Unknown(map.keys().next().cloned().unwrap_or_default())
        }
    }

    /// Embed key name (`image`, `video`, `formula`, or the unknown key).
    pub fn kind(&self) -> &str {
        match self {
            Embed::Image(_) => "image",
            Embed::Video(_) => "video",
            Embed::Formula(_) => "formula",
            Embed::Unknown(key) => key,
        }
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        match self {
            Embed::Image(src) | Embed::Video(src) | Embed::Formula(src) => {
                map.insert(self.kind().to_string(), Value::String(src.clone()));
            }
            Embed::Unknown(key) if !key.is_empty() => {
                map.insert(key.clone(), Value::Null);
            }
            Embed::Unknown(_) => {}
        }
        Value::Object(map)
    }
}

pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
