//! Input sources and raw value extraction.
//!
//! A request carries up to three independent sources of untyped input: URL
//! path parameters, the query string, and the JSON body. The same field name
//! may be declared against any of them; one [`Source`] tag threads through the
//! validator instead of three parallel code paths.

use crate::error::SourceReadError;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

use crate::rules::ValueType;

/// Which input source a value was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// URL path segment.
    Path,
    /// Query-string parameter.
    Query,
    /// JSON request body field.
    Body,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path => write!(f, "path"),
            Source::Query => write!(f, "query"),
            Source::Body => write!(f, "body"),
        }
    }
}

/// One raw value as read from a source, before validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue<'a> {
    /// The key was not present in the source.
    Absent,
    /// A textual value from the query string or a path segment.
    Text(&'a str),
    /// A JSON value from the request body.
    Json(&'a Value),
}

impl<'a> RawValue<'a> {
    /// Whether the key was missing entirely.
    pub fn is_absent(&self) -> bool {
        matches!(self, RawValue::Absent)
    }

    /// Whether the value counts as empty for the `required` rule: absent key,
    /// empty string, JSON null, or zero-length array.
    pub fn is_empty(&self) -> bool {
        match self {
            RawValue::Absent => true,
            RawValue::Text(s) => s.is_empty(),
            RawValue::Json(v) => match v {
                Value::Null => true,
                Value::String(s) => s.is_empty(),
                Value::Array(a) => a.is_empty(),
                _ => false,
            },
        }
    }

    /// The textual form of the value, if it has one. Numbers and booleans
    /// render to their literal form; objects and arrays have none.
    pub fn text_form(&self) -> Option<Cow<'a, str>> {
        match *self {
            RawValue::Absent => None,
            RawValue::Text(s) => Some(Cow::Borrowed(s)),
            RawValue::Json(v) => match v {
                Value::String(s) => Some(Cow::Borrowed(s.as_str())),
                Value::Number(n) => Some(Cow::Owned(n.to_string())),
                Value::Bool(b) => Some(Cow::Owned(b.to_string())),
                _ => None,
            },
        }
    }

    /// Parse the value as an integer. Textual values parse; JSON values must
    /// already be integers.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RawValue::Absent => None,
            RawValue::Text(s) => s.trim().parse().ok(),
            RawValue::Json(v) => v.as_i64(),
        }
    }

    /// Parse the value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RawValue::Absent => None,
            RawValue::Text(s) => match s.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            RawValue::Json(v) => v.as_bool(),
        }
    }

    /// Parse the value as a list of integers: a JSON array of numbers, or a
    /// comma-separated textual list.
    pub fn as_int_list(&self) -> Option<Vec<i64>> {
        match self {
            RawValue::Absent => None,
            RawValue::Text(s) => s
                .split(',')
                .map(|part| part.trim().parse().ok())
                .collect(),
            RawValue::Json(v) => v
                .as_array()?
                .iter()
                .map(|item| item.as_i64())
                .collect(),
        }
    }

    /// Whether the value has the declared shape.
    pub fn conforms(&self, ty: ValueType) -> bool {
        match ty {
            ValueType::String => match self {
                RawValue::Text(_) => true,
                RawValue::Json(v) => v.is_string(),
                RawValue::Absent => false,
            },
            ValueType::Int => self.as_i64().is_some(),
            ValueType::Bool => self.as_bool().is_some(),
            ValueType::NumberSlice => self.as_int_list().is_some(),
        }
    }
}

/// Query-string parameters, in request order.
#[derive(Debug, Clone, Default)]
pub struct QuerySource {
    pairs: Vec<(String, String)>,
}

impl QuerySource {
    /// An empty query string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already-decoded key/value pairs (the transport layer owns
    /// percent-decoding).
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            pairs: pairs.into_iter().collect(),
        }
    }

    /// Parse a raw query string, percent-decoding keys and values. Input
    /// that is not valid urlencoded data is a [`SourceReadError`]: it cannot
    /// be read, before any field-level validation is attempted.
    pub fn parse(raw: &str) -> Result<Self, SourceReadError> {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw)?;
        Ok(Self { pairs })
    }

    /// Look up a parameter by key. First occurrence wins.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The raw value for a field, [`RawValue::Absent`] when the key is
    /// missing.
    pub fn raw(&self, key: &str) -> RawValue<'_> {
        match self.get(key) {
            Some(v) => RawValue::Text(v),
            None => RawValue::Absent,
        }
    }
}

/// The JSON request body.
#[derive(Debug, Clone)]
pub struct BodySource {
    value: Value,
}

impl BodySource {
    /// A body with no fields (requests without a payload).
    pub fn empty() -> Self {
        Self { value: Value::Null }
    }

    /// Parse raw body bytes. Anything that is not a JSON object (or empty
    /// input, treated as no body) is a [`SourceReadError`].
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SourceReadError> {
        if bytes.is_empty() {
            return Ok(Self::empty());
        }
        let value: Value = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    /// Wrap an already-parsed JSON value; must be an object or null.
    pub fn from_value(value: Value) -> Result<Self, SourceReadError> {
        match value {
            Value::Object(_) | Value::Null => Ok(Self { value }),
            other => Err(SourceReadError::BodyShape {
                found: json_type_name(&other),
            }),
        }
    }

    /// Look up a body field by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.as_object().and_then(|obj| obj.get(key))
    }

    /// The raw value for a field, [`RawValue::Absent`] when the key is
    /// missing.
    pub fn raw(&self, key: &str) -> RawValue<'_> {
        match self.get(key) {
            Some(v) => RawValue::Json(v),
            None => RawValue::Absent,
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_parse_roundtrip() {
        let query = QuerySource::parse("?profile=Public&limit=10").unwrap();
        assert_eq!(query.get("profile"), Some("Public"));
        assert_eq!(query.get("limit"), Some("10"));
        assert_eq!(query.get("offset"), None);
        assert!(query.raw("offset").is_absent());
    }

    #[test]
    fn query_parse_percent_decodes_keys_and_values() {
        let query = QuerySource::parse("name=A%20B&mail=a%40b.com&note=c+d").unwrap();
        assert_eq!(query.get("name"), Some("A B"));
        assert_eq!(query.get("mail"), Some("a@b.com"));
        assert_eq!(query.get("note"), Some("c d"));
    }

    #[test]
    fn query_parse_accepts_valueless_keys() {
        let query = QuerySource::parse("archived&limit=3").unwrap();
        assert_eq!(query.get("archived"), Some(""));
        assert!(query.raw("archived").is_empty());
        assert_eq!(query.get("limit"), Some("3"));
    }

    #[test]
    fn query_parse_allows_empty_values() {
        let query = QuerySource::parse("profile=&limit=3").unwrap();
        assert_eq!(query.get("profile"), Some(""));
        assert!(query.raw("profile").is_empty());
    }

    #[test]
    fn body_rejects_non_object() {
        let err = BodySource::from_slice(b"[1,2,3]").unwrap_err();
        assert!(matches!(err, SourceReadError::BodyShape { found: "array" }));
    }

    #[test]
    fn body_rejects_malformed_json() {
        let err = BodySource::from_slice(b"{not json").unwrap_err();
        assert!(matches!(err, SourceReadError::Body(_)));
    }

    #[test]
    fn empty_body_has_no_fields() {
        let body = BodySource::from_slice(b"").unwrap();
        assert!(body.raw("anything").is_absent());
    }

    #[test]
    fn raw_value_text_forms() {
        let num = json!(42);
        assert_eq!(RawValue::Json(&num).text_form().unwrap(), "42");
        assert_eq!(RawValue::Text("abc").text_form().unwrap(), "abc");
        let obj = json!({});
        assert!(RawValue::Json(&obj).text_form().is_none());
    }

    #[test]
    fn raw_value_int_lists() {
        assert_eq!(
            RawValue::Text("1, 2,3").as_int_list(),
            Some(vec![1, 2, 3])
        );
        assert_eq!(RawValue::Text("1,x").as_int_list(), None);
        let list = json!([4, 5]);
        assert_eq!(RawValue::Json(&list).as_int_list(), Some(vec![4, 5]));
    }
}
