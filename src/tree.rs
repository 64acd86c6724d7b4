//! Value representation for parsed JSON-like data.
//!
//! `Node` is a closed tagged union over the JSON data model. Objects keep their
//! keys in insertion order so they can be displayed the way they were written,
//! but equality between nodes never depends on that order.

use std::collections::HashMap;

/// A node representing a value in structured data (JSON, YAML, TOML).
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Node>),
    /// Key/value pairs in insertion order. Keys are unique.
    Object(Vec<(String, Node)>),
}

impl Node {
    pub fn type_name(&self) -> &str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "boolean",
            Node::Number(_) => "number",
            Node::String(_) => "string",
            Node::Array(_) => "array",
            Node::Object(_) => "object",
        }
    }

    /// Looks up a key when this node is an object.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Object(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Deep value equality.
    ///
    /// Scalars must have the same type and value (no coercion, so `"1"` and `1`
    /// differ). Objects must have the same key set with recursively equal
    /// values, in any order. Arrays must have the same length and recursively
    /// equal elements in order.
    pub fn deep_equals(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Null, Node::Null) => true,
            (Node::Bool(a), Node::Bool(b)) => a == b,
            (Node::Number(a), Node::Number(b)) => a == b,
            (Node::String(a), Node::String(b)) => a == b,
            (Node::Array(a), Node::Array(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(item_a, item_b)| item_a.deep_equals(item_b))
            }
            (Node::Object(a), Node::Object(b)) => {
                if a.len() != b.len() {
                    return false;
                }
                let index: HashMap<&str, &Node> =
                    b.iter().map(|(k, v)| (k.as_str(), v)).collect();
                a.iter().all(|(key, value)| {
                    index
                        .get(key.as_str())
                        .is_some_and(|v| value.deep_equals(v))
                })
            }
            _ => false,
        }
    }

    /// Returns a short one-line preview of the node's value, truncated to `max_len`.
    pub fn preview(&self, max_len: usize) -> String {
        let preview = match self {
            Node::Null => "null".to_string(),
            Node::Bool(b) => b.to_string(),
            Node::Number(n) => format_number(*n),
            Node::String(s) => quote_string(s),
            Node::Object(fields) => match fields.len() {
                0 => "{}".to_string(),
                1 => "{ 1 key }".to_string(),
                count => format!("{{ {} keys }}", count),
            },
            Node::Array(arr) => match arr.len() {
                0 => "[]".to_string(),
                1 => "[ 1 item ]".to_string(),
                count => format!("[ {} items ]", count),
            },
        };

        truncate(preview, max_len)
    }

    /// Renders the node as JSON text indented with two spaces.
    pub fn to_pretty_json(&self) -> String {
        // Serializing a serde_json::Value cannot fail.
        serde_json::to_string_pretty(&self.to_json_value()).unwrap_or_default()
    }

    /// Converts the node back into a `serde_json::Value`, keeping key order.
    pub fn to_json_value(&self) -> serde_json::Value {
        use serde_json::json;

        match self {
            Node::Null => json!(null),
            Node::Bool(b) => json!(b),
            Node::Number(n) => number_to_json(*n),
            Node::String(s) => json!(s),
            Node::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(Node::to_json_value).collect())
            }
            Node::Object(fields) => {
                let obj: serde_json::Map<String, serde_json::Value> = fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect();
                serde_json::Value::Object(obj)
            }
        }
    }
}

/// A single flat record: an ordered mapping from top-level key to value.
///
/// Values may themselves be nested, but comparison happens per top-level key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Node)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, replacing the value in place if the key already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: Node) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Builder-style variant of [`Record::insert`].
    pub fn with(mut self, key: impl Into<String>, value: Node) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Converts the record into an object node.
    pub fn into_node(self) -> Node {
        Node::Object(self.fields)
    }

    pub fn to_json_value(&self) -> serde_json::Value {
        Node::Object(self.fields.clone()).to_json_value()
    }
}

impl TryFrom<Node> for Record {
    type Error = Node;

    /// Succeeds only for object nodes; any other node is handed back.
    /// Repeated keys collapse to the first position with the last value.
    fn try_from(node: Node) -> Result<Self, Self::Error> {
        match node {
            Node::Object(fields) => Ok(fields.into_iter().collect()),
            other => Err(other),
        }
    }
}

impl FromIterator<(String, Node)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

// Largest integer an f64 represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER
}

fn format_number(n: f64) -> String {
    if is_integral(n) {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn number_to_json(n: f64) -> serde_json::Value {
    if is_integral(n) {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null)
    }
}

/// JSON string literal with quotes, newlines and control characters escaped.
fn quote_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("{:?}", s))
}

fn truncate(text: String, max_len: usize) -> String {
    if text.chars().count() > max_len {
        let kept: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(pairs: &[(&str, Node)]) -> Node {
        Node::Object(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_deep_equals_no_coercion() {
        assert!(!Node::String("1".to_string()).deep_equals(&Node::Number(1.0)));
        assert!(!Node::Null.deep_equals(&Node::Bool(false)));
        assert!(!Node::Number(0.0).deep_equals(&Node::Bool(false)));
    }

    #[test]
    fn test_deep_equals_object_order_independent() {
        let a = obj(&[("x", Node::Number(1.0)), ("y", Node::Number(2.0))]);
        let b = obj(&[("y", Node::Number(2.0)), ("x", Node::Number(1.0))]);
        assert!(a.deep_equals(&b));
    }

    #[test]
    fn test_deep_equals_object_different_keys() {
        let a = obj(&[("x", Node::Number(1.0))]);
        let b = obj(&[("z", Node::Number(1.0))]);
        assert!(!a.deep_equals(&b));
    }

    #[test]
    fn test_deep_equals_array_order_matters() {
        let a = Node::Array(vec![Node::Number(1.0), Node::Number(2.0)]);
        let b = Node::Array(vec![Node::Number(2.0), Node::Number(1.0)]);
        assert!(!a.deep_equals(&b));
        assert!(a.deep_equals(&a.clone()));
    }

    #[test]
    fn test_preview_integral_number() {
        assert_eq!(Node::Number(30.0).preview(80), "30");
        assert_eq!(Node::Number(2.5).preview(80), "2.5");
    }

    #[test]
    fn test_preview_truncation_is_char_safe() {
        let node = Node::String("ééééééééééééééééééééé".to_string());
        let preview = node.preview(10);
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 10);
    }

    #[test]
    fn test_preview_escapes_string() {
        let preview = Node::String("a\"b\nc".to_string()).preview(80);
        assert_eq!(preview, r#""a\"b\nc""#);
        assert!(!preview.contains('\n'));
    }

    #[test]
    fn test_record_insert_replaces_in_place() {
        let record = Record::new()
            .with("a", Node::Number(1.0))
            .with("b", Node::Number(2.0))
            .with("a", Node::Number(3.0));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(record.get("a"), Some(&Node::Number(3.0)));
    }

    #[test]
    fn test_record_try_from_non_object() {
        let err = Record::try_from(Node::Number(1.0)).unwrap_err();
        assert_eq!(err, Node::Number(1.0));
    }

    #[test]
    fn test_to_pretty_json_keeps_order() {
        let node = obj(&[("b", Node::Number(1.0)), ("a", Node::Bool(true))]);
        assert_eq!(node.to_pretty_json(), "{\n  \"b\": 1,\n  \"a\": true\n}");
    }
}
