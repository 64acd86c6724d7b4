//! Ingestion of JSON (and YAML/TOML) input into records.
//!
//! Text and files are parsed into [`Node`] trees, then flattened into
//! [`Record`]s: a top-level object becomes one record and a top-level array
//! contributes each of its elements in order. Anything that is not an object
//! is rejected as a whole, so a failed ingestion never yields a partial list.
//!
//! # Examples
//!
//! ```
//! use jcmp::parser::{read_records, Source};
//!
//! let source = Source::Text(r#"[{"a": 1}, {"a": 2}]"#.to_string());
//! let records = read_records(&source).unwrap();
//! assert_eq!(records.len(), 2);
//! ```

use crate::error::{IngestError, ParseError};
use crate::tree::{Node, Record};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Where a batch of records comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// JSON text supplied directly.
    Text(String),
    /// A file on disk; the format follows its extension.
    File(PathBuf),
    /// JSON read from standard input.
    Stdin,
}

impl Source {
    /// Picks the single input out of an optional text and an optional file.
    ///
    /// Blank text counts as no text. Supplying both is rejected rather than
    /// combined.
    pub fn resolve(text: Option<String>, file: Option<PathBuf>) -> Result<Source, IngestError> {
        let text = text.filter(|t| !t.trim().is_empty());
        match (text, file) {
            (Some(_), Some(_)) => Err(IngestError::AmbiguousInput),
            (Some(text), None) => Ok(Source::Text(text)),
            (None, Some(path)) if path.as_os_str() == "-" => Ok(Source::Stdin),
            (None, Some(path)) => Ok(Source::File(path)),
            (None, None) => Err(IngestError::NoInput),
        }
    }

    /// Human-readable origin used in error messages.
    pub fn origin(&self) -> String {
        match self {
            Source::Text(_) => "input text".to_string(),
            Source::File(path) => path.to_string_lossy().to_string(),
            Source::Stdin => "<stdin>".to_string(),
        }
    }
}

/// Reads and flattens all records provided by `source`.
pub fn read_records(source: &Source) -> Result<Vec<Record>, ParseError> {
    let origin = source.origin();
    let node = match source {
        Source::Text(text) => {
            parse_json(text).map_err(|e| ParseError::json_error(origin.clone(), e))?
        }
        Source::File(path) => parse_file(path)?,
        Source::Stdin => parse_stdin()?,
    };

    let records = into_records(node, &origin)?;
    tracing::debug!(origin = %origin, count = records.len(), "ingested records");
    Ok(records)
}

/// Flattens a parsed value into records.
///
/// An object yields one record; an array yields one record per element. Every
/// element must be an object, otherwise nothing is returned.
pub fn into_records(node: Node, origin: &str) -> Result<Vec<Record>, ParseError> {
    match node {
        Node::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                Record::try_from(item)
                    .map_err(|other| ParseError::not_an_object(origin, Some(i), other.type_name()))
            })
            .collect(),
        other => Record::try_from(other)
            .map(|record| vec![record])
            .map_err(|other| ParseError::not_an_object(origin, None, other.type_name())),
    }
}

/// Parses a file into a Node.
///
/// The format is detected by file extension (.json, .yaml, .yml, .toml). If the
/// extension is unknown or missing, JSON is tried first, then YAML.
///
/// # Errors
///
/// - The file does not exist (`ParseError::FileNotFound`)
/// - The file cannot be read (`ParseError::ReadError`)
/// - The file content is invalid for its format (`JsonError`, `YamlError`, `TomlError`)
/// - The format cannot be determined (`ParseError::UnknownFormat`)
pub fn parse_file(path: &Path) -> Result<Node, ParseError> {
    let path_text = path.to_string_lossy().to_string();

    if !path.exists() {
        return Err(ParseError::file_not_found(path_text));
    }

    let content = fs::read_to_string(path).map_err(|e| ParseError::read_error(&path_text, e))?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|s| s.to_lowercase());

    tracing::debug!(path = %path_text, format = ?extension, "parsing file");

    match extension.as_deref() {
        Some("json") => parse_json(&content).map_err(|e| ParseError::json_error(path_text, e)),
        Some("yaml") | Some("yml") => {
            parse_yaml(&content).map_err(|e| ParseError::yaml_error(path_text, e))
        }
        Some("toml") => parse_toml(&content).map_err(|e| ParseError::toml_error(path_text, e)),
        _ => parse_json(&content)
            .or_else(|_| parse_yaml(&content))
            .map_err(|_| ParseError::unknown_format(path_text)),
    }
}

/// Parses JSON read from standard input.
pub fn parse_stdin() -> Result<Node, ParseError> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .map_err(|source| ParseError::StdinError { source })?;
    parse_json(&content).map_err(|e| ParseError::json_error("<stdin>", e))
}

/// Parses a JSON string into a Node, keeping object keys in document order.
///
/// ```
/// use jcmp::parser::parse_json;
///
/// let node = parse_json(r#"{"name": "Alice", "age": 30}"#).unwrap();
/// assert_eq!(node.type_name(), "object");
/// ```
pub fn parse_json(content: &str) -> Result<Node, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    Ok(json_to_node(value))
}

/// Parses a YAML string into a Node.
pub fn parse_yaml(content: &str) -> Result<Node, serde_yaml::Error> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)?;
    Ok(yaml_to_node(value))
}

/// Parses a TOML document into a Node. The document root is always a table.
pub fn parse_toml(content: &str) -> Result<Node, toml::de::Error> {
    let table: toml::Table = toml::from_str(content)?;
    Ok(toml_to_node(toml::Value::Table(table)))
}

fn json_to_node(value: serde_json::Value) -> Node {
    match value {
        serde_json::Value::Null => Node::Null,
        serde_json::Value::Bool(b) => Node::Bool(b),
        // Every JSON number has an f64 reading, lossy beyond 2^53.
        serde_json::Value::Number(n) => Node::Number(n.as_f64().unwrap_or(0.0)),
        serde_json::Value::String(s) => Node::String(s),
        serde_json::Value::Array(arr) => Node::Array(arr.into_iter().map(json_to_node).collect()),
        serde_json::Value::Object(obj) => {
            Node::Object(obj.into_iter().map(|(k, v)| (k, json_to_node(v))).collect())
        }
    }
}

fn yaml_to_node(value: serde_yaml::Value) -> Node {
    match value {
        serde_yaml::Value::Null => Node::Null,
        serde_yaml::Value::Bool(b) => Node::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(f) = n.as_f64() {
                Node::Number(f)
            } else if let Some(i) = n.as_i64() {
                Node::Number(i as f64)
            } else if let Some(u) = n.as_u64() {
                Node::Number(u as f64)
            } else {
                Node::Number(0.0)
            }
        }
        serde_yaml::Value::String(s) => Node::String(s),
        serde_yaml::Value::Sequence(seq) => {
            Node::Array(seq.into_iter().map(yaml_to_node).collect())
        }
        serde_yaml::Value::Mapping(map) => {
            let record: Record = map
                .into_iter()
                .map(|(k, v)| {
                    let key = match k {
                        serde_yaml::Value::String(s) => s,
                        serde_yaml::Value::Number(n) => n.to_string(),
                        serde_yaml::Value::Bool(b) => b.to_string(),
                        serde_yaml::Value::Null => "null".to_string(),
                        other => format!("{:?}", other),
                    };
                    (key, yaml_to_node(v))
                })
                .collect();
            record.into_node()
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_node(tagged.value),
    }
}

fn toml_to_node(value: toml::Value) -> Node {
    match value {
        toml::Value::String(s) => Node::String(s),
        toml::Value::Integer(i) => Node::Number(i as f64),
        toml::Value::Float(f) => Node::Number(f),
        toml::Value::Boolean(b) => Node::Bool(b),
        toml::Value::Datetime(dt) => Node::String(dt.to_string()),
        toml::Value::Array(arr) => Node::Array(arr.into_iter().map(toml_to_node).collect()),
        toml::Value::Table(table) => {
            Node::Object(table.into_iter().map(|(k, v)| (k, toml_to_node(v))).collect())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_json_keeps_key_order() {
        let node = parse_json(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let record = Record::try_from(node).unwrap();
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_parse_json_duplicate_key_last_wins() {
        let node = parse_json(r#"{"a": 1, "a": 2}"#).unwrap();
        let record = Record::try_from(node).unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("a"), Some(&Node::Number(2.0)));
    }

    #[test]
    fn test_into_records_object() {
        let node = parse_json(r#"{"a": 1}"#).unwrap();
        let records = into_records(node, "test").unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_into_records_array_flattens() {
        let node = parse_json(r#"[{"a": 1}, {"b": 2}, {}]"#).unwrap();
        let records = into_records(node, "test").unwrap();
        assert_eq!(records.len(), 3);
        assert!(records[1].contains_key("b"));
        assert!(records[2].is_empty());
    }

    #[test]
    fn test_into_records_rejects_scalar_element() {
        let node = parse_json(r#"[{"a": 1}, 42]"#).unwrap();
        match into_records(node, "test").unwrap_err() {
            ParseError::NotAnObject { index, found, .. } => {
                assert_eq!(index, Some(1));
                assert_eq!(found, "number");
            }
            other => panic!("Expected NotAnObject, got {:?}", other),
        }
    }

    #[test]
    fn test_into_records_rejects_top_level_scalar() {
        let node = parse_json(r#""hello""#).unwrap();
        assert!(matches!(
            into_records(node, "test"),
            Err(ParseError::NotAnObject { index: None, .. })
        ));
    }

    #[test]
    fn test_resolve_source() {
        assert_eq!(
            Source::resolve(Some("{}".to_string()), Some(PathBuf::from("a.json"))),
            Err(IngestError::AmbiguousInput)
        );
        assert_eq!(Source::resolve(None, None), Err(IngestError::NoInput));
        assert_eq!(
            Source::resolve(Some("   ".to_string()), None),
            Err(IngestError::NoInput)
        );
        assert_eq!(
            Source::resolve(None, Some(PathBuf::from("-"))),
            Ok(Source::Stdin)
        );
        assert_eq!(
            Source::resolve(Some("{}".to_string()), None),
            Ok(Source::Text("{}".to_string()))
        );
    }

    #[test]
    fn test_read_records_invalid_text() {
        let source = Source::Text("{invalid json}".to_string());
        assert!(matches!(
            read_records(&source),
            Err(ParseError::JsonError { .. })
        ));
    }

    #[test]
    fn test_parse_toml_table() {
        let node = parse_toml("name = \"Alice\"\nage = 30\n").unwrap();
        assert_eq!(node.get("name"), Some(&Node::String("Alice".to_string())));
        assert_eq!(node.get("age"), Some(&Node::Number(30.0)));
    }

    #[test]
    fn test_parse_file_yaml_sequence() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "- name: Alice\n- name: Bob").unwrap();

        let records = read_records(&Source::File(file.path().to_path_buf())).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[1].get("name"),
            Some(&Node::String("Bob".to_string()))
        );
    }

    #[test]
    fn test_parse_file_unknown_extension_falls_back_to_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"key": "value"}}"#).unwrap();

        let node = parse_file(file.path()).unwrap();
        assert_eq!(node.get("key"), Some(&Node::String("value".to_string())));
    }

    #[test]
    fn test_parse_file_not_found() {
        let result = parse_file(Path::new("/nonexistent/file.json"));
        assert!(matches!(result, Err(ParseError::FileNotFound { .. })));
    }
}
