//! Custom error types for jcmp.

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to read file {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read standard input: {source}")]
    StdinError {
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {origin}: {source}")]
    JsonError {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid YAML in {origin}: {source}")]
    YamlError {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid TOML in {origin}: {source}")]
    TomlError {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not detect file format for {path}")]
    UnknownFormat { path: String },

    #[error("Expected a JSON object in {origin}{}, found {found}", index_suffix(.index))]
    NotAnObject {
        origin: String,
        index: Option<usize>,
        found: String,
    },
}

/// Errors raised while deciding which input to ingest.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("Provide either JSON text or a JSON file, not both")]
    AmbiguousInput,

    #[error("No JSON text or file was provided")]
    NoInput,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to read record store {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write record store {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Record store {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: Box<ParseError>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("Failed to serialize to JSON: {source}")]
    JsonSerializationError {
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum JcmpError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

fn index_suffix(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" at array index {}", i),
        None => String::new(),
    }
}

impl ParseError {
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn read_error(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::ReadError {
            path: path.into(),
            source,
        }
    }

    pub fn json_error(origin: impl Into<String>, source: serde_json::Error) -> Self {
        Self::JsonError {
            origin: origin.into(),
            source,
        }
    }

    pub fn yaml_error(origin: impl Into<String>, source: serde_yaml::Error) -> Self {
        Self::YamlError {
            origin: origin.into(),
            source,
        }
    }

    pub fn toml_error(origin: impl Into<String>, source: toml::de::Error) -> Self {
        Self::TomlError {
            origin: origin.into(),
            source,
        }
    }

    pub fn unknown_format(path: impl Into<String>) -> Self {
        Self::UnknownFormat { path: path.into() }
    }

    pub fn not_an_object(
        origin: impl Into<String>,
        index: Option<usize>,
        found: impl Into<String>,
    ) -> Self {
        Self::NotAnObject {
            origin: origin.into(),
            index,
            found: found.into(),
        }
    }
}

impl StorageError {
    pub fn corrupt(path: impl Into<String>, source: ParseError) -> Self {
        Self::Corrupt {
            path: path.into(),
            source: Box::new(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::file_not_found("test.json");
        assert_eq!(err.to_string(), "File not found: test.json");
    }

    #[test]
    fn test_not_an_object_display() {
        let err = ParseError::not_an_object("input", Some(2), "number");
        assert_eq!(
            err.to_string(),
            "Expected a JSON object in input at array index 2, found number"
        );

        let err = ParseError::not_an_object("input", None, "string");
        assert_eq!(err.to_string(), "Expected a JSON object in input, found string");
    }

    #[test]
    fn test_ingest_error_display() {
        assert!(IngestError::AmbiguousInput.to_string().contains("not both"));
        assert!(IngestError::NoInput.to_string().contains("No JSON"));
    }

    #[test]
    fn test_jcmp_error_from_ingest_error() {
        let err: JcmpError = IngestError::NoInput.into();
        assert!(matches!(err, JcmpError::Ingest(IngestError::NoInput)));
    }
}
