//! JCMP - baseline-first comparison of JSON records.
//!
//! A set of flat JSON objects is compared field by field against its first
//! member, the baseline. Each field of every other object is classified as a
//! match, a mismatch, or a key the baseline does not have, ready to be rendered
//! with whatever highlighting the caller prefers.
//!
//! # Example
//!
//! ```no_run
//! use jcmp::{classify, format_comparison, read_records, OutputFormat, OutputOptions, Source};
//! use std::path::PathBuf;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Every object in the file becomes one record; the first is the baseline
//! let records = read_records(&Source::File(PathBuf::from("people.json")))?;
//!
//! let annotated = classify(&records);
//!
//! let output = format_comparison(&annotated, &OutputFormat::Terminal, &OutputOptions::default())?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod compare;
pub mod error;
pub mod output;
pub mod parser;
pub mod session;
pub mod store;
pub mod style;
pub mod tree;

// Re-export commonly used types for convenience
pub use compare::{
    classify, classify_with, summarize, AnnotatedField, AnnotatedRecord, CompareConfig,
    ComparisonSummary, FieldClass, RecordStats,
};
pub use error::{IngestError, JcmpError, OutputError, ParseError, StorageError};
pub use output::{format_comparison, OutputFormat, OutputOptions};
pub use parser::{into_records, parse_file, parse_json, parse_toml, parse_yaml, read_records, Source};
pub use session::Session;
pub use store::{FileStore, MemoryStore, RecordStore};
pub use style::{Color, Style};
pub use tree::{Node, Record};
