//! Baseline-first comparison of flat records.
//!
//! The first record of a set is the baseline. Every field of the baseline is
//! classified [`FieldClass::Baseline`]; every field of every later record is
//! classified against the baseline's value for the same key. Values are
//! compared as whole values with deep equality, so nested objects and arrays
//! never produce per-path entries.
//!
//! # Examples
//!
//! ```
//! use jcmp::{classify, FieldClass, Node, Record};
//!
//! let records = vec![
//!     Record::new().with("a", Node::Number(1.0)),
//!     Record::new()
//!         .with("a", Node::Number(2.0))
//!         .with("b", Node::Bool(true)),
//! ];
//!
//! let annotated = classify(&records);
//! assert_eq!(annotated[1].fields[0].class, FieldClass::Mismatch);
//! assert_eq!(annotated[1].fields[1].class, FieldClass::UniqueToComparand);
//! ```

use crate::tree::{Node, Record};
use serde::Serialize;
use std::collections::HashMap;

/// How a single field compares with the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldClass {
    /// Field of the baseline record itself
    Baseline,
    /// Baseline has the key with an equal value
    Match,
    /// Baseline has the key with a different value
    Mismatch,
    /// Baseline does not have the key
    UniqueToComparand,
}

/// A field of an annotated record.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedField {
    pub key: String,
    pub value: Node,
    pub class: FieldClass,
}

/// A record together with the classification of each of its own fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedRecord {
    /// Position of the record in the input set (0 is the baseline)
    pub index: usize,
    /// Fields in the record's own key order
    pub fields: Vec<AnnotatedField>,
    /// Baseline keys this record does not carry
    pub missing: usize,
}

/// Field counts for one annotated record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordStats {
    pub baseline: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub unique: usize,
    pub missing: usize,
}

impl AnnotatedRecord {
    pub fn is_baseline(&self) -> bool {
        self.index == 0
    }

    pub fn field(&self, key: &str) -> Option<&AnnotatedField> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn class_of(&self, key: &str) -> Option<FieldClass> {
        self.field(key).map(|f| f.class)
    }

    pub fn stats(&self) -> RecordStats {
        let mut stats = RecordStats {
            missing: self.missing,
            ..RecordStats::default()
        };
        for field in &self.fields {
            match field.class {
                FieldClass::Baseline => stats.baseline += 1,
                FieldClass::Match => stats.matched += 1,
                FieldClass::Mismatch => stats.mismatched += 1,
                FieldClass::UniqueToComparand => stats.unique += 1,
            }
        }
        stats
    }

    /// True when no field disagrees with or is unknown to the baseline.
    pub fn is_consistent(&self) -> bool {
        self.fields.iter().all(|f| {
            matches!(f.class, FieldClass::Baseline | FieldClass::Match)
        })
    }
}

/// Aggregate counts over the comparands of one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComparisonSummary {
    pub records: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub unique: usize,
    pub missing: usize,
}

impl ComparisonSummary {
    /// Returns true if every comparand agrees with the baseline.
    pub fn is_consistent(&self) -> bool {
        self.mismatched == 0 && self.unique == 0
    }
}

/// Options for the comparison.
#[derive(Debug, Clone, Default)]
pub struct CompareConfig {
    /// Treat strings as equal when they differ only in whitespace runs
    pub ignore_whitespace: bool,
}

/// Classifies every field of every record against the first record.
///
/// Equality is strict deep equality. An empty input yields an empty output.
pub fn classify(records: &[Record]) -> Vec<AnnotatedRecord> {
    classify_with(records, &CompareConfig::default())
}

/// Classifies records with the given configuration.
pub fn classify_with(records: &[Record], config: &CompareConfig) -> Vec<AnnotatedRecord> {
    let Some(baseline) = records.first() else {
        return Vec::new();
    };

    let index: HashMap<&str, &Node> = baseline.iter().collect();

    let mut annotated = Vec::with_capacity(records.len());
    annotated.push(AnnotatedRecord {
        index: 0,
        fields: baseline
            .iter()
            .map(|(key, value)| AnnotatedField {
                key: key.to_string(),
                value: value.clone(),
                class: FieldClass::Baseline,
            })
            .collect(),
        missing: 0,
    });

    for (i, record) in records.iter().enumerate().skip(1) {
        let fields: Vec<AnnotatedField> = record
            .iter()
            .map(|(key, value)| AnnotatedField {
                key: key.to_string(),
                value: value.clone(),
                class: classify_field(index.get(key).copied(), value, config),
            })
            .collect();
        let missing = baseline.keys().filter(|k| !record.contains_key(k)).count();

        annotated.push(AnnotatedRecord {
            index: i,
            fields,
            missing,
        });
    }

    annotated
}

/// Sums the stats of all comparands.
pub fn summarize(annotated: &[AnnotatedRecord]) -> ComparisonSummary {
    annotated
        .iter()
        .filter(|r| !r.is_baseline())
        .map(AnnotatedRecord::stats)
        .fold(
            ComparisonSummary {
                records: annotated.len(),
                ..ComparisonSummary::default()
            },
            |mut acc, stats| {
                acc.matched += stats.matched;
                acc.mismatched += stats.mismatched;
                acc.unique += stats.unique;
                acc.missing += stats.missing;
                acc
            },
        )
}

fn classify_field(baseline: Option<&Node>, value: &Node, config: &CompareConfig) -> FieldClass {
    match baseline {
        None => FieldClass::UniqueToComparand,
        Some(expected) if values_equal(expected, value, config) => FieldClass::Match,
        Some(_) => FieldClass::Mismatch,
    }
}

fn values_equal(a: &Node, b: &Node, config: &CompareConfig) -> bool {
    if config.ignore_whitespace {
        if let (Node::String(s1), Node::String(s2)) = (a, b) {
            return normalize_whitespace(s1) == normalize_whitespace(s2);
        }
    }

    a.deep_equals(b)
}

/// Trims and collapses runs of whitespace to a single space.
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
