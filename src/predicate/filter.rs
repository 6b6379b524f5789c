//! Single-bin index filters
//!
//! The only shapes a secondary index can answer: equality on an integer or
//! string, and an inclusive integer range.

use std::fmt;

use crate::model::Record;
use crate::value::Value;

/// Index filter over one bin
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// bin == value (integer or string)
    Equal { bin: String, value: Value },
    /// begin <= bin <= end
    Range { bin: String, begin: i64, end: i64 },
}

impl Filter {
    pub fn equal(bin: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Equal {
            bin: bin.into(),
            value: value.into(),
        }
    }

    /// Inclusive range; collapses to equality when both ends meet
    pub fn range(bin: impl Into<String>, begin: i64, end: i64) -> Self {
        let bin = bin.into();
        if begin == end {
            Filter::Equal {
                bin,
                value: Value::Int(begin),
            }
        } else {
            Filter::Range { bin, begin, end }
        }
    }

    /// Bin the filter applies to
    pub fn bin(&self) -> &str {
        match self {
            Filter::Equal { bin, .. } | Filter::Range { bin, .. } => bin,
        }
    }

    /// True if the filter operates on integers
    pub fn is_numeric(&self) -> bool {
        match self {
            Filter::Equal { value, .. } => matches!(value, Value::Int(_)),
            Filter::Range { .. } => true,
        }
    }

    /// Checks whether a record is selected by this filter
    pub fn matches(&self, record: &Record) -> bool {
        match (self, record.bin(self.bin())) {
            (Filter::Equal { value, .. }, Some(actual)) => actual == value,
            (Filter::Range { begin, end, .. }, Some(Value::Int(actual))) => {
                begin <= actual && actual <= end
            }
            _ => false,
        }
    }

    /// Intersects two filters on the same bin.
    ///
    /// Returns `None` when no value can satisfy both.
    pub fn intersect(&self, other: &Filter) -> Option<Filter> {
        if self.bin() != other.bin() {
            return None;
        }
        match (self.int_bounds(), other.int_bounds()) {
            (Some((b1, e1)), Some((b2, e2))) => {
                let begin = b1.max(b2);
                let end = e1.min(e2);
                (begin <= end).then(|| Filter::range(self.bin(), begin, end))
            }
            (None, None) => (self == other).then(|| self.clone()),
            _ => None,
        }
    }

    fn int_bounds(&self) -> Option<(i64, i64)> {
        match self {
            Filter::Equal {
                value: Value::Int(v),
                ..
            } => Some((*v, *v)),
            Filter::Range { begin, end, .. } => Some((*begin, *end)),
            Filter::Equal { .. } => None,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Equal { bin, value } => write!(f, "{} = {}", bin, value),
            Filter::Range { bin, begin, end } => write!(f, "{} in [{}, {}]", bin, begin, end),
        }
    }
}
