//! Callnumber query language.
//!
//! A query is a `;`-separated list of alternatives. Each alternative is
//! either a callnumber prefix (`A`, `A12`, `A12/3`, `A12/3-004`) or an
//! inclusive range of two prefixes in the same room (`A10--A20`). A key
//! matches the query when it matches any alternative.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::callnumber::CallnumberKey;

/// Point and range conditions.
pub mod condition;
/// Query parse errors.
pub mod error;
/// Query text parser.
pub mod parser;

pub use condition::{Condition, PointCondition, RangeCondition};
pub use error::{CrossRoomError, ParseError};
pub use parser::{PART_SEPARATOR, RANGE_SEPARATOR, parse_query};

/// An OR-combination of conditions, in written order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Query {
    conditions: Vec<Condition>,
}

impl Query {
    /// Query from already-built conditions.
    pub fn new(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }

    /// The alternatives, in written order.
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Number of alternatives.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Whether the query has no alternatives (and so matches nothing).
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Whether any alternative matches `key`.
    pub fn matches(&self, key: &CallnumberKey) -> bool {
        self.conditions.iter().any(|c| c.matches(key))
    }
}

impl FromStr for Query {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_query(s)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, condition) in self.conditions.iter().enumerate() {
            if i > 0 {
                f.write_str(PART_SEPARATOR)?;
            }
            write!(f, "{condition}")?;
        }
        Ok(())
    }
}
