use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use super::error::CrossRoomError;
use crate::callnumber::{CallnumberKey, Level};

/// Matches every key sharing the condition key's prefix.
///
/// `A12` matches `A12/1-001` and `A12/9-999` alike: levels deeper than the
/// condition's own are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PointCondition {
    key: CallnumberKey,
}

impl PointCondition {
    /// Condition on the prefix `key`.
    pub fn new(key: CallnumberKey) -> Self {
        Self { key }
    }

    /// The prefix this condition matches.
    pub fn key(&self) -> &CallnumberKey {
        &self.key
    }

    /// Room of the prefix.
    pub fn room(&self) -> char {
        self.key.room()
    }

    /// Deepest level the condition constrains.
    pub fn max_level(&self) -> Level {
        self.key.max_level()
    }

    /// Whether `key` lies under this prefix. Incomplete keys never match.
    pub fn matches(&self, key: &CallnumberKey) -> bool {
        if !key.is_complete() {
            return false;
        }
        key.room() == self.room() && key.cmp_through(&self.key, self.max_level()).is_eq()
    }
}

/// Matches keys inside an inclusive interval within one room.
///
/// Each end is compared only through its own depth, so `A10--A20` covers
/// every book from bookcase 10 through bookcase 20 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeCondition {
    start: PointCondition,
    end: PointCondition,
}

impl RangeCondition {
    /// Range from `start` to `end`, both inclusive.
    ///
    /// Fails when the ends lie in different rooms.
    pub fn new(start: PointCondition, end: PointCondition) -> Result<Self, CrossRoomError> {
        if start.room() != end.room() {
            return Err(CrossRoomError {
                start_room: start.room(),
                end_room: end.room(),
            });
        }
        Ok(Self { start, end })
    }

    /// Lower end.
    pub fn start(&self) -> &PointCondition {
        &self.start
    }

    /// Upper end.
    pub fn end(&self) -> &PointCondition {
        &self.end
    }

    /// Room shared by both ends.
    pub fn room(&self) -> char {
        self.start.room()
    }

    /// Whether `key` lies within the range. Incomplete keys never match.
    pub fn matches(&self, key: &CallnumberKey) -> bool {
        if !key.is_complete() {
            return false;
        }
        key.room() == self.room()
            && key.cmp_through(self.start.key(), self.start.max_level()) != Ordering::Less
            && key.cmp_through(self.end.key(), self.end.max_level()) != Ordering::Greater
    }
}

/// One alternative of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Condition {
    /// Prefix match.
    Point(PointCondition),
    /// Inclusive interval within one room.
    Range(RangeCondition),
}

impl Condition {
    /// Whether `key` satisfies the condition.
    pub fn matches(&self, key: &CallnumberKey) -> bool {
        match self {
            Condition::Point(point) => point.matches(key),
            Condition::Range(range) => range.matches(key),
        }
    }
}

impl fmt::Display for PointCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.key.fmt(f)
    }
}

impl fmt::Display for RangeCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.start, super::RANGE_SEPARATOR, self.end)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Point(point) => point.fmt(f),
            Condition::Range(range) => range.fmt(f),
        }
    }
}
