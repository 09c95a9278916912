//! Shelf label core library.
//!
//! Parses callnumber queries, filters a library catalogue with them, and
//! lays the resulting labels out over sticker sheets. The main entry points
//! are [`parse_query`] for queries, [`select`] for the query-to-labels
//! pipeline, and [`paginate`] for sheet layout.

#![warn(missing_docs)]

/// Four-level callnumber keys.
pub mod callnumber;
/// Catalogue records: validation, filtering and label expansion.
pub mod catalogue;
/// Re-exports from the diagnostics crate.
pub mod diag;
/// Crate-level error type.
pub mod error;
/// Sticker sheet geometry and pagination.
pub mod layout;
/// Query to labels, end to end.
pub mod pipeline;
/// Callnumber query language.
pub mod query;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Keys and queries
pub use callnumber::{CallnumberKey, Level};
pub use query::{Condition, ParseError, PointCondition, Query, RangeCondition, parse_query};

// Catalogue
pub use catalogue::{CatalogueRecord, ValidationError, expand_labels, filter, validate_catalogue};

// Layout
pub use layout::{
    CellRenderer, ConfigError, DesignConfig, PageSize, PaginationSummary, StartCell, paginate, plan,
};

// Pipeline
pub use error::LabelError;
pub use pipeline::{Selection, select};

// Diagnostics (re-exported from the diagnostics crate)
pub use diag::{Diagnostic, Severity, Span, codes};
