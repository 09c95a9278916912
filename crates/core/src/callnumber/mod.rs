/// Four-level callnumber key and per-level comparison.
pub mod key;
/// Byte scanner recognising the callnumber patterns.
pub(crate) mod scan;

pub use key::{CallnumberKey, Level};
