/// Sorting and quantity expansion into label texts.
pub mod expand;
/// Query evaluation over catalogue records.
pub mod filter;
/// Catalogue record type and JSON loading.
pub mod record;
/// Catalogue-level checks run before filtering.
pub mod validate;

pub use expand::{expand_labels, sort_by_callnumber};
pub use filter::{FilteredRecords, filter, record_matches};
pub use record::{CatalogueRecord, load_catalogue_from_str};
pub use validate::{
    ValidationError, validate_callnumber_format, validate_catalogue, validate_unique_callnumbers,
};
