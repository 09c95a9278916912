use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use super::record::CatalogueRecord;
use crate::callnumber::CallnumberKey;
use crate::diag::{Diagnostic, codes};

/// Catalogue-level precondition violations, detected before filtering.
///
/// Offending callnumbers are listed once each, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Some callnumbers appear on more than one record.
    #[error("callnumbers in the catalogue are not unique: {}", .callnumbers.join(", "))]
    DuplicateCallnumbers {
        /// The repeated callnumbers.
        callnumbers: Vec<String>,
    },

    /// Some callnumbers are not full four-level callnumbers.
    #[error("invalid callnumbers in the catalogue: {}", .callnumbers.join(", "))]
    MalformedCallnumbers {
        /// The malformed callnumbers.
        callnumbers: Vec<String>,
    },
}

impl ValidationError {
    /// Diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::DuplicateCallnumbers { .. } => codes::DUPLICATE_CALLNUMBER,
            ValidationError::MalformedCallnumbers { .. } => codes::MALFORMED_CALLNUMBER,
        }
    }

    /// Convert into an error diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (ValidationError::DuplicateCallnumbers { callnumbers }
        | ValidationError::MalformedCallnumbers { callnumbers }) = self;
        Diagnostic::error(self.code(), self.to_string(), None).with_context(BTreeMap::from([(
            "count".into(),
            callnumbers.len().to_string(),
        )]))
    }
}

/// Check that no callnumber appears twice.
pub fn validate_unique_callnumbers(records: &[CatalogueRecord]) -> Result<(), ValidationError> {
    let mut seen = BTreeSet::new();
    let duplicates: BTreeSet<&str> = records
        .iter()
        .map(|r| r.callnumber.as_str())
        .filter(|cn| !seen.insert(*cn))
        .collect();
    if duplicates.is_empty() {
        return Ok(());
    }
    Err(ValidationError::DuplicateCallnumbers {
        callnumbers: duplicates.into_iter().map(str::to_string).collect(),
    })
}

/// Check that every callnumber is a full callnumber in stored form
/// (`A12/3-004`, uppercase room).
pub fn validate_callnumber_format(records: &[CatalogueRecord]) -> Result<(), ValidationError> {
    let malformed: BTreeSet<&str> = records
        .iter()
        .map(|r| r.callnumber.as_str())
        .filter(|cn| !CallnumberKey::is_strict_full(cn))
        .collect();
    if malformed.is_empty() {
        return Ok(());
    }
    Err(ValidationError::MalformedCallnumbers {
        callnumbers: malformed.into_iter().map(str::to_string).collect(),
    })
}

/// Run both catalogue checks: uniqueness first, then format.
pub fn validate_catalogue(records: &[CatalogueRecord]) -> Result<(), ValidationError> {
    validate_unique_callnumbers(records)?;
    validate_callnumber_format(records)
}
