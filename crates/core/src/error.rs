use thiserror::Error;

use crate::catalogue::ValidationError;
use crate::diag::Diagnostic;
use crate::layout::ConfigError;
use crate::query::ParseError;

/// Any error raised while turning a query and a catalogue into labels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    /// The query text did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The catalogue failed a precondition.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The sheet configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl LabelError {
    /// Diagnostic code of the underlying error.
    pub fn code(&self) -> &'static str {
        match self {
            LabelError::Parse(e) => e.code(),
            LabelError::Validation(e) => e.code(),
            LabelError::Config(e) => e.code(),
        }
    }

    /// Convert into an error diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            LabelError::Parse(e) => e.to_diagnostic(),
            LabelError::Validation(e) => e.to_diagnostic(),
            LabelError::Config(e) => e.to_diagnostic(),
        }
    }
}
