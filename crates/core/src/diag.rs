pub use shelf_labels_diagnostics::{Diagnostic, Severity, Span, codes};
