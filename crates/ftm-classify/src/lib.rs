//! Standard-revision classification of feature-test macro values.
//!
//! Each value is documented under the narrowest revision whose watermark
//! covers it, unless it was adopted as a defect report against an earlier
//! revision. Inconsistencies in the data are surfaced as warnings.

pub mod classify;
pub mod error;
pub mod lint;
pub mod warning;

pub use classify::{Assignment, Classifiable, Classified, classify};
pub use error::{ClassifyError, Result};
pub use lint::{ClassificationReport, lint_history, lint_registry, lint_support};
pub use warning::{ClassificationWarning, PreviousValue, WarningKind};
