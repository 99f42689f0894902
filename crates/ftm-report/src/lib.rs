//! Documentation tables for feature-test macros.

pub mod error;
pub mod wikitable;

pub use error::{ReportError, Result};
pub use wikitable::{NAME_BREAK_THRESHOLD, RenderedTable, break_point, render_table};
