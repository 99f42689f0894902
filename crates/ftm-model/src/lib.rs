//! Data model for feature-test macro registries.

pub mod enums;
pub mod error;
pub mod fact;
pub mod feature;
pub mod option;
pub mod standard;

pub use enums::{Implementation, Kind};
pub use error::{ModelError, Result};
pub use fact::{Fact, SupportList};
pub use feature::{Feature, HistoryRow, Registry};
pub use option::{CompilerSwitch, OptionToken, negate_option, option_identifier};
pub use standard::{Rung, Standard, StandardLadder};
