//! Conformance test generation for feature-test macros.
//!
//! Support facts are compiled into a [`TestNode`] decision tree, which is
//! then pretty-printed as nested `#if`/`#elif`/`#else` blocks.

pub mod condition;
pub mod error;
pub mod matrix;
pub mod render;
pub mod testsuite;
pub mod tree;

pub use condition::{CompiledFact, Condition, NON_PEDANTIC_MACRO, ToggleTests, compile_fact};
pub use error::{GenerateError, Result};
pub use matrix::{OptionSet, file_option_sets, option_sets, standard_switches, strict_variants};
pub use render::{BlockWriter, render_node};
pub use testsuite::{IndividualTest, LIBRARY_PROLOGUE, feature_block, individual_test, testsuite};
pub use tree::{Arm, TestNode, build_tree};
