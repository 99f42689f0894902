//! Library side of the `ftm` command-line tool.

pub mod compiler;
pub mod logging;
pub mod pipeline;
