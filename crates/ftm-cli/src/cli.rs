//! CLI argument definitions for the `ftm` tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use ftm_model::{Implementation, Kind};

#[derive(Parser)]
#[command(
    name = "ftm",
    version,
    about = "Feature-test macro registry toolkit",
    long_about = "Maintain the C++ feature-test macro registry.\n\n\
                  Generates preprocessor conformance tests per compiler, runs them,\n\
                  and renders the cppreference summary tables."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Registry file (overrides FTM_DATA and ftm.toml).
    #[arg(long = "data", value_name = "PATH", global = true)]
    pub data: Option<PathBuf>,

    /// Project config file (default: ./ftm.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write the conformance test file of every kind and implementation.
    Generate(GenerateArgs),

    /// Render the cppreference summary table of a kind.
    Table(TableArgs),

    /// Preprocess every feature's test with a compiler and report diagnostics.
    Check(CheckArgs),

    /// Classify every value and summarise the inconsistencies found.
    Lint(LintArgs),

    /// Replace gcc library support with the data in libstdc++'s version.def.
    ImportGlibcxx(ImportArgs),

    /// List the standard revisions and their watermarks.
    Standards,
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Directory receiving `<kind>/<implementation>.cpp` (default: test).
    #[arg(long = "test-dir", value_name = "DIR")]
    pub test_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct TableArgs {
    /// Kind of feature-test macros to tabulate.
    #[arg(value_enum)]
    pub kind: KindArg,

    /// Write the table to a file instead of stdout.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Do not log classification warnings.
    #[arg(long = "disable-warning")]
    pub disable_warning: bool,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Implementation to test.
    #[arg(value_enum)]
    pub implementation: ImplementationArg,

    /// Kind of feature-test macros to test.
    #[arg(value_enum)]
    pub kind: KindArg,

    /// Compiler executable.
    ///
    /// Defaults to clang, gcc or cl depending on the implementation. The
    /// default is likely wrong when testing library macros against a
    /// standard library other than the compiler's own.
    #[arg(long = "cc", value_name = "PATH")]
    pub cc: Option<String>,

    /// Show how the compiler is invoked, without invoking it.
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Show how the compiler is invoked before invoking it.
    #[arg(long = "show-commands")]
    pub show_commands: bool,

    /// Directory receiving `individuals/<NAME>.cpp` (default: test).
    #[arg(long = "test-dir", value_name = "DIR")]
    pub test_dir: Option<PathBuf>,

    /// Extra arguments to the compiler, given after `--`.
    ///
    /// Everything after `--` is passed through, including words that look
    /// like `ftm` options.
    #[arg(last = true, value_name = "COMPILER_ARGS")]
    pub extra_args: Vec<String>,
}

#[derive(Parser)]
pub struct LintArgs {
    /// Print the reports as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct ImportArgs {
    /// libstdc++'s `include/bits/version.def`.
    #[arg(value_name = "VERSION_DEF")]
    pub version_def: PathBuf,

    /// Where to write the updated registry.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Attributes,
    Language,
    Library,
}

impl From<KindArg> for Kind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Attributes => Kind::Attributes,
            KindArg::Language => Kind::Language,
            KindArg::Library => Kind::Library,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ImplementationArg {
    Clang,
    Gcc,
    Msvc,
}

impl From<ImplementationArg> for Implementation {
    fn from(implementation: ImplementationArg) -> Self {
        match implementation {
            ImplementationArg::Clang => Implementation::Clang,
            ImplementationArg::Gcc => Implementation::Gcc,
            ImplementationArg::Msvc => Implementation::Msvc,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
