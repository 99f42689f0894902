//! `ftm`: feature-test macro registry toolkit.

use clap::{ColorChoice, Parser};
use ftm_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    Project, run_check, run_generate, run_import_glibcxx, run_lint, run_standards, run_table,
    warnings_table,
};
use crate::summary::print_lint_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let project = match Project::open(cli.data.as_deref(), cli.config.as_deref()) {
        Ok(project) => project,
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    };
    let exit_code = match &cli.command {
        Command::Generate(args) => match run_generate(&project, args) {
            Ok(paths) => {
                println!("Wrote {} test files", paths.len());
                0
            }
            Err(error) => report(&error),
        },
        Command::Table(args) => match run_table(&project, args) {
            Ok(table) => {
                if !args.disable_warning
                    && let Some(warnings) = warnings_table(&table.warnings)
                {
                    eprintln!("{warnings}");
                }
                0
            }
            Err(error) => report(&error),
        },
        Command::Check(args) => match run_check(&project, args) {
            Ok(outcome) => {
                if outcome.has_diagnostics() {
                    eprintln!(
                        "{} of {} compiler runs produced diagnostics",
                        outcome.diagnostics.len(),
                        outcome.invocations
                    );
                    1
                } else {
                    0
                }
            }
            Err(error) => report(&error),
        },
        Command::Lint(args) => match run_lint(&project, args) {
            Ok(reports) => {
                if !args.json {
                    if let Some(warnings) =
                        warnings_table(reports.iter().flat_map(|report| &report.warnings))
                    {
                        println!("{warnings}");
                    }
                    print_lint_summary(&reports);
                }
                0
            }
            Err(error) => report(&error),
        },
        Command::ImportGlibcxx(args) => match run_import_glibcxx(&project, args) {
            Ok(summary) => {
                println!(
                    "Updated {} macros; {} not in the registry",
                    summary.updated.len(),
                    summary.missing.len()
                );
                0
            }
            Err(error) => report(&error),
        },
        Command::Standards => match run_standards(&project) {
            Ok(()) => 0,
            Err(error) => report(&error),
        },
    };
    std::process::exit(exit_code);
}

fn report(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    1
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
