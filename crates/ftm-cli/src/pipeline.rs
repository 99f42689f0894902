//! File-producing stages shared by the `generate` and `check` commands.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, info_span};

use ftm_generate::{individual_test, testsuite};
use ftm_model::{Implementation, Kind, Registry, StandardLadder};

use crate::compiler::{self, Compiler, display_command, probe_line};

pub const INDIVIDUALS_DIR: &str = "individuals";

/// `<test_dir>/<kind>/<implementation>.cpp`.
pub fn testsuite_path(test_dir: &Path, kind: Kind, implementation: Implementation) -> PathBuf {
    test_dir
        .join(kind.as_str())
        .join(format!("{}.cpp", implementation.as_str()))
}

/// Write the test file of every (kind, implementation) pair.
pub fn write_testsuites(
    registry: &Registry,
    ladder: &StandardLadder,
    test_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for kind in Kind::ALL {
        let span = info_span!("generate", %kind);
        let _guard = span.enter();
        let dir = test_dir.join(kind.as_str());
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        for implementation in Implementation::ALL {
            let text = testsuite(registry, kind, implementation, ladder)
                .with_context(|| format!("generate {kind} tests for {implementation}"))?;
            let path = testsuite_path(test_dir, kind, implementation);
            fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
            debug!(path = %path.display(), "wrote test file");
            written.push(path);
        }
    }
    info!(files = written.len(), "test files written");
    Ok(written)
}

/// How `check` runs the compiler.
#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub compiler: Compiler,
    pub extra_args: Vec<String>,
    pub dry_run: bool,
    pub show_commands: bool,
}

/// One preprocessor run that printed diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub feature: String,
    pub options: Vec<String>,
    pub message: String,
    /// The probe line from stdout, showing what the identifier expanded to.
    pub probe: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CheckOutcome {
    pub features: usize,
    pub invocations: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckOutcome {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Write each active feature's individual test and preprocess it under
/// every option combination.
///
/// Progress and diagnostics go to `out` as they happen. With
/// `dry_run`, nothing is written or run; the plan is printed instead.
pub fn run_check<W: Write>(
    registry: &Registry,
    ladder: &StandardLadder,
    kind: Kind,
    implementation: Implementation,
    test_dir: &Path,
    options: &CheckOptions,
    out: &mut W,
) -> Result<CheckOutcome> {
    let span = info_span!("check", %kind, %implementation);
    let _guard = span.enter();

    if options.dry_run {
        writeln!(out, "Dry run...")?;
    }
    let dir = test_dir.join(INDIVIDUALS_DIR);
    if options.dry_run {
        writeln!(out, "Would touch {}", dir.display())?;
    } else {
        fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    }

    let mut outcome = CheckOutcome::default();
    for feature in registry.active(kind, implementation) {
        let test = individual_test(feature, implementation, ladder)
            .with_context(|| format!("generate test for {}", feature.name))?;
        let path = dir.join(format!("{}.cpp", test.name));
        if options.dry_run {
            writeln!(out, "Would create {}", path.display())?;
        } else {
            fs::write(&path, &test.source).with_context(|| format!("write {}", path.display()))?;
        }
        outcome.features += 1;

        for invocation in &test.invocations {
            let command_line = options
                .compiler
                .command_line(&options.extra_args, invocation, &path);
            if options.dry_run || options.show_commands {
                writeln!(out, "{}", display_command(&command_line))?;
            }
            outcome.invocations += 1;
            if options.dry_run {
                continue;
            }

            let output = compiler::run(&command_line)
                .with_context(|| format!("run {}", options.compiler.program))?;
            let message = options.compiler.diagnostics(&output.stderr);
            if message.is_empty() {
                continue;
            }
            let probe = probe_line(&output.stdout, &test.probe).map(str::to_string);
            writeln!(out, "{message}")?;
            writeln!(out, "compiler options:  {}", invocation.join(" "))?;
            if let Some(line) = &probe {
                writeln!(out, "{line}")?;
            }
            outcome.diagnostics.push(Diagnostic {
                feature: test.name.clone(),
                options: invocation.clone(),
                message: message.to_string(),
                probe,
            });
        }
        debug!(feature = %test.name, invocations = test.invocations.len(), "feature checked");
    }
    info!(
        features = outcome.features,
        invocations = outcome.invocations,
        diagnostics = outcome.diagnostics.len(),
        "check finished"
    );
    Ok(outcome)
}
