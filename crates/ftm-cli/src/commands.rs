use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, CellAlignment, Table};
use serde_yaml::Value;
use tracing::{info, info_span, warn};

use ftm_classify::{ClassificationReport, ClassificationWarning, WarningKind, lint_registry};
use ftm_generate::standard_switches;
use ftm_model::{Implementation, Kind, Registry, StandardLadder};
use ftm_registry::{
    ImportSummary, ProjectConfig, apply_glibcxx, data_env, load_registry, parse_registry,
    parse_version_def,
};
use ftm_report::{RenderedTable, render_table};

use ftm_cli::compiler::Compiler;
use ftm_cli::pipeline::{self, CheckOptions, CheckOutcome, write_testsuites};

use crate::cli::{CheckArgs, GenerateArgs, ImportArgs, LintArgs, TableArgs};
use crate::summary::{align_column, apply_table_style, dim_cell, header_cell, warning_table};

/// Settings resolved from the command line, `FTM_DATA` and `ftm.toml`.
pub struct Project {
    pub config: ProjectConfig,
    pub ladder: StandardLadder,
    pub data_path: PathBuf,
}

impl Project {
    pub fn open(data: Option<&Path>, config: Option<&Path>) -> Result<Self> {
        let config = match config {
            Some(path) => ProjectConfig::load(path),
            None => {
                let cwd = std::env::current_dir().context("resolve working directory")?;
                ProjectConfig::discover(&cwd)
            }
        }
        .context("load project config")?;
        let ladder = config.ladder().context("load standard ladder")?;
        let data_path = config.data_path(data, data_env());
        Ok(Self {
            config,
            ladder,
            data_path,
        })
    }

    fn registry(&self) -> Result<Registry> {
        load_registry(&self.data_path, &self.ladder)
            .with_context(|| format!("load registry {}", self.data_path.display()))
    }
}

pub fn run_generate(project: &Project, args: &GenerateArgs) -> Result<Vec<PathBuf>> {
    let registry = project.registry()?;
    let test_dir = project.config.test_dir(args.test_dir.as_deref());
    write_testsuites(&registry, &project.ladder, &test_dir)
}

pub fn run_table(project: &Project, args: &TableArgs) -> Result<RenderedTable> {
    let kind: Kind = args.kind.into();
    let span = info_span!("table", %kind);
    let _guard = span.enter();

    let registry = project.registry()?;
    let table = render_table(&registry, kind, &project.ladder)
        .with_context(|| format!("render {kind} table"))?;
    if !args.disable_warning {
        for warning in &table.warnings {
            let support = support_field(&registry, kind, warning);
            log_warning(warning, support.as_deref());
        }
    }
    match &args.output {
        Some(path) => {
            fs::write(path, format!("{}\n", table.text))
                .with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), features = table.feature_count, "table written");
        }
        None => println!("{}", table.text),
    }
    Ok(table)
}

pub fn run_check(project: &Project, args: &CheckArgs) -> Result<CheckOutcome> {
    let implementation: Implementation = args.implementation.into();
    let registry = project.registry()?;
    let test_dir = project.config.test_dir(args.test_dir.as_deref());
    let options = CheckOptions {
        compiler: Compiler::resolve(implementation, args.cc.as_deref()),
        extra_args: args.extra_args.clone(),
        dry_run: args.dry_run,
        show_commands: args.show_commands,
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();
    pipeline::run_check(
        &registry,
        &project.ladder,
        args.kind.into(),
        implementation,
        &test_dir,
        &options,
        &mut out,
    )
}

pub fn run_lint(project: &Project, args: &LintArgs) -> Result<Vec<ClassificationReport>> {
    let registry = project.registry()?;
    let reports = lint_registry(&registry, &project.ladder).context("classify registry")?;
    if args.json {
        let json = serde_json::to_string_pretty(&reports).context("serialize lint reports")?;
        println!("{json}");
    }
    Ok(reports)
}

pub fn run_import_glibcxx(project: &Project, args: &ImportArgs) -> Result<ImportSummary> {
    let span = info_span!("import_glibcxx", source = %args.version_def.display());
    let _guard = span.enter();

    let definitions = fs::read_to_string(&args.version_def)
        .with_context(|| format!("read {}", args.version_def.display()))?;
    let macros = parse_version_def(&definitions)
        .with_context(|| format!("parse {}", args.version_def.display()))?;

    let text = fs::read_to_string(&project.data_path)
        .with_context(|| format!("read {}", project.data_path.display()))?;
    let mut document: Value = serde_yaml::from_str(&text)
        .with_context(|| format!("parse {}", project.data_path.display()))?;
    let summary = apply_glibcxx(&mut document, &macros)?;

    let updated = serde_yaml::to_string(&document).context("serialize registry")?;
    parse_registry(&updated, &project.ladder).context("updated registry is invalid")?;
    fs::write(&args.output, updated)
        .with_context(|| format!("write {}", args.output.display()))?;
    info!(
        updated = summary.updated.len(),
        missing = summary.missing.len(),
        output = %args.output.display(),
        "gcc library support imported"
    );
    Ok(summary)
}

pub fn run_standards(project: &Project) -> Result<()> {
    let ladder = &project.ladder;
    let msvc = standard_switches(Implementation::Msvc, ladder);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Standard"),
        header_cell("Watermark"),
        header_cell("gcc / clang"),
        header_cell("msvc"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (standard, switch) in standard_switches(Implementation::Gcc, ladder) {
        let watermark = match standard.watermark {
            Some(watermark) => watermark.to_string(),
            None => "(working draft)".to_string(),
        };
        let msvc_switch = msvc
            .iter()
            .find(|(candidate, _)| candidate.name == standard.name)
            .map_or_else(|| dim_cell("-"), |(_, switch)| Cell::new(switch));
        table.add_row(vec![
            Cell::new(&standard.name),
            Cell::new(watermark),
            Cell::new(switch),
            msvc_switch,
        ]);
    }
    println!("{table}");
    Ok(())
}

/// The feature's support lists as JSON, attached to stale-value warnings
/// so the recorded implementation values can be compared at a glance.
fn support_field(
    registry: &Registry,
    kind: Kind,
    warning: &ClassificationWarning,
) -> Option<String> {
    if warning.kind != WarningKind::StaleValue {
        return None;
    }
    let feature = registry
        .features(kind)
        .iter()
        .find(|feature| feature.name == warning.feature)?;
    serde_json::to_string(&feature.support).ok()
}

/// Emit one classification warning as a structured event.
fn log_warning(warning: &ClassificationWarning, support: Option<&str>) {
    let previous = warning
        .previous
        .as_ref()
        .map(|previous| format!("{} {}", previous.standard, previous.value));
    warn!(
        feature = %warning.feature,
        kind = %warning.kind,
        standard = %warning.standard,
        value = warning.value,
        previous = previous.as_deref(),
        support,
        "{}",
        warning.headline()
    );
}

/// Warnings to list after a command, or `None` when there are none.
pub fn warnings_table<'a, I>(warnings: I) -> Option<Table>
where
    I: IntoIterator<Item = &'a ClassificationWarning>,
{
    let mut warnings = warnings.into_iter().peekable();
    warnings.peek()?;
    Some(warning_table(warnings))
}
