//! cppreference summary table in MediaWiki markup.
//!
//! One table row per described history row. Each value is marked with the
//! standard it was introduced in, as decided by the classifier.

use std::fmt::Write as _;

use tracing::{debug, error};

use ftm_classify::{ClassificationWarning, classify};
use ftm_model::{Feature, HistoryRow, Kind, Registry, StandardLadder};

use crate::error::{ReportError, Result};

/// Names longer than this are split with `{{br}}`.
pub const NAME_BREAK_THRESHOLD: usize = 30;

const STD_COLUMN: &str = "! <abbr title=\"Standard in which the feature is introduced; DR means defect report against that revision\">Std</abbr>\n";

/// A rendered table and the inconsistencies found while building it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    pub text: String,
    pub warnings: Vec<ClassificationWarning>,
    /// Features with at least one described row.
    pub feature_count: usize,
}

struct TableRow<'a> {
    row: &'a HistoryRow,
    papers: Vec<&'a str>,
    mark: String,
}

impl TableRow<'_> {
    fn description(&self) -> &str {
        self.row.description.as_deref().unwrap_or_default()
    }
}

/// Where to split a long name: just after the first `_` at byte 15..25,
/// else at byte 10..30.
pub fn break_point(name: &str) -> Option<usize> {
    let find = |start: usize, end: usize| {
        name.bytes()
            .enumerate()
            .take(end)
            .skip(start)
            .find(|(_, byte)| *byte == b'_')
            .map(|(index, _)| index + 1)
    };
    find(15, 25).or_else(|| find(10, 30))
}

fn name_cell(name: &str) -> String {
    if name.len() <= NAME_BREAK_THRESHOLD {
        return format!("{{{{tt|{name}}}}} |");
    }
    let at = break_point(name).unwrap_or_else(|| {
        error!(name, "cannot find a break point");
        0
    });
    format!("{{{{tt|1={}{{{{br}}}}{}}}}} |", &name[..at], &name[at..])
}

fn header_cells(headers: &[String]) -> String {
    headers
        .iter()
        .map(|header| format!("{{{{header|{header}}}}}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Described rows with the papers of the undescribed rows before them.
fn table_rows<'a>(
    feature: &'a Feature,
    ladder: &StandardLadder,
) -> Result<(Vec<TableRow<'a>>, Vec<ClassificationWarning>)> {
    let mut described = Vec::new();
    let mut papers = Vec::new();
    for row in &feature.rows {
        papers.extend(row.papers.iter().map(String::as_str));
        if row.description.is_some() {
            described.push((row, std::mem::take(&mut papers)));
        }
    }

    let values: Vec<&HistoryRow> = described.iter().map(|(row, _)| *row).collect();
    let classified = classify(&feature.name, &values, ladder)?;
    let rows = described
        .into_iter()
        .zip(&classified.assignments)
        .map(|((row, papers), assignment)| TableRow {
            row,
            papers,
            mark: ladder.standard(assignment.rung).switch_name(),
        })
        .collect();
    Ok((rows, classified.warnings))
}

fn write_feature(out: &mut String, kind: Kind, feature: &Feature, rows: &[TableRow<'_>]) {
    let id = feature.name.strip_prefix("__").unwrap_or(&feature.name);
    let shared_headers = rows.len() > 1 && rows.iter().all(|row| row.row.header_list.is_none());

    for (index, row) in rows.iter().enumerate() {
        if index == 0 {
            let _ = writeln!(out, "|- id=\"{id}\"");
            if rows.len() > 1 {
                let _ = write!(out, "| rowspan=\"{}\" | ", rows.len());
            } else {
                out.push_str("| ");
            }
            out.push_str(&name_cell(&feature.name));
        } else {
            out.push_str("|-\n");
        }

        let _ = write!(out, "| {}", row.description());
        let _ = write!(out, " || {{{{c|{}L}}}}", row.row.value);

        if kind == Kind::Library {
            let headers = row
                .row
                .header_list
                .as_deref()
                .or(feature.header_list.as_deref())
                .unwrap_or_default();
            if headers.len() > 2 && shared_headers {
                if index == 0 {
                    let _ = write!(out, " || rowspan=\"{}\" | ", rows.len());
                    out.push_str(&header_cells(headers));
                }
            } else {
                out.push_str(" || ");
                out.push_str(&header_cells(headers));
            }
        }

        let _ = write!(out, " || {{{{mark {}}}}}", row.mark);
        if row.row.dr_against.is_some() {
            out.push_str("<br>{{mark|DR}}");
        }

        let papers = row
            .papers
            .iter()
            .map(|paper| format!("{{{{stddoc|{paper}}}}}"))
            .collect::<Vec<_>>()
            .join("<br>");
        let _ = writeln!(out, " || {papers}");
    }
}

fn table_header(kind: Kind) -> String {
    let mut header = String::from(
        "{| class=\"wikitable sortable\" style=\"font-size:90%;\"\n\
         |-\n\
         ! style=\"width:0\" | Macro name\n\
         ! Feature\n\
         ! Value\n",
    );
    if kind == Kind::Library {
        header.push_str("! Header\n");
    }
    header.push_str(STD_COLUMN);
    header.push_str("! Paper(s)\n");
    header
}

fn table_footer(kind: Kind, feature_count: usize) -> String {
    let (colspan, note) = match kind {
        Kind::Library => (6, "do not forget to update, see the talk page"),
        _ => (5, "update me, e.g., use the script on the talk page"),
    };
    format!(
        "|-\n! colspan=\"{colspan}\" | Total number of macros: {feature_count} <!-- {note} -->\n|}}"
    )
}

/// Render the summary table of every feature of `kind` still published.
///
/// Only language and library tables exist; attribute tables fail with
/// [`ReportError::UnsupportedKind`].
pub fn render_table(
    registry: &Registry,
    kind: Kind,
    ladder: &StandardLadder,
) -> Result<RenderedTable> {
    if kind == Kind::Attributes {
        return Err(ReportError::UnsupportedKind { kind });
    }

    let mut text = table_header(kind);
    let mut warnings = Vec::new();
    let mut feature_count = 0;
    for feature in registry.published(kind) {
        let (rows, feature_warnings) = table_rows(feature, ladder)?;
        debug!(
            feature = %feature.name,
            rows = rows.len(),
            warnings = feature_warnings.len(),
            "table rows"
        );
        warnings.extend(feature_warnings);
        if !rows.is_empty() {
            feature_count += 1;
        }
        write_feature(&mut text, kind, feature, &rows);
    }
    text.push_str(&table_footer(kind, feature_count));

    Ok(RenderedTable {
        text,
        warnings,
        feature_count,
    })
}
