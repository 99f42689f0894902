use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ftm_classify::{ClassificationReport, ClassificationWarning, WarningKind};

const WARNING_KINDS: [WarningKind; 3] = [
    WarningKind::InvalidDefectReport,
    WarningKind::DefectReportOutOfOrder,
    WarningKind::StaleValue,
];

/// Warning counts per kind and source, one row per report.
pub fn print_lint_summary(reports: &[ClassificationReport]) {
    let mut table = Table::new();
    let mut header = vec![header_cell("Kind"), header_cell("Source"), header_cell("Features")];
    header.extend(WARNING_KINDS.iter().map(|kind| header_cell(kind.as_str())));
    header.push(header_cell("Total"));
    table.set_header(header);
    apply_summary_table_style(&mut table);
    for index in 2..table.column_count() {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut totals = [0usize; WARNING_KINDS.len()];
    let mut total_features = 0usize;
    for report in reports {
        total_features += report.features_checked;
        let mut row = vec![
            Cell::new(report.kind),
            source_cell(report),
            Cell::new(report.features_checked),
        ];
        for (total, kind) in totals.iter_mut().zip(WARNING_KINDS) {
            let count = report.count(kind);
            *total += count;
            row.push(count_cell(Some(count), Color::Yellow));
        }
        row.push(count_cell(Some(report.warning_count()), Color::Yellow));
        table.add_row(row);
    }

    let mut total_row = vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_features).add_attribute(Attribute::Bold),
    ];
    total_row.extend(
        totals
            .iter()
            .map(|count| count_cell(Some(*count), Color::Yellow).add_attribute(Attribute::Bold)),
    );
    total_row.push(
        count_cell(Some(totals.iter().sum()), Color::Yellow).add_attribute(Attribute::Bold),
    );
    table.add_row(total_row);
    println!("{table}");
}

/// One line per warning: feature, source, kind and the values involved.
pub fn warning_table<'a, I>(warnings: I) -> Table
where
    I: IntoIterator<Item = &'a ClassificationWarning>,
{
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Feature"),
        header_cell("Source"),
        header_cell("Warning"),
        header_cell("Standard"),
        header_cell("Value"),
        header_cell("Previous"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    for warning in warnings {
        let source = warning
            .implementation
            .map_or_else(|| "history".to_string(), |imp| imp.to_string());
        let previous = match &warning.previous {
            Some(previous) => Cell::new(format!("{} {}", previous.standard, previous.value)),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(&warning.feature),
            Cell::new(source),
            Cell::new(warning.kind).fg(Color::Yellow),
            Cell::new(&warning.standard),
            Cell::new(warning.value),
            previous,
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn source_cell(report: &ClassificationReport) -> Cell {
    match report.implementation {
        Some(implementation) => Cell::new(implementation),
        None => Cell::new(report.source_label()).fg(Color::DarkGrey),
    }
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
