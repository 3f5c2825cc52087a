use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use access_cli::pipeline::PipelineResult;
use access_ingest::format_numeric;
use access_report::{CategoryCount, DashboardReport};
use access_store::PersistReport;
use access_transform::ImputationSkip;

pub fn print_merge_summary(result: &PipelineResult) {
    println!("Profiles: {}", result.profiles);
    println!("Feedback: {}", result.feedback);
    match &result.persisted {
        Some(report) => println!(
            "Output: {} (table {})",
            report.database.display(),
            report.table
        ),
        None => println!(
            "Output: {} (table {}, dry run, not written)",
            result.output.database.display(),
            result.output.table
        ),
    }

    let stats = &result.stats;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Stage"), header_cell("Rows"), header_cell("Notes")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![
        stage_cell("Profiles"),
        Cell::new(stats.profile_rows),
        note_cell(stats.unmatched_profiles, "without feedback"),
    ]);
    table.add_row(vec![
        stage_cell("Feedback"),
        Cell::new(stats.feedback_rows),
        note_cell(stats.unmatched_feedback, "without a profile"),
    ]);
    table.add_row(vec![
        stage_cell("Merged"),
        count_cell(stats.merged_rows, Color::Green),
        if stats.renamed_columns.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(format!("suffixed: {}", stats.renamed_columns.join(", ")))
        },
    ]);
    let imputation = &stats.imputation;
    table.add_row(vec![
        stage_cell("Imputed"),
        count_cell(imputation.filled, Color::Yellow),
        imputation_cell(
            &imputation.column,
            imputation.fill_value,
            imputation.skipped,
        ),
    ]);
    println!("{table}");
    println!("Fingerprint: {}", result.fingerprint);
}

pub fn print_stage_summary(report: &PersistReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Database"),
        header_cell("Table"),
        header_cell("Rows"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    table.add_row(vec![
        Cell::new(report.database.display()),
        stage_cell(&report.table),
        Cell::new(report.rows),
        Cell::new(report.columns),
    ]);
    println!("{table}");
    println!("Fingerprint: {}", report.fingerprint);
}

pub fn print_report(report: &DashboardReport) {
    match &report.country_filter {
        Some(country) => println!("Country: {country}"),
        None => println!("Country: all ({} available)", report.available_countries.len()),
    }
    println!("Rows: {} of {}", report.selected_rows, report.total_rows);

    let kpis = &report.kpis;
    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    table.add_row(vec![Cell::new("Patients"), Cell::new(kpis.patients)]);
    table.add_row(vec![Cell::new("Countries"), Cell::new(kpis.countries)]);
    table.add_row(vec![
        Cell::new("Accessibility types"),
        Cell::new(kpis.accessibility_types),
    ]);
    table.add_row(vec![
        Cell::new("Average satisfaction"),
        optional_number_cell(kpis.average_satisfaction),
    ]);
    println!("{table}");

    print_counts("Top countries", &report.top_countries);

    if !report.satisfaction_by_accessibility.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Accessibility type"),
            header_cell("Mean satisfaction"),
            header_cell("Rows"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        align_column(&mut table, 2, CellAlignment::Right);
        for entry in &report.satisfaction_by_accessibility {
            table.add_row(vec![
                Cell::new(&entry.label),
                Cell::new(round2(entry.mean)),
                Cell::new(entry.count),
            ]);
        }
        println!();
        println!("Satisfaction by accessibility type:");
        println!("{table}");
    }

    if !report.gender_balance.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![
            header_cell("Gender"),
            header_cell("Rows"),
            header_cell("Share"),
        ]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        align_column(&mut table, 2, CellAlignment::Right);
        for entry in &report.gender_balance {
            table.add_row(vec![
                Cell::new(&entry.label),
                Cell::new(entry.count),
                Cell::new(format!("{:.1}%", entry.percent)),
            ]);
        }
        println!();
        println!("Gender balance:");
        println!("{table}");
    }

    print_counts("Issue types", &report.issue_types);

    if !report.age_histogram.is_empty() {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Age"), header_cell("Rows")]);
        apply_table_style(&mut table);
        align_column(&mut table, 1, CellAlignment::Right);
        for bin in &report.age_histogram {
            table.add_row(vec![
                Cell::new(format!("{} - {}", round2(bin.lower), round2(bin.upper))),
                if bin.count == 0 {
                    dim_cell(0)
                } else {
                    Cell::new(bin.count)
                },
            ]);
        }
        println!();
        println!("Age distribution:");
        println!("{table}");
    }

    print_counts("Device usage", &report.device_usage);

    if !report.preview.rows.is_empty() {
        let mut table = Table::new();
        table.set_header(
            report
                .preview
                .columns
                .iter()
                .map(|name| header_cell(name))
                .collect::<Vec<_>>(),
        );
        apply_preview_table_style(&mut table);
        for row in &report.preview.rows {
            table.add_row(row.iter().map(|value| {
                if value.is_empty() {
                    dim_cell("-")
                } else {
                    Cell::new(value)
                }
            }));
        }
        println!();
        println!("Preview ({} rows):", report.preview.rows.len());
        println!("{table}");
    }
}

fn print_counts(title: &str, counts: &[CategoryCount]) {
    if counts.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Value"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for entry in counts {
        table.add_row(vec![Cell::new(&entry.label), Cell::new(entry.count)]);
    }
    println!();
    println!("{title}:");
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
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
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(120);
}

fn apply_preview_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(200);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn stage_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn note_cell(unmatched: usize, label: &str) -> Cell {
    if unmatched > 0 {
        Cell::new(format!("{unmatched} {label}")).fg(Color::Yellow)
    } else {
        dim_cell("-")
    }
}

fn imputation_cell(column: &str, fill_value: Option<f64>, skipped: Option<ImputationSkip>) -> Cell {
    match (skipped, fill_value) {
        (Some(ImputationSkip::Disabled), _) => dim_cell("disabled"),
        (Some(ImputationSkip::ColumnMissing), _) => {
            Cell::new(format!("{column} not present")).fg(Color::Yellow)
        }
        (Some(ImputationSkip::NoObservedValues), _) => {
            Cell::new(format!("{column} has no values to average")).fg(Color::Yellow)
        }
        (None, Some(value)) => Cell::new(format!("{column} mean {}", round2(value))),
        (None, None) => dim_cell("-"),
    }
}

fn optional_number_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(round2(value)),
        None => dim_cell("-"),
    }
}

fn round2(value: f64) -> String {
    format_numeric((value * 100.0).round() / 100.0)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
