use std::fmt::Write;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::sales::aggregate::{self, BarChart, DETAIL_COLUMNS};
use crate::sales::table::{Table, COLUMNS};

const BAR_WIDTH: usize = 30;
const COLUMN_GAP: usize = 4;
const SERIES_MARKS: [char; 2] = ['░', '█'];

pub const NO_DATA: &str = "Brak danych. Dodaj klienta poleceniem `add`.";

/// Thousands separated, two decimals: `1,234.50`.
pub fn format_amount(value: Decimal) -> String {
    let text = format!("{:.2}", value.round_dp(2));
    let (sign, digits) = match text.strip_prefix('-') {
        Some(digits) => ("-", digits),
        None => ("", text.as_str()),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::new();
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}{grouped}.{fraction}")
}

pub fn format_growth(growth: Decimal) -> String {
    format!("{:.1}%", growth.round_dp(1))
}

pub fn render_metrics(table: &Table) -> Vec<String> {
    let totals = aggregate::totals(table);

    vec![
        format!("Baza (Rok Poprzedni):  {} T", format_amount(totals.prior_year)),
        format!(
            "Sprzedaż Bieżąca:      {} T ({} T)",
            format_amount(totals.current),
            format_amount(totals.delta())
        ),
        format!("Wydajność KAM (YoY):   {}", format_growth(totals.growth_percent())),
    ]
}

/// Horizontal grouped bars, scaled to the largest value in the chart.
pub fn render_chart(chart: &BarChart) -> Vec<String> {
    let mut lines = vec![chart.title.clone()];

    let max = chart
        .series
        .iter()
        .flat_map(|series| series.values.iter())
        .copied()
        .max()
        .unwrap_or(Decimal::ZERO);
    let label_width = chart.categories.iter().map(|c| c.chars().count()).max().unwrap_or(0);
    let series_width = chart.series.iter().map(|s| s.name.len()).max().unwrap_or(0);

    for (i, category) in chart.categories.iter().enumerate() {
        for (n, series) in chart.series.iter().enumerate() {
            let value = series.values.get(i).copied().unwrap_or(Decimal::ZERO);
            let label = if n == 0 { category.as_str() } else { "" };
            let mark = SERIES_MARKS[n % SERIES_MARKS.len()];
            let bar: String = std::iter::repeat(mark).take(bar_length(value, max)).collect();

            lines.push(format!(
                "  {} {:series_width$} {} {}",
                pad(label, label_width),
                series.name,
                bar,
                format_amount(value)
            ));
        }
    }

    lines
}

fn bar_length(value: Decimal, max: Decimal) -> usize {
    if max <= Decimal::ZERO || value <= Decimal::ZERO {
        return 0;
    }

    (value / max * Decimal::from(BAR_WIDTH)).round().to_usize().unwrap_or(0)
}

/// Pads by characters, `format!` width counts bytes for the Polish letters.
fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// Places rendered panels side by side, one list of lines per column.
pub fn side_by_side(columns: &[Vec<String>]) -> Vec<String> {
    let widths: Vec<usize> = columns
        .iter()
        .map(|lines| lines.iter().map(|line| line.chars().count()).max().unwrap_or(0))
        .collect();
    let height = columns.iter().map(Vec::len).max().unwrap_or(0);

    (0..height)
        .map(|row| {
            let mut line = String::new();
            for (column, lines) in columns.iter().enumerate() {
                let cell = lines.get(row).map(String::as_str).unwrap_or("");
                if column + 1 < columns.len() {
                    line.push_str(&pad(cell, widths[column] + COLUMN_GAP));
                } else {
                    line.push_str(cell);
                }
            }
            line.trim_end().to_string()
        })
        .collect()
}

pub fn render_details(table: &Table) -> Vec<String> {
    let branches = aggregate::branches_present(table);
    let columns: Vec<Vec<String>> = aggregate::layout_columns(&branches, DETAIL_COLUMNS)
        .into_iter()
        .map(|column| {
            let mut lines = Vec::new();
            for branch in column {
                lines.extend(render_chart(&aggregate::customer_chart(table, branch)));
                lines.push(String::new());
            }
            lines
        })
        .collect();

    side_by_side(&columns)
}

/// Summary table, most recent changes first.
pub fn render_table(table: &Table) -> Vec<String> {
    let rows: Vec<[String; 6]> = table
        .newest_first()
        .into_iter()
        .map(|record| {
            [
                record.timestamp().clone(),
                record.branch().to_string(),
                record.customer().clone(),
                format_amount(record.prior_year_sales()),
                format_amount(record.current_sales()),
                record.notes().clone(),
            ]
        })
        .collect();

    let mut widths = COLUMNS.map(|column| column.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: [&str; 6]| -> String {
        let padded: Vec<String> = cells.iter().zip(widths).map(|(cell, width)| pad(cell, width)).collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut lines = vec![format_row(COLUMNS)];
    for row in &rows {
        lines.push(format_row(row.each_ref().map(String::as_str)));
    }

    lines
}

pub fn render_dashboard(table: &Table) -> String {
    if table.is_empty() {
        return format!("{NO_DATA}\n");
    }

    let mut out = String::new();
    let mut section = |title: &str, lines: Vec<String>| {
        let _ = writeln!(out, "### {title}");
        for line in lines {
            let _ = writeln!(out, "{line}");
        }
        let _ = writeln!(out);
    };

    section("KAM Sales Tracker: Aktywacja", render_metrics(table));
    section("Wyniki per Oddział (Zagregowane)", render_chart(&aggregate::branch_chart(table)));
    section("Szczegółowa wydajność klientów w oddziałach", render_details(table));
    section("Tabela zbiorcza", render_table(table));

    out
}
