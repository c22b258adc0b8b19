use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::record::{Branch, SalesRecord};
use super::table::Table;

pub const PRIOR_YEAR_SERIES: &str = "Sprzedaz_LY";
pub const CURRENT_SERIES: &str = "Sprzedaz_Current";

/// Number of columns the per-branch detail panels are spread over.
pub const DETAIL_COLUMNS: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub prior_year: Decimal,
    pub current: Decimal,
}

impl Totals {
    pub fn delta(&self) -> Decimal {
        self.current.saturating_sub(self.prior_year)
    }

    pub fn growth_percent(&self) -> Decimal {
        growth_percent(self.prior_year, self.current)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchTotals {
    pub branch: Branch,
    pub prior_year: Decimal,
    pub current: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: &'static str,
    pub values: Vec<Decimal>,
}

/// Grouped bar chart: one group per category, one bar per series.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

/// Sums saturate at `Decimal::MAX` rather than overflow.
pub fn totals(table: &Table) -> Totals {
    table.records_iter().fold(Totals::default(), |acc, record| Totals {
        prior_year: acc.prior_year.saturating_add(record.prior_year_sales()),
        current: acc.current.saturating_add(record.current_sales()),
    })
}

/// Year over year growth in percent. A non-positive prior year total has no
/// meaningful growth and is reported as zero. Growth too large for a `Decimal`
/// saturates at `Decimal::MAX`.
pub fn growth_percent(prior_year: Decimal, current: Decimal) -> Decimal {
    if prior_year <= dec!(0) {
        return dec!(0);
    }

    let ratio = current.checked_div(prior_year).unwrap_or(Decimal::MAX);
    ratio.saturating_sub(dec!(1)).saturating_mul(dec!(100))
}

/// Sums per branch present in the table, ordered by branch name.
pub fn by_branch(table: &Table) -> Vec<BranchTotals> {
    let mut groups: BTreeMap<&'static str, BranchTotals> = BTreeMap::new();
    for record in table.records_iter() {
        let group = groups.entry(record.branch().name()).or_insert(BranchTotals {
            branch: record.branch(),
            prior_year: Decimal::ZERO,
            current: Decimal::ZERO,
        });
        group.prior_year = group.prior_year.saturating_add(record.prior_year_sales());
        group.current = group.current.saturating_add(record.current_sales());
    }

    groups.into_values().collect()
}

pub fn by_branch_and_customer(table: &Table, branch: Branch) -> Vec<&SalesRecord> {
    table.records_iter().filter(|record| record.branch() == branch).collect()
}

/// Branches present in the table, sorted by name.
pub fn branches_present(table: &Table) -> Vec<Branch> {
    by_branch(table).into_iter().map(|group| group.branch).collect()
}

/// Deals the branches round-robin over `columns` columns: position `i` of the
/// sorted sequence lands in column `i % columns`.
pub fn layout_columns(branches: &[Branch], columns: usize) -> Vec<Vec<Branch>> {
    let mut sorted = branches.to_vec();
    sorted.sort_by_key(|branch| branch.name());

    let mut layout = vec![Vec::new(); columns];
    if columns == 0 {
        return layout;
    }

    for (i, branch) in sorted.into_iter().enumerate() {
        layout[i % columns].push(branch);
    }

    layout
}

pub fn branch_chart(table: &Table) -> BarChart {
    let groups = by_branch(table);

    BarChart {
        title: "Wyniki per Oddział".to_string(),
        categories: groups.iter().map(|group| group.branch.to_string()).collect(),
        series: vec![
            Series {
                name: PRIOR_YEAR_SERIES,
                values: groups.iter().map(|group| group.prior_year).collect(),
            },
            Series {
                name: CURRENT_SERIES,
                values: groups.iter().map(|group| group.current).collect(),
            },
        ],
    }
}

pub fn customer_chart(table: &Table, branch: Branch) -> BarChart {
    let records = by_branch_and_customer(table, branch);

    BarChart {
        title: format!("Oddział: {branch}"),
        categories: records.iter().map(|record| record.customer().clone()).collect(),
        series: vec![
            Series {
                name: PRIOR_YEAR_SERIES,
                values: records.iter().map(|record| record.prior_year_sales()).collect(),
            },
            Series {
                name: CURRENT_SERIES,
                values: records.iter().map(|record| record.current_sales()).collect(),
            },
        ],
    }
}
