use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::record::{Branch, SalesRecord};
use super::SalesError;

/// Column names of the persisted table, in file order.
pub const COLUMNS: [&str; 6] = ["Data", "Oddzial", "Klient", "Sprzedaz_LY", "Sprzedaz_Current", "Notatki"];

/// A line of the data file. Lines that do not make a valid record are kept as
/// their raw fields, in `COLUMNS` order, so saving the table writes them back.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Record(SalesRecord),
    Unparsed(Vec<String>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    pub fn new() -> Table {
        Table { rows: Vec::new() }
    }

    pub fn from_rows(rows: Vec<Row>) -> Table {
        Table { rows }
    }

    /// Records are appended as is, duplicates of (branch, customer) included.
    pub fn append(&mut self, record: SalesRecord) -> &Table {
        self.rows.push(Row::Record(record));
        self
    }

    /// Only the first record matching (branch, customer) is touched. Its current
    /// sales and timestamp are replaced and a non-empty note is appended to the
    /// existing one. The table is left unchanged when nothing matches.
    pub fn update(
        &mut self,
        branch: Branch,
        customer: &str,
        current_sales: Decimal,
        note: &str,
        now: NaiveDateTime,
    ) -> Result<&SalesRecord, SalesError> {
        let record = self
            .rows
            .iter_mut()
            .find_map(|row| match row {
                Row::Record(record) if record.matches(branch, customer) => Some(record),
                _ => None,
            })
            .ok_or_else(|| SalesError::RecordNotFound {
                branch,
                customer: customer.trim().to_string(),
            })?;

        record.set_current_sales(current_sales, now)?;
        record.append_note(note);

        Ok(record)
    }

    pub fn find(&self, branch: Branch, customer: &str) -> Option<&SalesRecord> {
        self.records_iter().find(|record| record.matches(branch, customer))
    }

    /// Unique customers of a branch, in the order they first appear.
    pub fn customers(&self, branch: Branch) -> Vec<&str> {
        let mut customers: Vec<&str> = Vec::new();
        for record in self.records_iter().filter(|record| record.branch() == branch) {
            if !customers.contains(&record.customer().as_str()) {
                customers.push(record.customer());
            }
        }

        customers
    }

    /// Records sorted by timestamp, most recent first. Ties keep table order.
    pub fn newest_first(&self) -> Vec<&SalesRecord> {
        let mut records: Vec<&SalesRecord> = self.records_iter().collect();
        records.sort_by(|a, b| b.timestamp().cmp(a.timestamp()));
        records
    }

    pub fn records_iter(&self) -> impl Iterator<Item = &SalesRecord> {
        self.rows.iter().filter_map(|row| match row {
            Row::Record(record) => Some(record),
            Row::Unparsed(_) => None,
        })
    }

    /// Every line of the table, unparsed ones included, in file order.
    pub fn rows_iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    pub fn unparsed_len(&self) -> usize {
        self.rows.iter().filter(|row| matches!(row, Row::Unparsed(_))).count()
    }

    /// Number of valid records.
    pub fn len(&self) -> usize {
        self.records_iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
