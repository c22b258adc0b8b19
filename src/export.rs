use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Workbook, XlsxError};

use crate::sales::table::{Row, Table, COLUMNS};

pub const SHEET_NAME: &str = "Raport";

/// Name of the downloaded report, e.g. `Raport_KAM_07_03.xlsx`.
pub fn file_name(date: NaiveDate) -> String {
    format!("Raport_KAM_{}.xlsx", date.format("%d_%m"))
}

/// Single sheet workbook: the header row followed by every row, in table
/// order and without any formatting. Unparsed rows are written as text.
pub fn to_xlsx(table: &Table) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, column) in COLUMNS.iter().enumerate() {
        worksheet.write_string(0, col as u16, *column)?;
    }

    for (i, row) in table.rows_iter().enumerate() {
        let row_number = i as u32 + 1;
        let record = match row {
            Row::Record(record) => record,
            Row::Unparsed(fields) => {
                for (col, field) in fields.iter().enumerate().filter(|(_, field)| !field.is_empty()) {
                    worksheet.write_string(row_number, col as u16, field)?;
                }
                continue;
            },
        };

        worksheet.write_string(row_number, 0, record.timestamp())?;
        worksheet.write_string(row_number, 1, record.branch().name())?;
        worksheet.write_string(row_number, 2, record.customer())?;
        worksheet.write_number(row_number, 3, record.prior_year_sales().to_f64().unwrap_or_default())?;
        worksheet.write_number(row_number, 4, record.current_sales().to_f64().unwrap_or_default())?;
        if !record.notes().is_empty() {
            worksheet.write_string(row_number, 5, record.notes())?;
        }
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::sales::record::{Branch, SalesRecord};

    #[test]
    fn test_file_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(file_name(date), "Raport_KAM_07_03.xlsx");
    }

    #[test]
    fn test_to_xlsx() -> Result<()> {
        let mut table = Table::new();
        table.append(SalesRecord::new(
            "2024-05-01 08:00".to_string(),
            Branch::Katowice,
            "Acme".to_string(),
            dec!(100),
            dec!(120.5),
            "A | B".to_string(),
        )?);

        let bytes = to_xlsx(&table)?;
        // xlsx is a zip archive
        assert!(bytes.starts_with(b"PK"));

        Ok(())
    }

    #[test]
    fn test_empty_table_exports() -> Result<()> {
        assert!(!to_xlsx(&Table::new())?.is_empty());
        Ok(())
    }
}
