use std::borrow::Cow;
use std::io::{Read, Write};

use chardetng::EncodingDetector;
use csv::StringRecord;
use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sales::record::{Branch, SalesRecord};
use crate::sales::table::{Row, Table, COLUMNS};
use crate::sales::SalesError;

/// Written in front of the CSV so spreadsheet tools pick UTF-8.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum DataError {
    #[error("file is not valid {0} text")]
    Undecodable(&'static str),
    #[error("missing column {0}")]
    MissingColumn(&'static str),
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    Sales(#[from] SalesError),
}

/// One line of the data file, as it is stored.
#[derive(Debug, Deserialize, Serialize)]
pub struct SalesRow {
    #[serde(rename = "Data")]
    pub timestamp: String,
    #[serde(rename = "Oddzial")]
    pub branch: String,
    #[serde(rename = "Klient")]
    pub customer: String,
    #[serde(rename = "Sprzedaz_LY")]
    pub prior_year_sales: Decimal,
    #[serde(rename = "Sprzedaz_Current")]
    pub current_sales: Decimal,
    #[serde(rename = "Notatki", default)]
    pub notes: String,
}

impl From<&SalesRecord> for SalesRow {
    fn from(record: &SalesRecord) -> Self {
        SalesRow {
            timestamp: record.timestamp().clone(),
            branch: record.branch().name().to_string(),
            customer: record.customer().clone(),
            prior_year_sales: record.prior_year_sales(),
            current_sales: record.current_sales(),
            notes: record.notes().clone(),
        }
    }
}

impl TryFrom<SalesRow> for SalesRecord {
    type Error = SalesError;

    fn try_from(row: SalesRow) -> Result<Self, Self::Error> {
        let branch: Branch = row.branch.parse()?;
        SalesRecord::new(
            row.timestamp,
            branch,
            row.customer,
            row.prior_year_sales,
            row.current_sales,
            row.notes,
        )
    }
}

/// Decodes the raw file contents, trying the detected encoding first and
/// falling back to a lossy UTF-8 read. Returns `None` when neither produces a
/// readable table.
pub fn decode_table(bytes: &[u8]) -> Option<Table> {
    if bytes.is_empty() {
        return Some(Table::new());
    }

    let strict = decode_detected(bytes).and_then(|text| read_table(text.as_bytes()));
    match strict {
        Ok(table) => Some(table),
        Err(err) => {
            warn!("failed to read data file, retrying with lossy decoding, err={}", err);
            match read_table(decode_lossy(bytes).as_bytes()) {
                Ok(table) => Some(table),
                Err(err) => {
                    warn!("lossy read of data file failed, err={}", err);
                    None
                }
            }
        }
    }
}

/// Strict decode. A byte order mark decides the encoding, otherwise the bytes
/// are sniffed. Plain ASCII gives no signal and is read as UTF-8.
pub fn decode_detected(bytes: &[u8]) -> Result<Cow<str>, DataError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_length)) => (encoding, &bytes[bom_length..]),
        None => (detect_encoding(bytes), bytes),
    };
    debug!("decoding data file as {}", encoding.name());

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or(DataError::Undecodable(encoding.name()))
}

fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    if !detector.feed(bytes, true) {
        return UTF_8;
    }

    detector.guess(None, true)
}

/// UTF-8 decode that drops whatever does not decode.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let (text, _) = UTF_8.decode_with_bom_removal(bytes);
    text.replace(char::REPLACEMENT_CHARACTER, "")
}

/// Rows that do not make a valid record are kept unparsed, in `COLUMNS`
/// order, so they survive the next save.
pub fn read_table<R: Read>(reader: R) -> Result<Table, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    // the notes column is optional
    for column in COLUMNS.into_iter().take(5) {
        if !headers.iter().any(|header| header == column) {
            return Err(DataError::MissingColumn(column));
        }
    }

    let mut rows = Vec::new();
    for line in csv_reader.records() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!("failed to read sales record, err={}", err);
                continue;
            },
        };

        let record = line
            .deserialize::<SalesRow>(Some(&headers))
            .map_err(DataError::from)
            .and_then(|row| Ok(SalesRecord::try_from(row)?));
        match record {
            Ok(record) => rows.push(Row::Record(record)),
            Err(err) => {
                warn!("keeping invalid sales record as is, err={}", err);
                rows.push(Row::Unparsed(raw_fields(&headers, &line)));
            },
        }
    }

    Ok(Table::from_rows(rows))
}

fn raw_fields(headers: &StringRecord, line: &StringRecord) -> Vec<String> {
    COLUMNS
        .iter()
        .map(|column| {
            headers
                .iter()
                .position(|header| header == *column)
                .and_then(|i| line.get(i))
                .unwrap_or_default()
                .to_string()
        })
        .collect()
}

/// Writes the whole table as UTF-8 CSV with a byte order mark. The header row
/// is written even when the table is empty.
pub fn write_table<W: Write>(mut writer: W, table: &Table) -> Result<(), DataError> {
    writer.write_all(UTF8_BOM)?;

    let mut csv_writer = csv_writer(writer)?;
    for row in table.rows_iter() {
        match row {
            Row::Record(record) => csv_writer.serialize(SalesRow::from(record))?,
            Row::Unparsed(fields) => csv_writer.write_record(fields)?,
        }
    }
    csv_writer.flush()?;

    Ok(())
}

/// Writes records only, without a byte order mark.
pub fn write_rows<'a, W: Write>(writer: W, records: impl Iterator<Item = &'a SalesRecord>) -> Result<(), DataError> {
    let mut csv_writer = csv_writer(writer)?;
    for record in records {
        csv_writer.serialize(SalesRow::from(record))?;
    }
    csv_writer.flush()?;

    Ok(())
}

fn csv_writer<W: Write>(writer: W) -> Result<csv::Writer<W>, DataError> {
    let mut csv_writer = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    csv_writer.write_record(COLUMNS)?;

    Ok(csv_writer)
}
