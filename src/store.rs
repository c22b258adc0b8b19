use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind};
use std::path::PathBuf;

use enum_dispatch::enum_dispatch;
use log::{info, warn};
use thiserror::Error;

use crate::data::{self, DataError};
use crate::sales::table::Table;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: DataError },
}

/// Whole-table persistence. Every save replaces the previous snapshot.
#[enum_dispatch]
pub trait Persistence {
    /// Never fails: a missing or unreadable source is an empty table.
    fn load(&self) -> Table;

    fn save(&mut self, table: &Table) -> Result<(), StoreError>;
}

#[enum_dispatch(Persistence)]
pub enum Store {
    CsvFileStore,
    MemoryStore,
}

/// Table kept in a single CSV file.
pub struct CsvFileStore {
    path: PathBuf,
}

impl CsvFileStore {
    pub fn new(path: impl Into<PathBuf>) -> CsvFileStore {
        CsvFileStore { path: path.into() }
    }
}

impl Persistence for CsvFileStore {
    fn load(&self) -> Table {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Table::new(),
            Err(err) => {
                warn!("failed to read {}, err={}", self.path.display(), err);
                return Table::new();
            },
        };

        data::decode_table(&bytes).unwrap_or_else(|| {
            warn!("{} could not be decoded, starting from an empty table", self.path.display());
            Table::new()
        })
    }

    fn save(&mut self, table: &Table) -> Result<(), StoreError> {
        let write = || -> Result<(), DataError> {
            let file = File::create(&self.path)?;
            data::write_table(BufWriter::new(file), table)
        };

        write().map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        info!("saved {} records to {}", table.len(), self.path.display());

        Ok(())
    }
}

/// Table kept in memory, used when nothing should touch the disk.
#[derive(Default)]
pub struct MemoryStore {
    table: Table,
}

impl MemoryStore {
    pub fn new(table: Table) -> MemoryStore {
        MemoryStore { table }
    }
}

impl Persistence for MemoryStore {
    fn load(&self) -> Table {
        self.table.clone()
    }

    fn save(&mut self, table: &Table) -> Result<(), StoreError> {
        self.table = table.clone();
        Ok(())
    }
}
