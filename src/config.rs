use std::path::{Path, PathBuf};

use crate::args::{Args, Command};
use crate::store::{CsvFileStore, Store};

/// Settings resolved from the command line and environment.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_file: PathBuf,
    pub export_dir: Option<PathBuf>,
}

impl Config {
    pub fn store(&self) -> Store {
        Store::from(CsvFileStore::new(&self.data_file))
    }

    pub fn export_path(&self, file_name: &str) -> PathBuf {
        self.export_dir.as_deref().unwrap_or(Path::new(".")).join(file_name)
    }
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        let export_dir = match &args.command {
            Command::Export { output_dir } => Some(output_dir.clone()),
            _ => None,
        };

        Config {
            data_file: args.data.clone(),
            export_dir,
        }
    }
}
