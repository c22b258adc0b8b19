use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::sales::record::Branch;

/// Key account sales tracker: prior year against current sales per customer and branch
#[derive(Debug, Parser)]
#[command(name = "kamtrack", version)]
pub struct Args {
    /// CSV file holding the sales records
    #[arg(long, env = "KAM_DATA_FILE", default_value = "kam_data.csv", global = true)]
    pub data: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a new customer to a branch
    Add {
        #[arg(long)]
        branch: Branch,
        #[arg(long)]
        customer: String,
        /// Sales in the previous year
        #[arg(long, default_value = "0")]
        prior: Decimal,
        /// Sales so far this year
        #[arg(long, default_value = "0")]
        current: Decimal,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Replace the current sales of a customer and append a note
    Update {
        #[arg(long)]
        branch: Branch,
        #[arg(long)]
        customer: String,
        #[arg(long)]
        current: Decimal,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// List the customers of a branch
    Customers {
        #[arg(long)]
        branch: Branch,
    },
    /// List the known branches
    Branches,
    /// Print metrics, charts and the summary table
    Dashboard,
    /// Print the table as CSV, most recent first
    Table,
    /// Write the table to a dated xlsx report
    Export {
        #[arg(long, env = "KAM_EXPORT_DIR", default_value = ".")]
        output_dir: PathBuf,
    },
}
