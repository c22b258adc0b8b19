use thiserror::Error;

pub mod aggregate;
pub mod record;
pub mod table;

#[cfg(test)]
mod table_tests;

use record::Branch;

#[derive(Debug, PartialEq, Error)]
pub enum SalesError {
    #[error("unknown branch: {0}")]
    UnknownBranch(String),
    #[error("sales amount can not be negative")]
    NegativeAmount,
    #[error("customer name is required")]
    MissingCustomer,
    #[error("customer {customer} not found in branch {branch}")]
    RecordNotFound { branch: Branch, customer: String },
}
