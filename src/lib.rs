pub mod args;
pub mod config;
pub mod data;
pub mod export;
pub mod report;
pub mod sales;
pub mod store;
pub mod tracker;
