use anyhow::Result;
use chrono::NaiveDateTime;
use log::{debug, info, warn};
use rust_decimal::Decimal;

use crate::sales::record::{Branch, NewCustomer, SalesRecord};
use crate::sales::table::Table;
use crate::sales::SalesError;
use crate::store::{Persistence, Store};

#[derive(Debug, PartialEq)]
pub enum AddOutcome {
    Added(SalesRecord),
    /// Blank customer name, nothing was stored.
    Ignored,
}

#[derive(Debug, PartialEq)]
pub enum UpdateOutcome {
    Updated(SalesRecord),
    NoCustomers(Branch),
    NotFound { branch: Branch, customer: String },
}

/// Runs each user action as one reload-mutate-save cycle against the store.
pub struct Tracker {
    store: Store,
}

impl Tracker {
    pub fn new(store: impl Into<Store>) -> Tracker {
        Tracker { store: store.into() }
    }

    pub fn table(&self) -> Table {
        self.store.load()
    }

    pub fn add_customer(&mut self, input: NewCustomer, now: NaiveDateTime) -> Result<AddOutcome> {
        let record = match SalesRecord::create(input, now) {
            Ok(record) => record,
            Err(SalesError::MissingCustomer) => {
                debug!("ignoring new customer without a name");
                return Ok(AddOutcome::Ignored);
            },
            Err(err) => return Err(err.into()),
        };

        let mut table = self.store.load();
        table.append(record.clone());
        self.store.save(&table)?;
        info!("added customer {} to {}", record.customer(), record.branch());

        Ok(AddOutcome::Added(record))
    }

    pub fn update_customer(
        &mut self,
        branch: Branch,
        customer: &str,
        current_sales: Decimal,
        note: &str,
        now: NaiveDateTime,
    ) -> Result<UpdateOutcome> {
        let mut table = self.store.load();
        if table.customers(branch).is_empty() {
            warn!("no customers in {}", branch);
            return Ok(UpdateOutcome::NoCustomers(branch));
        }

        let updated = match table.update(branch, customer, current_sales, note, now) {
            Ok(record) => record.clone(),
            Err(SalesError::RecordNotFound { branch, customer }) => {
                warn!("customer {} not found in {}, nothing updated", customer, branch);
                return Ok(UpdateOutcome::NotFound { branch, customer });
            },
            Err(err) => return Err(err.into()),
        };

        self.store.save(&table)?;
        info!("updated customer {} in {}", customer, branch);

        Ok(UpdateOutcome::Updated(updated))
    }
}
