use anyhow::{bail, Result};
use chrono::{NaiveDate, NaiveDateTime};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::record::{Branch, SalesRecord};
use super::table::Table;
use super::SalesError;

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, day).unwrap().and_hms_opt(hour, minute, 0).unwrap()
}

fn record(branch: Branch, customer: &str, prior_year: Decimal, current: Decimal, notes: &str) -> Result<SalesRecord> {
    Ok(SalesRecord::new(
        "2024-05-01 08:00".to_string(),
        branch,
        customer.to_string(),
        prior_year,
        current,
        notes.to_string(),
    )?)
}

fn sample_table() -> Result<Table> {
    let mut table = Table::new();
    table.append(record(Branch::Konin, "Acme", dec!(100), dec!(120), "")?);
    table.append(record(Branch::Opole, "Acme", dec!(50), dec!(60), "call in June")?);
    table.append(record(Branch::Konin, "Beta", dec!(10), dec!(0), "A")?);

    Ok(table)
}

#[test]
fn test_append() -> Result<()> {
    let mut table = sample_table()?;
    let before = table.clone();

    let added = record(Branch::Katowice, "Gamma", dec!(1), dec!(2), "")?;
    table.append(added.clone());

    assert_eq!(table.len(), before.len() + 1);
    for (old, new) in before.records_iter().zip(table.records_iter()) {
        assert_eq!(old, new);
    }
    assert_eq!(table.records_iter().last(), Some(&added));

    Ok(())
}

#[test]
fn test_append_keeps_duplicates() -> Result<()> {
    let mut table = sample_table()?;
    table.append(record(Branch::Konin, "Acme", dec!(1), dec!(1), "")?);

    assert_eq!(table.len(), 4);
    assert_eq!(table.customers(Branch::Konin), vec!["Acme", "Beta"]);

    Ok(())
}

#[test]
fn test_update() -> Result<()> {
    let mut table = sample_table()?;
    let before = table.clone();

    table.update(Branch::Konin, "Acme", dec!(500), "follow up", at(7, 14, 5))?;

    let updated = table.find(Branch::Konin, "Acme").unwrap();
    assert_eq!(updated.current_sales(), dec!(500));
    assert_eq!(updated.prior_year_sales(), dec!(100));
    assert_eq!(updated.timestamp(), "2024-05-07 14:05");
    assert!(updated.notes().ends_with("follow up"));
    assert_eq!(updated.notes(), "follow up");

    // every other row is left alone
    for (old, new) in before.records_iter().zip(table.records_iter()).skip(1) {
        assert_eq!(old, new);
    }

    Ok(())
}

#[test]
fn test_update_appends_note() -> Result<()> {
    let mut table = sample_table()?;
    table.update(Branch::Konin, "Beta", dec!(3), "B", at(2, 9, 0))?;

    assert_eq!(table.find(Branch::Konin, "Beta").unwrap().notes(), "A | B");

    Ok(())
}

#[test]
fn test_update_without_note_keeps_note() -> Result<()> {
    let mut table = sample_table()?;
    table.update(Branch::Opole, "Acme", dec!(70), "", at(2, 9, 0))?;

    let updated = table.find(Branch::Opole, "Acme").unwrap();
    assert_eq!(updated.notes(), "call in June");
    assert_eq!(updated.current_sales(), dec!(70));

    Ok(())
}

#[test]
fn test_update_first_match_only() -> Result<()> {
    let mut table = sample_table()?;
    table.append(record(Branch::Konin, "Acme", dec!(1), dec!(1), "")?);
    table.update(Branch::Konin, "Acme", dec!(9), "", at(2, 9, 0))?;

    let acme: Vec<Decimal> = table
        .records_iter()
        .filter(|record| record.matches(Branch::Konin, "Acme"))
        .map(|record| record.current_sales())
        .collect();
    assert_eq!(acme, vec![dec!(9), dec!(1)]);

    Ok(())
}

#[test]
fn test_update_not_found() -> Result<()> {
    let mut table = sample_table()?;
    let before = table.clone();

    if let Err(err) = table.update(Branch::Warszawa, "Acme", dec!(1), "x", at(2, 9, 0)) {
        assert_eq!(
            err,
            SalesError::RecordNotFound {
                branch: Branch::Warszawa,
                customer: "Acme".to_string()
            }
        );
    } else {
        bail!("update should not create a new record");
    }

    assert_eq!(table, before);

    Ok(())
}

#[test]
fn test_update_negative_amount() -> Result<()> {
    let mut table = sample_table()?;
    let before = table.clone();

    if let Err(err) = table.update(Branch::Konin, "Acme", dec!(-1), "x", at(2, 9, 0)) {
        assert_eq!(err, SalesError::NegativeAmount);
    } else {
        bail!("negative amounts should not be allowed");
    }

    assert_eq!(table, before);

    Ok(())
}

#[test]
fn test_newest_first() -> Result<()> {
    let mut table = sample_table()?;
    table.update(Branch::Konin, "Beta", dec!(3), "", at(9, 9, 0))?;
    table.update(Branch::Opole, "Acme", dec!(3), "", at(3, 9, 0))?;

    let customers: Vec<(Branch, &str)> = table
        .newest_first()
        .into_iter()
        .map(|record| (record.branch(), record.customer().as_str()))
        .collect();
    assert_eq!(
        customers,
        vec![(Branch::Konin, "Beta"), (Branch::Opole, "Acme"), (Branch::Konin, "Acme")]
    );

    Ok(())
}
