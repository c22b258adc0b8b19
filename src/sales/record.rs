use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use getset::{CopyGetters, Getters};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::SalesError;

/// Format of the `Data` column, minute precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

pub const NOTE_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    Konin,
    Gdansk,
    Olsztyn,
    Bialystok,
    Warszawa,
    Rzeszow,
    Wroclaw,
    Opole,
    Katowice,
    DabrowaGornicza,
}

impl Branch {
    /// All branches, in the order the selector lists them.
    pub const ALL: [Branch; 10] = [
        Branch::Konin,
        Branch::Gdansk,
        Branch::Olsztyn,
        Branch::Bialystok,
        Branch::Warszawa,
        Branch::Rzeszow,
        Branch::Wroclaw,
        Branch::Opole,
        Branch::Katowice,
        Branch::DabrowaGornicza,
    ];

    /// Display name, also the value stored in the data file.
    pub fn name(&self) -> &'static str {
        match self {
            Branch::Konin => "Konin",
            Branch::Gdansk => "Gdańsk",
            Branch::Olsztyn => "Olsztyn",
            Branch::Bialystok => "Białystok",
            Branch::Warszawa => "Warszawa",
            Branch::Rzeszow => "Rzeszów",
            Branch::Wroclaw => "Wrocław",
            Branch::Opole => "Opole",
            Branch::Katowice => "Katowice",
            Branch::DabrowaGornicza => "Dąbrowa G.",
        }
    }

    fn ascii_name(&self) -> &'static str {
        match self {
            Branch::Gdansk => "Gdansk",
            Branch::Bialystok => "Bialystok",
            Branch::Rzeszow => "Rzeszow",
            Branch::Wroclaw => "Wroclaw",
            Branch::DabrowaGornicza => "Dabrowa G.",
            other => other.name(),
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Branch {
    type Err = SalesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Branch::ALL
            .into_iter()
            .find(|branch| {
                branch.name().to_lowercase() == s.to_lowercase() || branch.ascii_name().eq_ignore_ascii_case(s)
            })
            .ok_or_else(|| SalesError::UnknownBranch(s.to_string()))
    }
}

/// Input of the "new customer" form.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub branch: Branch,
    pub customer: String,
    pub prior_year_sales: Decimal,
    pub current_sales: Decimal,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct SalesRecord {
    #[getset(get = "pub")]
    timestamp: String,
    #[getset(get_copy = "pub")]
    branch: Branch,
    #[getset(get = "pub")]
    customer: String,
    #[getset(get_copy = "pub")]
    prior_year_sales: Decimal,
    #[getset(get_copy = "pub")]
    current_sales: Decimal,
    #[getset(get = "pub")]
    notes: String,
}

impl SalesRecord {
    pub fn new(
        timestamp: String,
        branch: Branch,
        customer: String,
        prior_year_sales: Decimal,
        current_sales: Decimal,
        notes: String,
    ) -> Result<SalesRecord, SalesError> {
        if prior_year_sales < dec!(0) || current_sales < dec!(0) {
            return Err(SalesError::NegativeAmount);
        }

        Ok(SalesRecord {
            timestamp,
            branch,
            customer,
            prior_year_sales,
            current_sales,
            notes,
        })
    }

    /// Builds a fresh record from the form input, stamped with `now`.
    pub fn create(input: NewCustomer, now: NaiveDateTime) -> Result<SalesRecord, SalesError> {
        let customer = input.customer.trim();
        if customer.is_empty() {
            return Err(SalesError::MissingCustomer);
        }

        SalesRecord::new(
            format_timestamp(now),
            input.branch,
            customer.to_string(),
            input.prior_year_sales,
            input.current_sales,
            input.notes.trim().to_string(),
        )
    }

    /// Customer names are stored trimmed, so the lookup name is trimmed too.
    pub fn matches(&self, branch: Branch, customer: &str) -> bool {
        self.branch == branch && self.customer == customer.trim()
    }

    pub(crate) fn set_current_sales(&mut self, amount: Decimal, now: NaiveDateTime) -> Result<(), SalesError> {
        if amount < dec!(0) {
            return Err(SalesError::NegativeAmount);
        }

        self.current_sales = amount;
        self.timestamp = format_timestamp(now);

        Ok(())
    }

    pub(crate) fn append_note(&mut self, note: &str) {
        let note = note.trim();
        if note.is_empty() {
            return;
        }

        self.notes = join_notes(&self.notes, note);
    }
}

pub fn format_timestamp(now: NaiveDateTime) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Joins an existing note with a new one. Separator characters left dangling at
/// either end (an empty previous note) are trimmed away.
pub fn join_notes(previous: &str, note: &str) -> String {
    format!("{previous}{NOTE_SEPARATOR}{note}")
        .trim_matches(|c: char| c == ' ' || c == '|')
        .to_string()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_branch_from_str() {
        assert_eq!("Gdańsk".parse::<Branch>(), Ok(Branch::Gdansk));
        assert_eq!("gdansk".parse::<Branch>(), Ok(Branch::Gdansk));
        assert_eq!(" WROCŁAW ".parse::<Branch>(), Ok(Branch::Wroclaw));
        assert_eq!("dabrowa g.".parse::<Branch>(), Ok(Branch::DabrowaGornicza));
        assert_eq!("Poznań".parse::<Branch>(), Err(SalesError::UnknownBranch("Poznań".to_string())));
    }

    #[test]
    fn test_branch_names_round_trip() {
        for branch in Branch::ALL {
            assert_eq!(branch.name().parse::<Branch>(), Ok(branch));
        }
    }

    #[test]
    fn test_join_notes() {
        assert_eq!(join_notes("A", "B"), "A | B");
        assert_eq!(join_notes("", "B"), "B");
        assert_eq!(join_notes("A | B", "C"), "A | B | C");
    }

    #[test]
    fn test_create_rejects_blank_customer() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(9, 30, 0).unwrap();
        let input = NewCustomer {
            branch: Branch::Opole,
            customer: "   ".to_string(),
            prior_year_sales: dec!(1),
            current_sales: dec!(2),
            notes: String::new(),
        };

        assert_eq!(SalesRecord::create(input, now), Err(SalesError::MissingCustomer));
    }

    #[test]
    fn test_create_stamps_timestamp() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(9, 30, 59).unwrap();
        let input = NewCustomer {
            branch: Branch::Opole,
            customer: " Acme ".to_string(),
            prior_year_sales: dec!(1),
            current_sales: dec!(2),
            notes: "first call".to_string(),
        };

        let record = SalesRecord::create(input, now).unwrap();
        assert_eq!(record.timestamp(), "2024-03-01 09:30");
        assert_eq!(record.customer(), "Acme");
        assert_eq!(record.branch(), Branch::Opole);
    }

    #[test]
    fn test_matches_trims_customer() {
        let record = SalesRecord::new(
            String::new(),
            Branch::Konin,
            "Acme".to_string(),
            dec!(1),
            dec!(1),
            String::new(),
        )
        .unwrap();

        assert!(record.matches(Branch::Konin, " Acme "));
        assert!(!record.matches(Branch::Opole, "Acme"));
        assert!(!record.matches(Branch::Konin, "Acm"));
    }

    #[test]
    fn test_negative_amount() {
        let record = SalesRecord::new(
            String::new(),
            Branch::Konin,
            "Acme".to_string(),
            dec!(-1),
            dec!(0),
            String::new(),
        );
        assert_eq!(record, Err(SalesError::NegativeAmount));
    }
}
