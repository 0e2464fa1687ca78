//! Transaction records and the raw input they are validated from.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

/// Canonical textual form of a record date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Direction of a transaction: credits raise the balance, debits lower it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Credit,
    Debit,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Credit => "Credit",
            Kind::Debit => "Debit",
        }
    }

    /// Sign applied to an amount of this kind when computing a balance.
    pub fn sign(&self) -> f64 {
        match self {
            Kind::Credit => 1.0,
            Kind::Debit => -1.0,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "credit" => Ok(Kind::Credit),
            "debit" => Ok(Kind::Debit),
            other => Err(LedgerError::validation(format!(
                "transaction type must be `Credit` or `Debit`, got `{other}`"
            ))),
        }
    }
}

/// A single validated ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    pub kind: Kind,
    pub description: String,
}

impl Record {
    /// Builds a record from typed values, enforcing the same rules as [`RecordDraft`].
    pub fn new(
        date: NaiveDate,
        category: impl Into<String>,
        amount: f64,
        kind: Kind,
        description: impl Into<String>,
    ) -> Result<Self> {
        let category = required("category", &category.into())?;
        let description = required("description", &description.into())?;
        let amount = check_amount(amount)?;
        Ok(Self {
            date,
            category,
            amount,
            kind,
            description,
        })
    }

    /// Contribution of this record to a running balance.
    pub fn signed_amount(&self) -> f64 {
        self.kind.sign() * self.amount
    }

    /// Field values in file column order.
    pub fn to_fields(&self) -> [String; 5] {
        [
            format_date(self.date),
            self.category.clone(),
            format_amount(self.amount),
            self.kind.to_string(),
            self.description.clone(),
        ]
    }

    /// Parses stored field values (column order) back into a record.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self> {
        if fields.len() != FIELD_NAMES.len() {
            return Err(LedgerError::validation(format!(
                "expected {} fields, found {}",
                FIELD_NAMES.len(),
                fields.len()
            )));
        }
        RecordDraft {
            date: fields[0].as_ref().to_string(),
            category: fields[1].as_ref().to_string(),
            amount: fields[2].as_ref().to_string(),
            kind: fields[3].as_ref().to_string(),
            description: fields[4].as_ref().to_string(),
        }
        .validate()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} ({})",
            format_date(self.date),
            self.kind,
            format_amount(self.amount),
            self.category,
            self.description
        )
    }
}

/// Column names, in file order.
pub const FIELD_NAMES: [&str; 5] = ["Date", "Category", "Amount", "Type", "Description"];

/// Unvalidated record input as typed by a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordDraft {
    pub date: String,
    pub category: String,
    pub amount: String,
    pub kind: String,
    pub description: String,
}

impl RecordDraft {
    pub fn new(
        date: impl Into<String>,
        category: impl Into<String>,
        amount: impl Into<String>,
        kind: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            category: category.into(),
            amount: amount.into(),
            kind: kind.into(),
            description: description.into(),
        }
    }

    /// Checks every field and produces a [`Record`], or the first problem found.
    pub fn validate(&self) -> Result<Record> {
        let date = required("date", &self.date)?;
        let category = required("category", &self.category)?;
        let amount = required("amount", &self.amount)?;
        let kind = required("type", &self.kind)?;
        let description = required("description", &self.description)?;

        let date = parse_date(&date)?;
        let amount = parse_amount(&amount)?;
        let kind = kind.parse::<Kind>()?;

        Ok(Record {
            date,
            category,
            amount,
            kind,
            description,
        })
    }
}

/// Parses a `YYYY-MM-DD` date, rejecting impossible calendar dates.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        LedgerError::validation(format!(
            "invalid date `{}`; use YYYY-MM-DD",
            value.trim()
        ))
    })
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Shortest decimal text that round-trips the amount.
pub fn format_amount(amount: f64) -> String {
    format!("{}", amount)
}

fn parse_amount(value: &str) -> Result<f64> {
    let amount = value
        .trim()
        .parse::<f64>()
        .map_err(|_| LedgerError::validation(format!("amount `{}` is not a number", value)))?;
    check_amount(amount)
}

fn check_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() {
        return Err(LedgerError::validation("amount must be a finite number"));
    }
    if amount < 0.0 {
        return Err(LedgerError::validation(
            "amount must not be negative; use the transaction type for direction",
        ));
    }
    // Normalise -0.0 so it is written as `0`.
    Ok(amount.abs())
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(LedgerError::validation(format!("{field} is required")))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> RecordDraft {
        RecordDraft::new("2024-01-05", "Groceries", "54.20", "debit", "Weekly shop")
    }

    #[test]
    fn validate_normalises_kind_and_amount() {
        let record = draft().validate().expect("valid draft");
        assert_eq!(record.kind, Kind::Debit);
        assert_eq!(record.amount, 54.2);
        assert_eq!(record.to_fields()[2], "54.2");
        assert_eq!(record.to_fields()[3], "Debit");
    }

    #[test]
    fn validate_rejects_impossible_dates() {
        let mut input = draft();
        input.date = "2024-13-40".into();
        let err = input.validate().expect_err("invalid date");
        assert!(err.is_validation());
        assert!(err.to_string().contains("2024-13-40"));
    }

    #[test]
    fn validate_rejects_blank_fields() {
        let mut input = draft();
        input.description = "   ".into();
        let err = input.validate().expect_err("blank description");
        assert!(err.to_string().contains("description is required"));
    }

    #[test]
    fn validate_rejects_unknown_kind_and_negative_amounts() {
        let mut input = draft();
        input.kind = "Transfer".into();
        assert!(input.validate().is_err());

        let mut input = draft();
        input.amount = "-3".into();
        let err = input.validate().expect_err("negative amount");
        assert!(err.to_string().contains("negative"));

        let mut input = draft();
        input.amount = "NaN".into();
        assert!(input.validate().is_err());
    }

    #[test]
    fn from_fields_requires_all_columns() {
        let err = Record::from_fields(&["2024-01-05", "Food", "1"]).expect_err("short row");
        assert!(err.to_string().contains("expected 5 fields"));
    }

    #[test]
    fn signed_amount_follows_kind() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let credit = Record::new(date, "Salary", 100.0, Kind::Credit, "pay").unwrap();
        let debit = Record::new(date, "Food", 30.0, Kind::Debit, "lunch").unwrap();
        assert_eq!(credit.signed_amount() + debit.signed_amount(), 70.0);
    }
}
