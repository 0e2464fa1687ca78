#![doc(test(attr(deny(warnings))))]

//! Expense Ledger keeps a single-user record of credits and debits in a CSV
//! file and answers range, balance and spending questions over it.
//!
//! ```no_run
//! use expense_ledger::{core::LedgerStore, domain::RecordDraft};
//!
//! let store = LedgerStore::open("expenses.csv");
//! store.append(&RecordDraft::new("2024-01-01", "Salary", "100", "Credit", "January"))?;
//! let report = store.list_in_range("2024-01-01", "2024-01-31")?;
//! println!("balance: {}", report.balance);
//! # Ok::<(), expense_ledger::errors::LedgerError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

pub use crate::core::services::{AggregateQuery, MatchScope, RangeReport, SpendingBreakdown};
pub use crate::core::LedgerStore;
pub use crate::domain::{DateRange, Kind, Record, RecordDraft};
pub use crate::errors::{LedgerError, Result};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Expense ledger tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
