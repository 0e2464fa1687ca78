use std::path::PathBuf;

use crate::config::Config;
use crate::core::services::{
    AggregateQuery, DeleteOutcome, MatchScope, RangeReport, SpendingBreakdown, SummaryService,
    TransactionService,
};
use crate::domain::{DateRange, Record, RecordDraft};
use crate::errors::Result;
use crate::storage::{CsvLedgerStorage, LedgerStorage, MemoryLedgerStorage};

/// Owns the persistence backend and exposes the ledger operations callers use.
pub struct LedgerStore {
    storage: Box<dyn LedgerStorage>,
}

impl LedgerStore {
    pub fn new(storage: Box<dyn LedgerStorage>) -> Self {
        Self { storage }
    }

    /// Store backed by the CSV file at `path`. The file is created on first append.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(CsvLedgerStorage::new(path)))
    }

    /// Store backed by the ledger file named in `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::open(config.resolve_ledger_file())
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryLedgerStorage::new()))
    }

    pub fn storage(&self) -> &dyn LedgerStorage {
        self.storage.as_ref()
    }

    pub fn location(&self) -> String {
        self.storage.location()
    }

    /// Validates raw user input and appends it as the newest record.
    pub fn append(&self, draft: &RecordDraft) -> Result<Record> {
        TransactionService::append(self.storage(), draft)
    }

    pub fn append_record(&self, record: &Record) -> Result<()> {
        TransactionService::append_record(self.storage(), record)
    }

    /// Parses both bounds as `YYYY-MM-DD` and lists the records between them.
    pub fn list_in_range(&self, start: &str, end: &str) -> Result<RangeReport> {
        self.list_range(DateRange::parse(start, end)?)
    }

    pub fn list_range(&self, range: DateRange) -> Result<RangeReport> {
        TransactionService::list_in_range(self.storage(), range)
    }

    pub fn delete_matching(&self, record: &Record, scope: MatchScope) -> Result<DeleteOutcome> {
        TransactionService::delete_matching(self.storage(), record, scope)
    }

    pub fn aggregate(&self, query: &AggregateQuery) -> Result<SpendingBreakdown> {
        SummaryService::aggregate(self.storage(), query)
    }

    pub fn records(&self) -> Result<Vec<Record>> {
        TransactionService::list(self.storage())
    }

    pub fn count(&self) -> Result<usize> {
        TransactionService::count(self.storage())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LedgerError;

    #[test]
    fn queries_before_first_append_report_missing_store() {
        let store = LedgerStore::in_memory();
        assert!(matches!(
            store.list_in_range("2024-01-01", "2024-12-31"),
            Err(LedgerError::StoreNotFound(_))
        ));
        assert!(matches!(
            store.aggregate(&AggregateQuery::spending_by_category()),
            Err(LedgerError::StoreNotFound(_))
        ));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn invalid_range_bounds_are_validation_errors() {
        let store = LedgerStore::in_memory();
        let err = store
            .list_in_range("2024-01-01", "tomorrow")
            .expect_err("bad bound");
        assert!(err.is_validation());
    }
}
