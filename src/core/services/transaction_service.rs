//! Append, range listing and deletion over the transaction log.

use tracing::{debug, info};

use crate::core::services::{parsed_records, ServiceResult};
use crate::domain::{DateRange, Kind, Record, RecordDraft};
use crate::errors::LedgerError;
use crate::storage::LedgerStorage;

/// Records found in a date range together with the balance they produce.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeReport {
    pub range: DateRange,
    /// Ascending by date; records sharing a date keep their stored order.
    pub records: Vec<Record>,
    pub total_credit: f64,
    pub total_debit: f64,
    pub balance: f64,
}

impl RangeReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Which stored rows equal to the target a delete removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchScope {
    /// Every equal row, duplicates included.
    #[default]
    AllMatches,
    /// Only the first equal row in stored order.
    FirstMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub removed: usize,
    /// Readable records left afterwards; unreadable rows are kept but not counted.
    pub remaining: usize,
}

/// Validated operations on ledger transactions.
pub struct TransactionService;

impl TransactionService {
    /// Validates raw input and appends it. Nothing is written when validation fails.
    pub fn append(storage: &dyn LedgerStorage, draft: &RecordDraft) -> ServiceResult<Record> {
        let record = draft.validate()?;
        storage.append_row(&record)?;
        info!(record = %record, "transaction appended");
        Ok(record)
    }

    /// Appends an already typed record after re-checking its invariants.
    pub fn append_record(storage: &dyn LedgerStorage, record: &Record) -> ServiceResult<()> {
        let checked = Record::from_fields(&record.to_fields())?;
        storage.append_row(&checked)?;
        info!(record = %checked, "transaction appended");
        Ok(())
    }

    /// Lists records dated within `range` (inclusive) and computes their balance.
    pub fn list_in_range(
        storage: &dyn LedgerStorage,
        range: DateRange,
    ) -> ServiceResult<RangeReport> {
        let mut records: Vec<Record> = parsed_records(storage)?
            .into_iter()
            .filter(|record| range.contains(record.date))
            .collect();
        records.sort_by_key(|record| record.date);

        let mut total_credit = 0.0;
        let mut total_debit = 0.0;
        for record in &records {
            match record.kind {
                Kind::Credit => total_credit += record.amount,
                Kind::Debit => total_debit += record.amount,
            }
        }
        let balance: f64 = records.iter().map(Record::signed_amount).sum();
        debug!(
            start = %range.start,
            end = %range.end,
            matched = records.len(),
            balance,
            "range query"
        );
        Ok(RangeReport {
            range,
            records,
            total_credit,
            total_debit,
            balance,
        })
    }

    /// Removes stored rows whose five fields equal `target`, then rewrites the
    /// store with the survivors in their original order. Rows that cannot be
    /// parsed never match and are kept verbatim.
    pub fn delete_matching(
        storage: &dyn LedgerStorage,
        target: &Record,
        scope: MatchScope,
    ) -> ServiceResult<DeleteOutcome> {
        let rows = storage.read_rows()?;
        let mut removed = 0;
        let mut remaining = 0;
        let survivors: Vec<_> = rows
            .into_iter()
            .filter(|row| {
                let Ok(record) = row.parse() else {
                    return true;
                };
                let matches = record == *target
                    && !(scope == MatchScope::FirstMatch && removed > 0);
                if matches {
                    removed += 1;
                } else {
                    remaining += 1;
                }
                !matches
            })
            .collect();

        if removed > 0 {
            storage.rewrite(&survivors)?;
            info!(record = %target, removed, "transactions deleted");
        } else {
            debug!(record = %target, "no stored transaction matched");
        }
        Ok(DeleteOutcome {
            removed,
            remaining,
        })
    }

    /// Every readable record in stored order.
    pub fn list(storage: &dyn LedgerStorage) -> ServiceResult<Vec<Record>> {
        parsed_records(storage)
    }

    /// Number of readable records, matching what [`Self::list`] returns; zero
    /// when the store does not exist yet.
    pub fn count(storage: &dyn LedgerStorage) -> ServiceResult<usize> {
        match parsed_records(storage) {
            Ok(records) => Ok(records.len()),
            Err(LedgerError::StoreNotFound(_)) => Ok(0),
            Err(err) => Err(err),
        }
    }
}
