use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{
    domain::Record,
    errors::{LedgerError, Result},
};

use super::{LedgerRow, LedgerStorage};

/// Volatile backend keeping rows in memory. `None` means the store was never created.
#[derive(Debug, Default)]
pub struct MemoryLedgerStorage {
    rows: Mutex<Option<Vec<Vec<String>>>>,
}

impl MemoryLedgerStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with raw rows, as if they had been read from disk.
    pub fn with_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(Into::into).collect())
            .collect();
        Self {
            rows: Mutex::new(Some(rows)),
        }
    }

    fn guard(&self) -> MutexGuard<'_, Option<Vec<Vec<String>>>> {
        self.rows.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LedgerStorage for MemoryLedgerStorage {
    fn location(&self) -> String {
        "<memory>".into()
    }

    fn exists(&self) -> bool {
        self.guard().is_some()
    }

    fn read_rows(&self) -> Result<Vec<LedgerRow>> {
        let guard = self.guard();
        let rows = guard
            .as_ref()
            .ok_or_else(|| LedgerError::StoreNotFound(self.location()))?;
        Ok(rows
            .iter()
            .enumerate()
            .map(|(idx, fields)| LedgerRow::new(idx as u64 + 2, fields.clone()))
            .collect())
    }

    fn append_row(&self, record: &Record) -> Result<()> {
        self.guard()
            .get_or_insert_with(Vec::new)
            .push(record.to_fields().to_vec());
        Ok(())
    }

    fn rewrite(&self, rows: &[LedgerRow]) -> Result<()> {
        *self.guard() = Some(rows.iter().map(|row| row.fields.clone()).collect());
        Ok(())
    }
}
