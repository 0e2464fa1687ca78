#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use expense_ledger::{core::LedgerStore, domain::RecordDraft};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Unique directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// CSV-backed store in a fresh directory, plus the ledger file path.
pub fn setup_store() -> (LedgerStore, PathBuf) {
    let path = temp_base().join("expenses.csv");
    (LedgerStore::open(&path), path)
}

pub fn add(store: &LedgerStore, date: &str, category: &str, amount: &str, kind: &str, note: &str) {
    store
        .append(&RecordDraft::new(date, category, amount, kind, note))
        .expect("append record");
}
