use assert_fs::prelude::*;
use expense_ledger::{
    core::{services::MatchScope, LedgerStore},
    domain::RecordDraft,
    errors::LedgerError,
    storage::{CsvLedgerStorage, LedgerStorage},
};
use predicates::prelude::*;

const HEADER: &str = "Date,Category,Amount,Type,Description\n";

#[test]
fn existing_file_rows_are_read_with_case_insensitive_type() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("expenses.csv");
    file.write_str(&format!(
        "{HEADER}2024-02-01,Salary,1500.00,credit,February\n2024-02-03,Rent,700,DEBIT,Flat\n"
    ))
    .unwrap();

    let store = LedgerStore::open(file.path());
    let report = store.list_in_range("2024-02-01", "2024-02-29").unwrap();
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.balance, 800.0);
}

#[test]
fn unreadable_rows_are_skipped_and_survive_deletes() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("expenses.csv");
    file.write_str(&format!(
        "{HEADER}2024-02-01,Food,5.00,Debit,Snack\nnot-a-date,Food,5,Debit,Broken\n2024-02-02,Food,9,Debit,Lunch\n"
    ))
    .unwrap();

    let store = LedgerStore::open(file.path());
    assert_eq!(store.records().unwrap().len(), 2);

    let target = RecordDraft::new("2024-02-01", "Food", "5", "debit", "Snack")
        .validate()
        .unwrap();
    let outcome = store.delete_matching(&target, MatchScope::AllMatches).unwrap();
    assert_eq!(outcome.removed, 1);

    file.assert(format!(
        "{HEADER}not-a-date,Food,5,Debit,Broken\n2024-02-02,Food,9,Debit,Lunch\n"
    ));
    temp.child("expenses.csv.tmp").assert(predicate::path::missing());
}

#[test]
fn header_mismatch_is_reported() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("expenses.csv");
    file.write_str("When,What,HowMuch\n2024-01-01,Food,5\n").unwrap();

    let store = LedgerStore::open(file.path());
    let err = store.records().expect_err("bad header");
    assert!(matches!(err, LedgerError::MalformedStore(_)), "unexpected: {err:?}");
}

#[test]
fn header_only_file_is_an_empty_ledger() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("expenses.csv");
    file.write_str(HEADER).unwrap();

    let store = LedgerStore::open(file.path());
    let report = store.list_in_range("2024-01-01", "2024-12-31").unwrap();
    assert!(report.is_empty());
    assert_eq!(report.balance, 0.0);
}

#[test]
fn first_append_creates_parent_directories() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("nested/dir/expenses.csv");
    let storage = CsvLedgerStorage::new(file.path());
    assert!(!storage.exists());

    let record = RecordDraft::new("2024-04-01", "Books", "12.5", "Debit", "Paperback")
        .validate()
        .unwrap();
    storage.append_row(&record).unwrap();

    file.assert(predicate::str::starts_with(HEADER));
    file.assert(predicate::str::contains("2024-04-01,Books,12.5,Debit,Paperback"));
}

#[test]
fn empty_existing_file_gains_header_on_first_append() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("expenses.csv");
    file.touch().unwrap();

    let store = LedgerStore::open(file.path());
    assert_eq!(store.records().unwrap().len(), 0);

    store
        .append(&RecordDraft::new("2024-01-05", "Food", "5", "Debit", "Snack"))
        .unwrap();

    file.assert(format!("{HEADER}2024-01-05,Food,5,Debit,Snack\n"));
    let report = store.list_in_range("2024-01-01", "2024-01-31").unwrap();
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.balance, -5.0);
}

#[test]
fn row_with_invalid_utf8_does_not_hide_the_ledger() {
    let temp = assert_fs::TempDir::new().unwrap();
    let file = temp.child("expenses.csv");
    let mut contents = format!("{HEADER}2024-01-01,Food,5,Debit,ok\n").into_bytes();
    contents.extend_from_slice(b"2024-01-02,\xff\xfe,3,Debit,garbled\n");
    contents.extend_from_slice(b"2024-01-03,Rent,9,Debit,flat\n");
    file.write_binary(&contents).unwrap();

    let store = LedgerStore::open(file.path());
    let report = store.list_in_range("2024-01-01", "2024-01-31").unwrap();
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.balance, -14.0);
    assert!(store
        .aggregate(&expense_ledger::core::services::AggregateQuery::spending_by_category())
        .is_ok());

    let target = report.records[1].clone();
    let outcome = store.delete_matching(&target, MatchScope::AllMatches).unwrap();
    assert_eq!(outcome.removed, 1);

    let mut expected = format!("{HEADER}2024-01-01,Food,5,Debit,ok\n").into_bytes();
    expected.extend_from_slice(b"2024-01-02,\xff\xfe,3,Debit,garbled\n");
    assert_eq!(std::fs::read(file.path()).unwrap(), expected);
}
