mod common;

use std::{fs, path::PathBuf};

use common::temp_base;
use expense_ledger::{
    config::{Config, ConfigManager},
    core::LedgerStore,
    domain::RecordDraft,
    errors::LedgerError,
};

#[test]
fn config_round_trips_through_manager() {
    let base = temp_base();
    let manager = ConfigManager::with_base_dir(base.clone()).expect("manager");

    let mut config = manager.load().expect("defaults");
    config.ledger_file = Some(PathBuf::from("books/2024.csv"));
    config.ui_color_enabled = false;
    config.chart_width = 25;
    manager.save(&config).expect("save");

    let loaded = manager.load().expect("reload");
    assert_eq!(loaded, config);
    assert_eq!(loaded.resolve_ledger_file(), base.join("books/2024.csv"));
    assert!(!base.join("config.json.tmp").exists());
}

#[test]
fn missing_fields_take_defaults() {
    let base = temp_base();
    let manager = ConfigManager::with_base_dir(base.clone()).expect("manager");
    fs::write(manager.path(), "{}").unwrap();

    let loaded = manager.load().expect("load");
    assert_eq!(loaded.ledger_file, None);
    assert_eq!(loaded.chart_width, Config::default_chart_width());
    assert!(loaded.ui_color_enabled);
}

#[test]
fn store_from_config_writes_to_configured_file() {
    let base = temp_base();
    let manager = ConfigManager::with_base_dir(base.clone()).expect("manager");
    let mut config = manager.load().expect("defaults");
    config.ledger_file = Some(PathBuf::from("household.csv"));

    let store = LedgerStore::from_config(&config);
    store
        .append(&RecordDraft::new("2024-01-01", "Food", "5", "Debit", "Snack"))
        .expect("append");
    assert!(base.join("household.csv").exists());
}

#[test]
fn unreadable_config_is_a_config_error() {
    let base = temp_base();
    let manager = ConfigManager::with_base_dir(base).expect("manager");
    fs::write(manager.path(), "[1, 2").unwrap();
    assert!(matches!(manager.load(), Err(LedgerError::Config(_))));
}
