use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".expense_ledger";
const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_LEDGER_FILE: &str = "expenses.csv";
pub const HOME_ENV: &str = "EXPENSE_LEDGER_HOME";

/// Returns the application-specific data directory, defaulting to `~/.expense_ledger`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Location of the configuration file inside `base`.
pub fn config_file_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

/// Default ledger file inside `base`.
pub fn ledger_file_in(base: &std::path::Path) -> PathBuf {
    base.join(DEFAULT_LEDGER_FILE)
}
