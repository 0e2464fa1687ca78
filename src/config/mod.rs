use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use crate::core::utils::{app_data_dir, config_file_in, ledger_file_in};
use crate::errors::LedgerError;
use crate::utils::persistence::replace_file;

const DEFAULT_CHART_WIDTH: usize = 40;

/// User preferences plus the single storage setting: where the ledger file lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Ledger file. Relative paths resolve against the directory holding the
    /// configuration; `None` means `expenses.csv` in that directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger_file: Option<PathBuf>,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_chart_width")]
    pub chart_width: usize,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger_file: None,
            ui_color_enabled: Self::default_ui_color_enabled(),
            chart_width: Self::default_chart_width(),
            base_dir: app_data_dir(),
        }
    }
}

impl Config {
    /// Default configuration whose relative paths resolve under `base`.
    pub fn with_base_dir(base: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base.into(),
            ..Self::default()
        }
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_chart_width() -> usize {
        DEFAULT_CHART_WIDTH
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn resolve_ledger_file(&self) -> PathBuf {
        match &self.ledger_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => self.base_dir.join(path),
            None => ledger_file_in(&self.base_dir),
        }
    }
}

/// Loads and saves [`Config`] as JSON.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    base_dir: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: config_file_in(&base),
            base_dir: base,
        })
    }

    pub fn load(&self) -> Result<Config, LedgerError> {
        let mut config: Config = if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str(&data).map_err(|err| {
                LedgerError::Config(format!("{}: {}", self.path.display(), err))
            })?
        } else {
            Config::default()
        };
        config.base_dir = self.base_dir.clone();
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        replace_file(&self.path, |mut file| Ok(file.write_all(json.as_bytes())?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_config_falls_back_to_defaults_in_base() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().expect("load defaults");
        assert_eq!(config.resolve_ledger_file(), dir.path().join("expenses.csv"));
        assert!(config.ui_color_enabled);
    }

    #[test]
    fn relative_ledger_file_resolves_against_base() {
        let mut config = Config::with_base_dir("/data/ledger");
        config.ledger_file = Some(PathBuf::from("home.csv"));
        assert_eq!(
            config.resolve_ledger_file(),
            PathBuf::from("/data/ledger/home.csv")
        );
    }

    #[test]
    fn corrupt_config_is_reported() {
        let dir = tempdir().expect("tempdir");
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::write(manager.path(), "{ not json").unwrap();
        let err = manager.load().expect_err("corrupt config");
        assert!(matches!(err, LedgerError::Config(_)), "unexpected: {err:?}");
    }
}
