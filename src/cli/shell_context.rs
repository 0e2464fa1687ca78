use dialoguer::theme::ColorfulTheme;

use crate::{
    config::{Config, ConfigManager},
    core::{services::RangeReport, LedgerStore},
};

use super::registry::CommandRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub store: LedgerStore,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    /// Listing shown by the most recent `view`; row numbers refer to it.
    pub last_view: Option<RangeReport>,
    pub running: bool,
}

impl ShellContext {
    pub fn mode(&self) -> CliMode {
        self.mode
    }

    pub fn status(&self) -> String {
        format!(
            "ShellContext {{ mode: {:?}, running: {}, ledger: {} }}",
            self.mode,
            self.running,
            self.store.location()
        )
    }
}
