use std::path::PathBuf;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;

const USAGE: &str =
    "config [show|path|set <ledger-file|color|chart-width> <value>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "View and change CLI preferences and the ledger file",
        USAGE,
        cmd_config,
    )
    .with_arguments(&[&["show", "path", "set"], &["ledger-file", "color", "chart-width"]])]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() || args[0].eq_ignore_ascii_case("show") {
        show_config(context);
        return Ok(());
    }

    match args[0].to_lowercase().as_str() {
        "path" => {
            io::print_info(context.config.resolve_ledger_file().display());
            Ok(())
        }
        "set" => {
            if args.len() < 3 {
                return Err(CommandError::InvalidArguments(format!("usage: {}", USAGE)));
            }
            let value = args[2..].join(" ");
            set_config_value(context, args[1], value.trim())
        }
        _ => Err(CommandError::InvalidArguments(format!("usage: {}", USAGE))),
    }
}

fn show_config(context: &ShellContext) {
    let config = &context.config;
    output_section("Configuration");
    io::print_info(format!(
        "  Config file : {}",
        context.config_manager.path().display()
    ));
    io::print_info(format!(
        "  Ledger file : {}",
        config.resolve_ledger_file().display()
    ));
    io::print_info(format!(
        "  Color       : {}",
        if config.ui_color_enabled { "on" } else { "off" }
    ));
    io::print_info(format!("  Chart width : {}", config.chart_width));
}

fn set_config_value(context: &mut ShellContext, key: &str, value: &str) -> CommandResult {
    match key.to_lowercase().as_str() {
        "ledger-file" | "ledger_file" => {
            if value.is_empty() {
                return Err(CommandError::InvalidArguments(
                    "ledger file path must not be empty".into(),
                ));
            }
            context.config.ledger_file = Some(PathBuf::from(value));
        }
        "color" | "ui_color_enabled" => {
            context.config.ui_color_enabled = parse_switch(value)?;
        }
        "chart-width" | "chart_width" => {
            let width = value
                .parse::<usize>()
                .ok()
                .filter(|width| *width > 0)
                .ok_or_else(|| {
                    CommandError::InvalidArguments(
                        "chart width must be a positive whole number".into(),
                    )
                })?;
            context.config.chart_width = width;
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown config key `{}`",
                other
            )))
        }
    }

    context.persist_config()?;
    io::print_success(format!("Configuration updated: {} = {}", key, value));
    Ok(())
}

fn parse_switch(value: &str) -> Result<bool, CommandError> {
    match value.to_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(CommandError::InvalidArguments(format!(
            "expected on or off, got `{}`",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::core::{process_script, script_context};
    use tempfile::tempdir;

    #[test]
    fn setting_ledger_file_reopens_the_store() {
        let dir = tempdir().expect("tempdir");
        let mut context = script_context(dir.path());
        process_script(
            &mut context,
            &[
                "config set ledger-file household.csv",
                "add 2024-05-01 Utilities 80 Debit Power bill",
            ],
        )
        .expect("script runs");

        assert!(dir.path().join("household.csv").exists());
        assert!(!dir.path().join("expenses.csv").exists());
        let saved = context.config_manager.load().expect("reload");
        assert_eq!(saved.ledger_file, Some(PathBuf::from("household.csv")));
    }

    #[test]
    fn invalid_values_leave_config_untouched() {
        let dir = tempdir().expect("tempdir");
        let mut context = script_context(dir.path());
        process_script(
            &mut context,
            &["config set chart-width zero", "config set color maybe"],
        )
        .expect("errors reported");
        assert_eq!(context.config.chart_width, 40);
        assert!(context.config.ui_color_enabled);
    }
}
