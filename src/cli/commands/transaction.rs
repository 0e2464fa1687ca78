use chrono::Local;

use crate::cli::charts::balance_line;
use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Table, TableColumn};
use crate::core::services::{MatchScope, RangeReport};
use crate::domain::{format_amount, format_date, DateRange, Kind, Record, RecordDraft};

const ADD_USAGE: &str = "add <date> <category> <amount> <Credit|Debit> <description>";
const DELETE_USAGE: &str =
    "delete <row> [--first] | delete <date> <category> <amount> <type> <description> [--first]";
const FIRST_FLAG: &str = "--first";
const DESCRIPTION_WIDTH: usize = 40;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("add", "Record a credit or debit", ADD_USAGE, cmd_add)
            .with_aliases(&["new"])
            .with_arguments(&[&[], &[], &[], &["Credit", "Debit"]]),
        CommandEntry::new(
            "view",
            "List transactions between two dates with the balance",
            "view [<start> <end>]",
            cmd_view,
        )
        .with_aliases(&["ls", "list"]),
        CommandEntry::new(
            "delete",
            "Delete transactions equal to a listed row or to the given fields",
            DELETE_USAGE,
            cmd_delete,
        )
        .with_aliases(&["rm", "remove"])
        .with_arguments(&[&[FIRST_FLAG]]),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let draft = if args.is_empty() && context.mode() == CliMode::Interactive {
        prompt_draft(context)?
    } else {
        draft_from_args(args, ADD_USAGE)?
    };

    let record = context.store.append(&draft)?;
    io::print_success("Transaction added successfully!");
    io::print_info(&record);
    Ok(())
}

fn prompt_draft(context: &ShellContext) -> Result<RecordDraft, CommandError> {
    let today = format_date(Local::now().date_naive());
    let date = io::prompt_text_with_default(&context.theme, "Date (YYYY-MM-DD)", &today)?;
    let category = io::prompt_text(&context.theme, "Category")?;
    let amount = io::prompt_text(&context.theme, "Amount")?;
    let kinds = [Kind::Debit.as_str(), Kind::Credit.as_str()];
    let kind = kinds[io::prompt_select(&context.theme, "Type", &kinds)?];
    let description = io::prompt_text(&context.theme, "Description")?;
    Ok(RecordDraft::new(date, category, amount, kind, description))
}

/// Five fields in stored order; the description absorbs any trailing words.
fn draft_from_args(args: &[&str], usage: &str) -> Result<RecordDraft, CommandError> {
    if args.len() < 5 {
        return Err(CommandError::InvalidArguments(format!("usage: {}", usage)));
    }
    Ok(RecordDraft::new(
        args[0],
        args[1],
        args[2],
        args[3],
        args[4..].join(" "),
    ))
}

fn cmd_view(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let report = match args {
        [] => context.store.list_range(DateRange::unbounded())?,
        [start, end] => context.store.list_in_range(start, end)?,
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: view [<start> <end>]".into(),
            ))
        }
    };

    print_report(&report, args.is_empty());
    context.last_view = Some(report);
    Ok(())
}

fn print_report(report: &RangeReport, whole_ledger: bool) {
    if whole_ledger {
        output::section("All transactions");
    } else {
        output::section(format!(
            "Transactions {} to {}",
            format_date(report.range.start),
            format_date(report.range.end)
        ));
    }

    if report.is_empty() {
        io::print_info("No transactions in this range.");
    } else {
        output::block(&record_table(&report.records).render());
        io::print_info(format!(
            "Credits: {}  Debits: {}",
            format_amount(report.total_credit),
            format_amount(report.total_debit)
        ));
    }
    io::print_info(balance_line(report.balance));
}

fn record_table(records: &[Record]) -> Table {
    let mut table = Table::new(vec![
        TableColumn::right("#"),
        TableColumn::left("Date"),
        TableColumn::left("Category"),
        TableColumn::right("Amount"),
        TableColumn::left("Type"),
        TableColumn::left("Description").max_width(DESCRIPTION_WIDTH),
    ]);
    for (idx, record) in records.iter().enumerate() {
        let [date, category, amount, kind, description] = record.to_fields();
        table.push_row(vec![
            (idx + 1).to_string(),
            date,
            category,
            amount,
            kind,
            description,
        ]);
    }
    table
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let scope = if args.iter().any(|arg| arg.eq_ignore_ascii_case(FIRST_FLAG)) {
        MatchScope::FirstMatch
    } else {
        MatchScope::AllMatches
    };
    let rest: Vec<&str> = args
        .iter()
        .copied()
        .filter(|arg| !arg.eq_ignore_ascii_case(FIRST_FLAG))
        .collect();

    let target = match rest.as_slice() {
        [row] => listed_record(context, row)?,
        fields => draft_from_args(fields, DELETE_USAGE)?.validate()?,
    };

    if context.mode() == CliMode::Interactive {
        let prompt = format!("Delete {}?", target);
        if !io::confirm_action(&context.theme, &prompt, false)? {
            io::print_info("Operation cancelled.");
            return Ok(());
        }
    }

    let outcome = context.store.delete_matching(&target, scope)?;
    if outcome.removed == 0 {
        io::print_warning("No matching transaction found.");
        return Ok(());
    }

    context.last_view = None;
    io::print_success(format!(
        "Deleted {} transaction(s); {} remaining.",
        outcome.removed, outcome.remaining
    ));
    Ok(())
}

/// Record at 1-based `row` of the most recent listing.
fn listed_record(context: &ShellContext, row: &str) -> Result<Record, CommandError> {
    let report = context.last_view.as_ref().ok_or_else(|| {
        CommandError::InvalidArguments("run `view` first to choose a row to delete".into())
    })?;
    let index = row
        .parse::<usize>()
        .ok()
        .filter(|index| (1..=report.records.len()).contains(index))
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "row must be a number between 1 and {}",
                report.records.len()
            ))
        })?;
    Ok(report.records[index - 1].clone())
}
