use chrono::{Datelike, Local};

use crate::cli::charts::{bar_chart, fit_width, format_total};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::{AggregateQuery, SpendingBreakdown};
use crate::domain::{format_date, DateRange};

const USAGE: &str = "chart <category|daily> [<start> <end>]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "chart",
        "Plot debit spending by category or by day",
        USAGE,
        cmd_chart,
    )
    .with_aliases(&["plot"])
    .with_arguments(&[&["category", "daily"]])]
}

fn cmd_chart(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((view, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(format!("usage: {}", USAGE)));
    };
    let range = match rest {
        [] => None,
        [start, end] => Some(DateRange::parse(start, end)?),
        _ => return Err(CommandError::InvalidArguments(format!("usage: {}", USAGE))),
    };

    let (title, query) = match view.to_ascii_lowercase().as_str() {
        "category" | "categories" => {
            let query = match range {
                Some(range) => AggregateQuery::spending_by_category().within(range),
                None => AggregateQuery::spending_by_category(),
            };
            ("Spending by Category".to_string(), query)
        }
        "daily" | "day" => {
            let range = match range {
                Some(range) => range,
                None => current_year()?,
            };
            let title = format!(
                "Daily Spending {} to {}",
                format_date(range.start),
                format_date(range.end)
            );
            (title, AggregateQuery::spending_by_day(range))
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown chart `{}`; use `category` or `daily`",
                other
            )))
        }
    };

    let breakdown = context.store.aggregate(&query)?;
    render(context, &title, &breakdown);
    Ok(())
}

fn current_year() -> Result<DateRange, CommandError> {
    let year = Local::now().year();
    DateRange::calendar_year(year)
        .ok_or_else(|| CommandError::Message(format!("year {} is out of range", year)))
}

fn render(context: &ShellContext, title: &str, breakdown: &SpendingBreakdown) {
    let points = breakdown.points();
    let label_width = points
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let width = fit_width(context.config.chart_width, label_width);

    output::block("");
    output::block(&bar_chart(title, &points, width));
    let total: f64 = points.iter().map(|(_, value)| value).sum();
    io::print_info(format!("Total: {}", format_total(total)));
}
