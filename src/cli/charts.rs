//! Text renderings of spending aggregates.

use crate::domain::format_amount;

const BAR: char = '█';
const MIN_BAR_WIDTH: usize = 10;

/// Horizontal bar chart: one line per point, bars scaled to the largest value.
pub fn bar_chart(title: &str, points: &[(String, f64)], width: usize) -> String {
    let label_width = points
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let max = points
        .iter()
        .map(|(_, value)| *value)
        .fold(0.0_f64, f64::max);
    let width = width.max(MIN_BAR_WIDTH);

    let mut lines = vec![title.to_string()];
    for (label, value) in points {
        let bar_len = if max > 0.0 {
            ((value / max) * width as f64).round() as usize
        } else {
            0
        };
        lines.push(format!(
            "{:<label_width$} | {} {}",
            label,
            BAR.to_string().repeat(bar_len),
            format_total(*value),
            label_width = label_width
        ));
    }
    lines.join("\n")
}

/// Usable bar width for the current terminal, capped at `preferred`.
pub fn fit_width(preferred: usize, label_width: usize) -> usize {
    match crossterm::terminal::size() {
        Ok((columns, _)) => {
            let available = (columns as usize).saturating_sub(label_width + 16);
            preferred.min(available).max(MIN_BAR_WIDTH)
        }
        Err(_) => preferred,
    }
}

pub fn format_total(value: f64) -> String {
    format!("{:.2}", value)
}

/// Balance readout shown after a range listing.
pub fn balance_line(balance: f64) -> String {
    format!("Current Balance: {}", format_amount(balance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn largest_value_gets_full_bar() {
        let points = vec![("Food".to_string(), 20.0), ("Rent".to_string(), 40.0)];
        let chart = bar_chart("Spending by Category", &points, 10);
        let lines: Vec<&str> = chart.lines().collect();
        assert_eq!(lines[0], "Spending by Category");
        assert_eq!(lines[1], format!("Food | {} 20.00", "█".repeat(5)));
        assert_eq!(lines[2], format!("Rent | {} 40.00", "█".repeat(10)));
    }

    #[test]
    fn balance_line_uses_plain_decimal() {
        assert_eq!(balance_line(70.0), "Current Balance: 70");
        assert_eq!(balance_line(-2.5), "Current Balance: -2.5");
    }
}
