use chrono::{Datelike, NaiveDate};

use crate::models::SalaryRange;
use crate::stats::SalaryWindow;

const MONTHS: [&str; 12] = [
    "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août", "septembre",
    "octobre", "novembre", "décembre",
];

fn thousands(amount: u32) -> String {
    let k = amount / 1000;
    let rest = amount % 1000;
    if rest == 0 {
        format!("{} k€", k)
    } else {
        // 62500 -> "62,5 k€"
        let decimals = format!("{:03}", rest);
        format!("{},{} k€", k, decimals.trim_end_matches('0'))
    }
}

pub fn format_salary(range: &SalaryRange) -> String {
    format!("{} – {}", thousands(range.min), thousands(range.max))
}

pub fn format_window(window: &SalaryWindow) -> String {
    format!("{} – {}", thousands(window.min), thousands(window.max))
}

/// `6 mai 2024`
pub fn format_date(date: &NaiveDate) -> String {
    format!("{} {} {}", date.day(), MONTHS[date.month0() as usize], date.year())
}

/// Shortens to at most `max` characters, ending with `...` when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Wraps `text` to `width` columns, prefixing every line with `indent`.
pub fn indented(text: &str, width: usize, indent: &str) -> Vec<String> {
    textwrap::wrap(text, width.saturating_sub(indent.len()).max(10))
        .into_iter()
        .map(|line| format!("{}{}", indent, line))
        .collect()
}
