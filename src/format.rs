//! Presentation helpers shared by list rows, dashboards and exports.

use jiff::civil::{Date, DateTime};

/// Format an amount with a currency symbol, thousands separators and two decimals.
///
/// `currency(-1234.5, "$")` → `-$1,234.50`
pub fn currency(amount: f64, symbol: &str) -> String {
    if !amount.is_finite() {
        return format!("{symbol}0.00");
    }
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}{symbol}{whole}.{:02}", cents % 100)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `Mar 5, 2024`
pub fn date(d: Date) -> String {
    format!("{} {}, {}", d.strftime("%b"), d.day(), d.year())
}

/// `Mar 5, 2024 2:30 PM`
pub fn datetime(dt: DateTime) -> String {
    format!("{} {}", date(dt.date()), dt.strftime("%-I:%M %p"))
}

/// Short label for a due date relative to `reference`.
///
/// `None` (an unparseable date) renders as `No due date`.
pub fn due_label(due: Option<Date>, reference: Date) -> String {
    let Some(due) = due else {
        return "No due date".to_string();
    };
    let days = match reference.until(due) {
        Ok(span) => span.get_days(),
        Err(_) => return date(due),
    };
    match days {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        d if d < 0 => format!("Overdue by {} days", -d),
        d if d < 7 => format!("In {d} days"),
        _ => date(due),
    }
}
