//! Day summary formatting

use daylog_core::Day;

const EMPTY_FIELD: &str = "(none)";

fn field(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => EMPTY_FIELD,
    }
}

/// Build the Slack markdown summary for a day
pub fn build_message(day: &Day) -> String {
    format!(
        "📅 *{}*\n*Who:* {}\n*Lesson:* {}",
        day.date_str,
        field(day.who.as_deref()),
        field(day.lesson.as_deref()),
    )
}
