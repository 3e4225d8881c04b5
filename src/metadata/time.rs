use chrono::{DateTime, Datelike, Utc};

/// Render the gap between `then` and `now` using only the coarsest non-zero
/// calendar unit: "N years ago", "N months ago", "N days ago", or "today"
/// when both fall on the same UTC date. Partial units below the chosen one
/// are dropped, so 400 days comes out as "1 years ago".
pub fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let now = now.date_naive();
    let then = then.date_naive();
    if then >= now {
        // Clock skew can put a commit a moment into the future.
        return "today".to_string();
    }

    let mut years = now.year() - then.year();
    let mut months = now.month() as i32 - then.month() as i32;
    if now.day() < then.day() {
        months -= 1;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }

    if years > 0 {
        format!("{years} years ago")
    } else if months > 0 {
        format!("{months} months ago")
    } else {
        format!("{} days ago", (now - then).num_days())
    }
}
