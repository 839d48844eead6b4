//! Human-readable formatting for durations, dates, and artifact sizes.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Format a duration between two unix timestamps, coarsening with length:
/// seconds, then minutes+seconds, then hours+minutes.
#[must_use]
pub fn format_duration(start: i64, end: i64) -> String {
    let span = end - start;
    if span > 3600 {
        format!("{} hours, {} minutes", span / 3600, (span % 3600) / 60)
    } else if span > 60 {
        format!("{} minutes, {} seconds", span / 60, span % 60)
    } else {
        format!("{span} seconds")
    }
}

/// Format a unix timestamp as `H:MM on Day D. Mon YYYY` (UTC).
#[must_use]
pub fn format_date(unix: i64) -> String {
    let (year, month, day, weekday) = civil_date(unix.div_euclid(86_400));
    let secs_of_day = unix.rem_euclid(86_400);
    let hour = secs_of_day / 3600;
    let minute = (secs_of_day % 3600) / 60;
    format!(
        "{hour}:{minute:02} on {} {day}. {} {year}",
        DAY_NAMES[weekday],
        MONTH_NAMES[month - 1]
    )
}

/// Format a byte count with IEC units, one decimal place.
#[must_use]
pub fn iec_file_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    if bytes == 0 {
        return "0.0 B".to_owned();
    }
    let exp = ((bytes.ilog2() / 10) as usize).min(UNITS.len() - 1);
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    let scaled = bytes as f64 / 1024f64.powi(exp as i32);
    format!("{scaled:.1} {}", UNITS[exp])
}

/// Status marker and CSS class for a run result.
#[must_use]
pub fn run_icon(result: Option<&str>) -> (&'static str, &'static str) {
    match result {
        Some("success") => ("✔", "status status--success"),
        Some("failed") => ("✘", "status status--failed"),
        Some("aborted") => ("✘", "status status--aborted"),
        _ => ("⚙", "status status--spin"),
    }
}

/// Civil calendar fields for a day count since the unix epoch:
/// (year, month 1-12, day 1-31, weekday 0=Sunday).
#[allow(clippy::cast_sign_loss)]
fn civil_date(days: i64) -> (i64, usize, i64, usize) {
    // Howard Hinnant's days-to-civil algorithm.
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let year = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = if month <= 2 { year + 1 } else { year };
    let weekday = (days + 4).rem_euclid(7) as usize;
    (year, month as usize, day, weekday)
}
