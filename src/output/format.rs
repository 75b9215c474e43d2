//! Human-readable number formatting shared by the renderers.

use crate::parser::schema::Category;

const BYTE_UNITS: &[u8] = b"KMGTPE";

/// Binary byte size, e.g. `78.1 KiB`
pub fn format_bytes(bytes: i64) -> String {
    let sign = if bytes < 0 { "-" } else { "" };
    let abs = bytes.unsigned_abs();
    if abs < 1024 {
        return format!("{}{} B", sign, abs);
    }

    let mut div: u64 = 1024;
    let mut exp = 0;
    let mut n = abs / 1024;
    while n >= 1024 && exp + 1 < BYTE_UNITS.len() {
        div *= 1024;
        exp += 1;
        n /= 1024;
    }
    format!(
        "{}{:.1} {}iB",
        sign,
        abs as f64 / div as f64,
        BYTE_UNITS[exp] as char
    )
}

/// Duration from nanoseconds, scaled to the largest sensible unit
pub fn format_duration_nanos(nanos: i64) -> String {
    let sign = if nanos < 0 { "-" } else { "" };
    let abs = nanos.unsigned_abs();

    let body = if abs < 1_000 {
        format!("{} ns", abs)
    } else if abs < 1_000_000 {
        format!("{:.2} µs", abs as f64 / 1e3)
    } else if abs < 1_000_000_000 {
        format!("{:.2} ms", abs as f64 / 1e6)
    } else if abs < 60_000_000_000 {
        format!("{:.2} s", abs as f64 / 1e9)
    } else {
        let secs = abs / 1_000_000_000;
        let mins = secs / 60;
        if mins < 60 {
            format!("{} m {} s", mins, secs % 60)
        } else {
            format!("{} h {} m", mins / 60, mins % 60)
        }
    };
    format!("{}{}", sign, body)
}

/// Short count, e.g. `1.5K`, `12.0M`
pub fn format_number(n: i64) -> String {
    let sign = if n < 0 { "-" } else { "" };
    let abs = n.unsigned_abs();
    let body = if abs < 1_000 {
        abs.to_string()
    } else if abs < 1_000_000 {
        format!("{:.1}K", abs as f64 / 1e3)
    } else if abs < 1_000_000_000 {
        format!("{:.1}M", abs as f64 / 1e6)
    } else {
        format!("{:.1}G", abs as f64 / 1e9)
    };
    format!("{}{}", sign, body)
}

/// Signed short count; zero is shown without a sign
pub fn format_delta(delta: i64) -> String {
    if delta > 0 {
        format!("+{}", format_number(delta))
    } else {
        format_number(delta)
    }
}

fn unit_formatter(category: Category) -> fn(i64) -> String {
    match category {
        Category::Cpu | Category::Mutex => format_duration_nanos,
        Category::Heap => format_bytes,
        Category::Goroutine => format_number,
    }
}

/// A metric value in the unit its category measures
pub fn format_metric(category: Category, value: i64) -> String {
    unit_formatter(category)(value)
}

/// Formatter for metrics of a capture with sampling `period`
///
/// CPU captures without a period carry raw sample counts, not nanoseconds.
pub fn metric_formatter(category: Category, period: i64) -> fn(i64) -> String {
    if category == Category::Cpu && period <= 0 {
        format_number
    } else {
        unit_formatter(category)
    }
}

/// `fmt(delta)` with a leading `+` when the delta is positive
pub fn format_signed(fmt: fn(i64) -> String, delta: i64) -> String {
    if delta > 0 {
        format!("+{}", fmt(delta))
    } else {
        fmt(delta)
    }
}

/// Signed metric delta in the unit its category measures
pub fn format_metric_delta(category: Category, delta: i64) -> String {
    format_signed(unit_formatter(category), delta)
}
