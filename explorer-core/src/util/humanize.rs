//! src/util/humanize.rs

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local, TimeZone};

use crate::config::Locale;

const KB: u64 = 1024;
const MB: u64 = 1024 * KB;
const GB: u64 = 1024 * MB;

/// Format used for modification dates: `DD.MM.YYYY HH:MM`.
pub const DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Byte count scaled to bytes, KB, MB or GB with two decimals above bytes.
#[expect(clippy::cast_precision_loss, reason = "Display only")]
#[must_use]
pub fn format_size(size: u64, locale: Locale) -> String {
    let [bytes, kb, mb, gb]: [&'static str; 4] = match locale {
        Locale::En => ["bytes", "KB", "MB", "GB"],
        Locale::Ru => ["байт", "Кб", "Мб", "Гб"],
    };

    match size {
        s if s < KB => format!("{s} {bytes}"),
        s if s < MB => format!("{:.2} {kb}", s as f64 / KB as f64),
        s if s < GB => format!("{:.2} {mb}", s as f64 / MB as f64),
        s => format!("{:.2} {gb}", s as f64 / GB as f64),
    }
}

/// Local-time rendering of a filesystem timestamp.
#[expect(clippy::cast_possible_wrap, reason = "Expected")]
#[must_use]
pub fn format_modified(modified: SystemTime) -> String {
    let dur: Duration = modified
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| -> Duration { Duration::from_secs(0) });

    let dt: DateTime<Local> = Local
        .timestamp_opt(dur.as_secs() as i64, dur.subsec_nanos())
        .single()
        .unwrap_or_else(|| -> DateTime<Local> { Local::now() });

    dt.format(DATE_FORMAT).to_string()
}
