//! # Value Formatting
//!
//! Money, dates and status keys as they appear on the page. All formatters
//! are total: a missing value becomes the configured placeholder, an
//! unparseable date passes through unchanged, and an unknown status key gets
//! a neutral fallback style.

pub mod status;

use std::fmt::Write as FmtWrite;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::config::FormatConfig;

pub use status::{StatusKind, StatusStyle, StatusTable};

/// Format `value` as money with two decimals, e.g. `R$ 1.234,56`.
///
/// Negative values keep their sign (`-R$ 10,00`); no business validation is
/// applied. Non-finite values render as the placeholder.
pub fn currency(value: f64, cfg: &FormatConfig) -> String {
    if !value.is_finite() {
        return cfg.placeholder.clone();
    }
    let amount = number(value, cfg);
    if cfg.currency_symbol.is_empty() {
        return amount;
    }
    match amount.strip_prefix('-') {
        Some(abs) => format!("-{} {}", cfg.currency_symbol, abs),
        None => format!("{} {}", cfg.currency_symbol, amount),
    }
}

/// Format `value` with two decimals and locale separators, e.g. `1.234,56`.
pub fn number(value: f64, cfg: &FormatConfig) -> String {
    if !value.is_finite() {
        return cfg.placeholder.clone();
    }
    let cents = (value.abs() * 100.0).round() as u128;
    let negative = value < 0.0 && cents > 0;
    format!(
        "{}{}{}{:02}",
        if negative { "-" } else { "" },
        group_thousands(cents / 100, &cfg.group_separator),
        cfg.decimal_separator,
        cents % 100
    )
}

/// Format a bare number: whole values without decimals (`1.200`), anything
/// else like [`number`].
pub fn plain(value: f64, cfg: &FormatConfig) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        let units = value.abs() as u128;
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{}{}", sign, group_thousands(units, &cfg.group_separator));
    }
    number(value, cfg)
}

/// Format a percentage with one decimal, e.g. `72,5%`.
pub fn percent(value: f64, cfg: &FormatConfig) -> String {
    if !value.is_finite() {
        return cfg.placeholder.clone();
    }
    let tenths = (value.abs() * 10.0).round() as u128;
    let negative = value < 0.0 && tenths > 0;
    format!(
        "{}{}{}{}%",
        if negative { "-" } else { "" },
        tenths / 10,
        cfg.decimal_separator,
        tenths % 10
    )
}

fn group_thousands(mut units: u128, separator: &str) -> String {
    let mut groups = Vec::new();
    loop {
        if units < 1000 {
            groups.push(units.to_string());
            break;
        }
        groups.push(format!("{:03}", units % 1000));
        units /= 1000;
    }
    groups.reverse();
    groups.join(separator)
}

/// Parse the date and timestamp shapes the data layer emits.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn has_time(raw: &str) -> bool {
    raw.trim().len() > "YYYY-MM-DD".len()
}

fn format_with(dt: &NaiveDateTime, pattern: &str, fallback: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", dt.format(pattern)).is_ok() {
        return out;
    }
    log::warn!("invalid date pattern {pattern:?}, using {fallback:?}");
    dt.format(fallback).to_string()
}

/// Format a date as day/month/year. Blank input renders the placeholder;
/// unparseable input passes through unchanged.
pub fn date(raw: &str, cfg: &FormatConfig) -> String {
    if raw.trim().is_empty() {
        return cfg.placeholder.clone();
    }
    match parse_timestamp(raw) {
        Some(dt) => format_with(&dt, &cfg.date_pattern, "%d/%m/%Y"),
        None => {
            log::warn!("unparseable date {raw:?} rendered as-is");
            raw.to_string()
        }
    }
}

/// Like [`date`], but keeps the time of day when the input carries one.
pub fn datetime(raw: &str, cfg: &FormatConfig) -> String {
    if raw.trim().is_empty() {
        return cfg.placeholder.clone();
    }
    match parse_timestamp(raw) {
        Some(dt) if has_time(raw) => format_with(&dt, &cfg.datetime_pattern, "%d/%m/%Y %H:%M"),
        Some(dt) => format_with(&dt, &cfg.date_pattern, "%d/%m/%Y"),
        None => {
            log::warn!("unparseable timestamp {raw:?} rendered as-is");
            raw.to_string()
        }
    }
}

/// `value` itself, or the placeholder when it is missing or blank.
pub fn or_placeholder(value: Option<&str>, cfg: &FormatConfig) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => cfg.placeholder.clone(),
    }
}

/// PDF date string (`D:YYYYMMDDHHmmSS`) for the document info dictionary.
pub fn pdf_date(raw: &str) -> Option<String> {
    parse_timestamp(raw).map(|dt| dt.format("D:%Y%m%d%H%M%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> FormatConfig {
        FormatConfig::default()
    }

    #[test]
    fn currency_uses_locale_separators() {
        assert_eq!(currency(1234.5, &cfg()), "R$ 1.234,50");
        assert_eq!(currency(0.0, &cfg()), "R$ 0,00");
        assert_eq!(currency(1_000_000.0, &cfg()), "R$ 1.000.000,00");
        assert_eq!(currency(999.999, &cfg()), "R$ 1.000,00");
    }

    #[test]
    fn negative_money_is_rendered_as_given() {
        assert_eq!(currency(-42.1, &cfg()), "-R$ 42,10");
        // Rounds to zero: no dangling minus sign.
        assert_eq!(currency(-0.001, &cfg()), "R$ 0,00");
    }

    #[test]
    fn non_finite_money_is_a_placeholder() {
        assert_eq!(currency(f64::NAN, &cfg()), "\u{2014}");
        assert_eq!(number(f64::INFINITY, &cfg()), "\u{2014}");
    }

    #[test]
    fn custom_locale() {
        let c = FormatConfig {
            currency_symbol: "$".into(),
            group_separator: ",".into(),
            decimal_separator: ".".into(),
            ..Default::default()
        };
        assert_eq!(currency(12345.678, &c), "$ 12,345.68");
    }

    #[test]
    fn plain_numbers_drop_zero_decimals() {
        assert_eq!(plain(1200.0, &cfg()), "1.200");
        assert_eq!(plain(-3.0, &cfg()), "-3");
        assert_eq!(plain(2.5, &cfg()), "2,50");
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(percent(72.46, &cfg()), "72,5%");
        assert_eq!(percent(100.0, &cfg()), "100,0%");
    }

    #[test]
    fn dates_are_day_month_year() {
        assert_eq!(date("2024-03-07", &cfg()), "07/03/2024");
        assert_eq!(date("2024-03-07T15:04:05Z", &cfg()), "07/03/2024");
        assert_eq!(date("2024-03-07T23:30:00-03:00", &cfg()), "07/03/2024");
        assert_eq!(date("2024-03-07 08:15:00", &cfg()), "07/03/2024");
    }

    #[test]
    fn unparseable_dates_pass_through() {
        assert_eq!(date("next tuesday", &cfg()), "next tuesday");
        assert_eq!(date("2024-13-45", &cfg()), "2024-13-45");
        assert_eq!(date("   ", &cfg()), "\u{2014}");
    }

    #[test]
    fn datetime_keeps_time_when_present() {
        assert_eq!(datetime("2024-03-07T15:04:05Z", &cfg()), "07/03/2024 15:04");
        assert_eq!(datetime("2024-03-07", &cfg()), "07/03/2024");
    }

    #[test]
    fn placeholder_for_missing_text() {
        assert_eq!(or_placeholder(None, &cfg()), "\u{2014}");
        assert_eq!(or_placeholder(Some("  "), &cfg()), "\u{2014}");
        assert_eq!(or_placeholder(Some("ACME"), &cfg()), "ACME");
    }

    #[test]
    fn pdf_dates() {
        assert_eq!(pdf_date("2024-03-07T15:04:05Z").as_deref(), Some("D:20240307150405"));
        assert_eq!(pdf_date("garbage"), None);
    }
}
