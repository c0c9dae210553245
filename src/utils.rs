//! Utility functions for dates, string handling, and file system checks.
//!
//! This module provides helper functions used throughout the crate:
//! - The default rolling seven-day search window
//! - Whitespace normalisation for extracted text
//! - String truncation for logging
//! - File system validation for output directories

use chrono::{Duration, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Date format expected by the search API.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Compute a `(from, to)` window of `days` days ending on `today`.
///
/// # Examples
///
/// ```ignore
/// let today = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
/// assert_eq!(date_window(today, 7), ("2024-02-27".into(), "2024-03-05".into()));
/// ```
pub fn date_window(today: NaiveDate, days: i64) -> (String, String) {
    let from = today - Duration::days(days);
    (
        from.format(DATE_FORMAT).to_string(),
        today.format(DATE_FORMAT).to_string(),
    )
}

/// The rolling seven-day window ending today in local time.
pub fn last_week() -> (String, String) {
    date_window(Local::now().date_naive(), 7)
}

/// Collapse every run of whitespace into one space and trim the ends.
pub fn normalize_whitespace(s: &str) -> String {
    WHITESPACE.replace_all(s, " ").trim().to_string()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a character boundary) with
/// an ellipsis and byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then creates and removes a
/// probe file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}
