//! Per-line field extraction from Apache combined log lines.

use chrono::{NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::error;

use crate::error::{BicimadError, Result};

/// First bracketed group, which holds the request timestamp.
static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(.*?)\]").unwrap());

/// Double-quoted substrings: request line, referrer, user agent.
static QUOTED: Lazy<Regex> = Lazy::new(|| Regex::new(r#""(.*?)""#).unwrap());

/// Timestamp layout inside the brackets, timezone offset excluded.
const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S";

/// The client IP: the first whitespace-delimited token of the line.
pub fn ip_address(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

/// The hour of the request, parsed from the bracketed timestamp.
///
/// The timezone offset after the space is ignored, so
/// `[15/Sep/2023:00:18:46 +0200]` yields 0.
pub fn hour(line: &str) -> Result<u32> {
    let stamp = BRACKETED
        .captures(line)
        .and_then(|cap| cap.get(1))
        .ok_or_else(|| BicimadError::LogFormat("no bracketed timestamp".to_string()))?;

    let local = stamp.as_str().split(' ').next().unwrap_or_default();
    let parsed = NaiveDateTime::parse_from_str(local, TIMESTAMP_FORMAT)
        .map_err(|e| BicimadError::LogFormat(format!("bad timestamp '{local}': {e}")))?;

    Ok(parsed.hour())
}

/// The user agent: the third double-quoted substring. Lines with fewer than
/// three quoted fields log an error and yield `None`.
pub fn user_agent(line: &str) -> Option<&str> {
    match QUOTED.captures_iter(line).nth(2) {
        Some(cap) => cap.get(1).map(|m| m.as_str()),
        None => {
            error!(line, "log line has no user agent field");
            None
        }
    }
}

/// Whether the access comes from a crawler, detected by a case-insensitive
/// `"bot"` substring anywhere in the line.
pub fn is_bot(line: &str) -> bool {
    line.to_lowercase().contains("bot")
}
