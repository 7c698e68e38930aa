//! Apache access-log analysis: per-line field extraction and whole-file
//! aggregations.

pub mod fields;
pub mod summary;

pub use fields::{hour, ip_address, is_bot, user_agent};
pub use summary::{
    hourly_histogram, hourly_histogram_from_reader, visitor_ips, visitor_ips_from_reader,
};
