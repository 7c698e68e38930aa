//! File-level aggregations over an access log.

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::error;

use crate::error::{BicimadError, Result};
use crate::logs::fields;

/// Count accesses per hour of day across a log file.
///
/// Lines whose timestamp cannot be parsed are logged and skipped, so one bad
/// line never discards the rest of the file.
pub fn hourly_histogram(path: impl AsRef<Path>) -> Result<BTreeMap<u32, u64>> {
    let path = path.as_ref();
    let file = open(path)?;
    hourly_histogram_from_reader(BufReader::new(file)).map_err(|e| BicimadError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// [`hourly_histogram`] over any buffered reader.
pub fn hourly_histogram_from_reader<R: BufRead>(reader: R) -> io::Result<BTreeMap<u32, u64>> {
    let mut histogram = BTreeMap::new();
    for line in reader.lines() {
        let line = line?;
        match fields::hour(&line) {
            Ok(hour) => *histogram.entry(hour).or_insert(0) += 1,
            Err(e) => error!(error = %e, "skipping log line without a parseable hour"),
        }
    }
    Ok(histogram)
}

/// Collect the distinct IPs of non-bot accesses across a log file.
pub fn visitor_ips(path: impl AsRef<Path>) -> Result<HashSet<String>> {
    let path = path.as_ref();
    let file = open(path)?;
    visitor_ips_from_reader(BufReader::new(file)).map_err(|e| BicimadError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// [`visitor_ips`] over any buffered reader.
pub fn visitor_ips_from_reader<R: BufRead>(reader: R) -> io::Result<HashSet<String>> {
    let mut ips = HashSet::new();
    for line in reader.lines() {
        let line = line?;
        if fields::is_bot(&line) {
            continue;
        }
        match fields::ip_address(&line) {
            Some(ip) => {
                ips.insert(ip.to_string());
            }
            None => error!("skipping log line without an IP address"),
        }
    }
    Ok(ips)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| BicimadError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
