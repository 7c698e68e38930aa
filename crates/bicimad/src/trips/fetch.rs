//! Download of monthly trip archives and extraction of the CSV inside.

use std::io::{Cursor, Read};

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use tracing::{debug, error};
use zip::ZipArchive;

use crate::error::{BicimadError, Result};
use crate::trips::catalog::EmtCatalog;

/// The CSV entry inside a monthly archive, matched on file name.
static TRIPS_CSV: Lazy<Regex> = Lazy::new(|| Regex::new(r"^trips_.*\.csv$").unwrap());

/// Download the archive for a month/year and return its trips CSV as text.
pub fn fetch_csv(catalog: &EmtCatalog, month: u32, year: u32) -> Result<String> {
    let url = catalog.resolve_url(month, year)?;
    debug!(%url, month, year, "downloading trip archive");

    let bytes = match download(&url, catalog.config().timeout) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(%url, error = %e, "trip archive download failed");
            return Err(e);
        }
    };

    extract_trips_csv(&bytes, &url)
}

/// Find the first `trips_*.csv` entry in a zip archive and read it as text.
///
/// Entries are matched on their final path component, so a CSV nested in a
/// directory inside the archive is still found.
pub fn extract_trips_csv(bytes: &[u8], url: &str) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let file_name = entry
            .name()
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();

        if TRIPS_CSV.is_match(&file_name) {
            let mut contents = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut contents).map_err(|e| BicimadError::Io {
                path: file_name.into(),
                source: e,
            })?;
            return Ok(String::from_utf8_lossy(&contents).into_owned());
        }
    }

    Err(BicimadError::CsvNotInArchive {
        url: url.to_string(),
    })
}

fn download(url: &str, timeout: std::time::Duration) -> Result<Vec<u8>> {
    let client = Client::builder().timeout(timeout).build()?;
    let response = client.get(url).send()?.error_for_status()?;
    Ok(response.bytes()?.to_vec())
}
