//! EMT open-data catalog: link discovery and month/year URL resolution.

use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::error::{BicimadError, Result};

/// Links on the listing page that point at a monthly trip archive.
static TRIP_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="([^"]*trips_[^"]*\.aspx)""#).unwrap());

/// Configuration for catalog access.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the open-data portal.
    pub base_url: String,
    /// Path of the listing page that enumerates monthly archives.
    pub listing_path: String,
    /// HTTP timeout for catalog and archive requests.
    pub timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://opendata.emtmadrid.es".to_string(),
            listing_path: "/Datos-estaticos/Datos-generales-(1)".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// The set of downloadable monthly trip archives discovered on the
/// EMT listing page.
#[derive(Debug, Clone)]
pub struct EmtCatalog {
    config: CatalogConfig,
    links: Vec<String>,
}

impl EmtCatalog {
    /// Fetch the listing page and scan it for trip-archive links.
    ///
    /// A network or HTTP failure degrades to an empty catalog: the error is
    /// logged and every subsequent [`resolve_url`](Self::resolve_url) call
    /// reports the archive as unavailable.
    pub fn fetch(config: CatalogConfig) -> Self {
        let listing_url = format!("{}{}", config.base_url, config.listing_path);
        let links = match fetch_listing(&listing_url, config.timeout) {
            Ok(html) => scan_links(&html),
            Err(e) => {
                warn!(url = %listing_url, error = %e, "catalog fetch failed, using empty catalog");
                Vec::new()
            }
        };
        debug!(count = links.len(), "catalog links discovered");
        Self { config, links }
    }

    /// Build a catalog from already-downloaded listing HTML.
    pub fn from_html(config: CatalogConfig, html: &str) -> Self {
        let links = scan_links(html);
        Self { config, links }
    }

    /// The discovered archive links, in document order.
    pub fn links(&self) -> &[String] {
        &self.links
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Resolve the download URL for a month/year pair.
    ///
    /// Month must be 1-12 and year 21-23 (two-digit); anything else is an
    /// [`InvalidPeriod`](BicimadError::InvalidPeriod). An in-range pair with
    /// no matching catalog entry is an
    /// [`ArchiveNotFound`](BicimadError::ArchiveNotFound). The first matching
    /// link wins, so resolution is deterministic for a fixed catalog.
    pub fn resolve_url(&self, month: u32, year: u32) -> Result<String> {
        if !(1..=12).contains(&month) || !(21..=23).contains(&year) {
            return Err(BicimadError::InvalidPeriod { month, year });
        }

        let needle = format!("trips_{year}_{month:02}");
        self.links
            .iter()
            .find(|link| link.contains(&needle))
            .map(|link| format!("{}{}", self.config.base_url, link))
            .ok_or(BicimadError::ArchiveNotFound { month, year })
    }
}

/// Extract every trip-archive href from listing HTML, preserving order.
pub fn scan_links(html: &str) -> Vec<String> {
    TRIP_LINK
        .captures_iter(html)
        .map(|cap| cap[1].to_string())
        .collect()
}

fn fetch_listing(url: &str, timeout: Duration) -> Result<String> {
    let client = Client::builder().timeout(timeout).build()?;
    let response = client.get(url).send()?.error_for_status()?;
    Ok(response.text()?)
}
