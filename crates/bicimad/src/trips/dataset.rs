//! One month of BiciMad trips, from download to summary.

use crate::error::Result;
use crate::trips::catalog::{CatalogConfig, EmtCatalog};
use crate::trips::fetch;
use crate::trips::summary::{self, TripSummary};
use crate::trips::table::TripTable;

/// A month of trip data tied to the period it was resolved from.
#[derive(Debug, Clone)]
pub struct TripDataset {
    month: u32,
    year: u32,
    table: TripTable,
}

impl TripDataset {
    /// Download and parse the trips for a month/year from the default EMT
    /// catalog.
    pub fn download(month: u32, year: u32) -> Result<Self> {
        let catalog = EmtCatalog::fetch(CatalogConfig::default());
        Self::with_catalog(&catalog, month, year)
    }

    /// Download and parse using an already-built catalog.
    pub fn with_catalog(catalog: &EmtCatalog, month: u32, year: u32) -> Result<Self> {
        let csv_text = fetch::fetch_csv(catalog, month, year)?;
        Self::from_csv_str(&csv_text, month, year)
    }

    /// Parse trips from CSV text already in hand.
    pub fn from_csv_str(csv_text: &str, month: u32, year: u32) -> Result<Self> {
        Ok(Self {
            month,
            year,
            table: TripTable::parse(csv_text)?,
        })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn table(&self) -> &TripTable {
        &self.table
    }

    /// Clean the underlying table in place. See [`TripTable::clean`].
    pub fn clean(&mut self) {
        self.table.clean();
    }

    /// Monthly usage report over the current (ideally cleaned) table.
    pub fn summary(&self) -> Result<TripSummary> {
        summary::summarize(&self.table, self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trips::table::tests::sample_csv;

    #[test]
    fn test_dataset_pipeline() {
        let csv = sample_csv(&[
            ("2023-02-01", "1234.0", "1.0", "30.0", "43.0"),
            ("2023-02-02", "77.0", "1.0", "90.0", "43.0"),
            ("2023-02-03", "78.0", "2.0", "-5.0", "9.0"),
        ]);

        let mut dataset = TripDataset::from_csv_str(&csv, 2, 23).unwrap();
        dataset.clean();
        let summary = dataset.summary().unwrap();

        assert_eq!(summary.month, 2);
        assert_eq!(summary.year, 23);
        assert_eq!(summary.total_uses, 2);
        assert!((summary.total_hours - 2.0).abs() < 1e-9);
        assert!(summary.most_popular_stations.contains("43"));
        assert_eq!(summary.uses_from_most_popular, 2);
    }
}
