//! Aggregation over cleaned trip tables.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{BicimadError, Result};
use crate::trips::table::TripTable;

/// The group(s) tied at the maximum row count for some key column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularGroups {
    /// Every group that attains the maximum count.
    pub groups: BTreeSet<String>,
    /// The maximum per-group row count.
    pub uses: usize,
}

/// Monthly usage report for a cleaned trip table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripSummary {
    pub year: u32,
    pub month: u32,
    /// Number of trips.
    pub total_uses: usize,
    /// Total trip time in hours.
    pub total_hours: f64,
    /// Unlock station(s) with the most departures.
    pub most_popular_stations: BTreeSet<String>,
    /// Departures from the most popular station(s).
    pub uses_from_most_popular: usize,
}

/// Group rows by a key column and return the set of groups tied at the
/// maximum count, plus that count. Empty cells do not form a group.
pub fn most_popular(table: &TripTable, key_column: &str) -> Result<PopularGroups> {
    let key_pos = table.column_index(key_column)?;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for value in table.column_values(key_pos) {
        if !TripTable::is_null_value(value) {
            *counts.entry(value).or_insert(0) += 1;
        }
    }

    let uses = counts
        .values()
        .copied()
        .max()
        .ok_or_else(|| BicimadError::EmptyData(format!("no groups in column '{key_column}'")))?;

    let groups = counts
        .into_iter()
        .filter(|&(_, count)| count == uses)
        .map(|(group, _)| group.to_string())
        .collect();

    Ok(PopularGroups { groups, uses })
}

/// Build the monthly summary: totals plus the most popular unlock stations.
pub fn summarize(table: &TripTable, month: u32, year: u32) -> Result<TripSummary> {
    let minutes_pos = table.column_index("trip_minutes")?;
    let total_minutes: f64 = table
        .column_values(minutes_pos)
        .filter_map(|cell| cell.trim().parse::<f64>().ok())
        .sum();

    let popular = most_popular(table, "station_unlock")?;

    Ok(TripSummary {
        year,
        month,
        total_uses: table.row_count(),
        total_hours: total_minutes / 60.0,
        most_popular_stations: popular.groups,
        uses_from_most_popular: popular.uses,
    })
}
