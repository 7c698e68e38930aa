//! Parsed monthly trip table and in-place cleaning.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{BicimadError, Result};

/// Columns retained from the raw EMT export, in table order.
pub const KEPT_COLUMNS: [&str; 15] = [
    "idBike",
    "fleet",
    "trip_minutes",
    "geolocation_unlock",
    "address_unlock",
    "unlock_date",
    "locktype",
    "unlocktype",
    "geolocation_lock",
    "address_lock",
    "lock_date",
    "station_unlock",
    "unlock_station_name",
    "station_lock",
    "lock_station_name",
];

/// Identifier columns coerced to text during cleaning. Their values are
/// categorical even though the export renders them as floats.
pub const ID_COLUMNS: [&str; 4] = ["fleet", "idBike", "station_lock", "station_unlock"];

/// Name of the date-index column in the raw export.
pub const INDEX_COLUMN: &str = "fecha";

/// One month of trip records: a date index plus the retained columns as
/// string cells.
#[derive(Debug, Clone)]
pub struct TripTable {
    headers: Vec<String>,
    index: Vec<Option<NaiveDate>>,
    rows: Vec<Vec<String>>,
}

impl TripTable {
    /// Parse a `;`-separated trip export.
    ///
    /// Columns outside [`KEPT_COLUMNS`] are dropped; a missing kept column or
    /// a missing `fecha` index column is an error.
    pub fn parse(csv_text: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_text.as_bytes());

        let raw_headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

        let index_pos = raw_headers
            .iter()
            .position(|h| h == INDEX_COLUMN)
            .ok_or_else(|| BicimadError::MissingColumn(INDEX_COLUMN.to_string()))?;

        let kept_pos: Vec<usize> = KEPT_COLUMNS
            .iter()
            .map(|name| {
                raw_headers
                    .iter()
                    .position(|h| h == name)
                    .ok_or_else(|| BicimadError::MissingColumn(name.to_string()))
            })
            .collect::<Result<_>>()?;

        let mut index = Vec::new();
        let mut rows = Vec::new();

        for record in reader.records() {
            let record = record?;
            index.push(record.get(index_pos).and_then(parse_fecha));
            rows.push(
                kept_pos
                    .iter()
                    .map(|&pos| record.get(pos).unwrap_or_default().to_string())
                    .collect(),
            );
        }

        Ok(Self {
            headers: KEPT_COLUMNS.iter().map(|s| s.to_string()).collect(),
            index,
            rows,
        })
    }

    /// Column headers, in table order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Parsed `fecha` index, one entry per row.
    pub fn index(&self) -> &[Option<NaiveDate>] {
        &self.index
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| BicimadError::MissingColumn(name.to_string()))
    }

    /// All values of a column by position.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// A specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(|s| s.as_str())
    }

    /// Check whether a cell holds no value.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
    }

    /// Clean the table in place:
    ///
    /// 1. drop rows whose retained cells are all empty;
    /// 2. coerce the [`ID_COLUMNS`] to text, truncating the float artifact
    ///    (`"123.0"` becomes `"123"`);
    /// 3. drop rows whose `trip_minutes` is missing or negative.
    ///
    /// Reapplying to already-clean data changes nothing.
    pub fn clean(&mut self) {
        self.retain_rows(|row| !row.iter().all(|cell| Self::is_null_value(cell)));

        let id_positions: Vec<usize> = ID_COLUMNS
            .iter()
            .filter_map(|name| self.headers.iter().position(|h| h == *name))
            .collect();
        for row in &mut self.rows {
            for &pos in &id_positions {
                if let Some(cell) = row.get_mut(pos) {
                    if let Some(dot) = cell.find('.') {
                        cell.truncate(dot);
                    }
                }
            }
        }

        // Unwrap is safe: trip_minutes is in KEPT_COLUMNS by construction.
        let minutes_pos = self.column_index("trip_minutes").unwrap();
        self.retain_rows(|row| {
            row.get(minutes_pos)
                .and_then(|cell| cell.trim().parse::<f64>().ok())
                .is_some_and(|minutes| minutes >= 0.0)
        });
    }

    fn retain_rows(&mut self, keep: impl Fn(&[String]) -> bool) {
        let index = std::mem::take(&mut self.index);
        let rows = std::mem::take(&mut self.rows);
        for (date, row) in index.into_iter().zip(rows) {
            if keep(&row) {
                self.index.push(date);
                self.rows.push(row);
            }
        }
    }
}

/// Parse the export's date index. The EMT feed has shipped both plain dates
/// and full timestamps, so several formats are tried; failures index as
/// `None` rather than rejecting the row.
fn parse_fecha(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(value, "%d/%m/%Y").ok())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a minimal export with the full header set and the given
    /// (fecha, idBike, fleet, trip_minutes, station_unlock) tuples.
    pub(crate) fn sample_csv(rows: &[(&str, &str, &str, &str, &str)]) -> String {
        let mut text = String::from(
            "fecha;idBike;fleet;trip_minutes;geolocation_unlock;address_unlock;\
             unlock_date;locktype;unlocktype;geolocation_lock;address_lock;\
             lock_date;station_unlock;unlock_station_name;station_lock;\
             lock_station_name;extra_column\n",
        );
        for (fecha, bike, fleet, minutes, station) in rows {
            text.push_str(&format!(
                "{fecha};{bike};{fleet};{minutes};POINT (-3.7 40.4);Calle Mayor 1;\
                 {fecha};STATION;STATION;POINT (-3.7 40.4);Calle Mayor 2;\
                 {fecha};{station};Estacion {station};12.0;Estacion 12;ignored\n"
            ));
        }
        text
    }

    #[test]
    fn test_parse_keeps_selected_columns() {
        let table =
            TripTable::parse(&sample_csv(&[("2023-02-01", "1234.0", "1.0", "12.5", "43.0")]))
                .unwrap();
        assert_eq!(table.headers().len(), KEPT_COLUMNS.len());
        assert_eq!(table.row_count(), 1);
        assert!(table.column_index("extra_column").is_err());
        assert_eq!(table.index()[0], NaiveDate::from_ymd_opt(2023, 2, 1));
    }

    #[test]
    fn test_parse_missing_column() {
        let err = TripTable::parse("fecha;idBike\n2023-02-01;1\n").unwrap_err();
        assert!(matches!(err, BicimadError::MissingColumn(_)));
    }

    #[test]
    fn test_clean_truncates_id_floats() {
        let mut table =
            TripTable::parse(&sample_csv(&[("2023-02-01", "1234.0", "1.0", "12.5", "43.0")]))
                .unwrap();
        table.clean();

        let bike = table.column_index("idBike").unwrap();
        let station = table.column_index("station_unlock").unwrap();
        assert_eq!(table.get(0, bike), Some("1234"));
        assert_eq!(table.get(0, station), Some("43"));
    }

    #[test]
    fn test_clean_drops_negative_and_unparseable_durations() {
        let mut table = TripTable::parse(&sample_csv(&[
            ("2023-02-01", "1", "1", "12.5", "43"),
            ("2023-02-01", "2", "1", "-3.0", "43"),
            ("2023-02-01", "3", "1", "", "43"),
        ]))
        .unwrap();
        table.clean();

        assert_eq!(table.row_count(), 1);
        let bike = table.column_index("idBike").unwrap();
        assert_eq!(table.get(0, bike), Some("1"));
    }

    #[test]
    fn test_clean_drops_all_empty_rows() {
        let mut csv = sample_csv(&[("2023-02-01", "1", "1", "12.5", "43")]);
        csv.push_str(";;;;;;;;;;;;;;;;\n");
        let mut table = TripTable::parse(&csv).unwrap();
        assert_eq!(table.row_count(), 2);
        table.clean();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_clean_is_idempotent() {
        let mut table = TripTable::parse(&sample_csv(&[
            ("2023-02-01", "1234.0", "1.0", "12.5", "43.0"),
            ("2023-02-02", "77.0", "2.0", "0.0", "9.0"),
        ]))
        .unwrap();
        table.clean();
        let once = table.clone();
        table.clean();

        assert_eq!(table.row_count(), once.row_count());
        for row in 0..table.row_count() {
            for col in 0..table.headers().len() {
                assert_eq!(table.get(row, col), once.get(row, col));
            }
        }
    }
}
