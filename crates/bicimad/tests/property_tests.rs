//! Property-based tests.
//!
//! These verify that the parsing and aggregation paths never panic on
//! arbitrary input and that the core invariants hold:
//!
//! 1. `clean` is idempotent.
//! 2. The most-popular aggregation returns exactly the max-count groups.
//! 3. Zonal means are constant within a zone and bounded by the zone's
//!    values.
//! 4. The log-line field extractors tolerate any input.
//! 5. Point/vector equality, hashing, and magnitude ordering stay coherent.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use ndarray::Array2;
use proptest::prelude::*;

use bicimad::logs::fields;
use bicimad::trips::{most_popular, TripDataset};
use bicimad::zonal::zonal_means;
use bicimad::{Point, Vector};

// =============================================================================
// Test Strategies
// =============================================================================

/// Station ids drawn from a small pool so ties actually happen.
fn station_ids() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("S[0-9]".prop_map(String::from), 1..40)
}

/// Trip durations as they appear in the export: floats, negatives, blanks.
fn duration_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        (-1000i32..1000).prop_map(|m| format!("{m}.0")),
        (-1000i32..1000).prop_map(|m| m.to_string()),
        Just(String::new()),
    ]
}

/// An equal-shape (zones, values) grid pair with a handful of zones.
fn grid_pair() -> impl Strategy<Value = (Array2<f64>, Array2<f64>)> {
    (1usize..6, 1usize..6)
        .prop_flat_map(|(rows, cols)| {
            (
                Just((rows, cols)),
                prop::collection::vec(0i64..4, rows * cols),
                prop::collection::vec(-100.0f64..100.0, rows * cols),
            )
        })
        .prop_map(|((rows, cols), zones, values)| {
            let zones = Array2::from_shape_vec(
                (rows, cols),
                zones.into_iter().map(|z| z as f64).collect(),
            )
            .unwrap();
            let values = Array2::from_shape_vec((rows, cols), values).unwrap();
            (zones, values)
        })
}

fn trips_csv(rows: &[(String, String)]) -> String {
    let mut text = String::from(
        "fecha;idBike;fleet;trip_minutes;geolocation_unlock;address_unlock;\
         unlock_date;locktype;unlocktype;geolocation_lock;address_lock;\
         lock_date;station_unlock;unlock_station_name;station_lock;\
         lock_station_name\n",
    );
    for (minutes, station) in rows {
        text.push_str(&format!(
            "2023-02-01;101.0;1.0;{minutes};geo;addr;2023-02-01;S;S;geo;addr;\
             2023-02-01;{station};Estacion {station};5.0;Estacion 5\n"
        ));
    }
    text
}

fn hash_of(value: &impl Hash) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// =============================================================================
// Trips
// =============================================================================

proptest! {
    #[test]
    fn clean_is_idempotent(
        cells in prop::collection::vec((duration_cell(), "S[0-9]".prop_map(String::from)), 0..30)
    ) {
        let csv = trips_csv(&cells);
        let mut dataset = TripDataset::from_csv_str(&csv, 2, 23).unwrap();
        dataset.clean();

        let after_once: Vec<Vec<String>> = (0..dataset.table().row_count())
            .map(|row| {
                (0..dataset.table().headers().len())
                    .map(|col| dataset.table().get(row, col).unwrap_or("").to_string())
                    .collect()
            })
            .collect();

        dataset.clean();
        let after_twice: Vec<Vec<String>> = (0..dataset.table().row_count())
            .map(|row| {
                (0..dataset.table().headers().len())
                    .map(|col| dataset.table().get(row, col).unwrap_or("").to_string())
                    .collect()
            })
            .collect();

        prop_assert_eq!(after_once, after_twice);
    }

    #[test]
    fn most_popular_returns_exactly_the_max_groups(stations in station_ids()) {
        let cells: Vec<(String, String)> = stations
            .iter()
            .map(|s| ("10.0".to_string(), s.clone()))
            .collect();
        let dataset = TripDataset::from_csv_str(&trips_csv(&cells), 2, 23).unwrap();

        let popular = most_popular(dataset.table(), "station_unlock").unwrap();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for station in &stations {
            *counts.entry(station).or_insert(0) += 1;
        }
        let max = *counts.values().max().unwrap();

        prop_assert_eq!(popular.uses, max);
        prop_assert!(!popular.groups.is_empty());
        for group in &popular.groups {
            prop_assert_eq!(counts[group.as_str()], max);
        }
        // No max-count group is missing from the result.
        for (group, count) in counts {
            if count == max {
                prop_assert!(popular.groups.contains(group));
            }
        }
    }
}

// =============================================================================
// Zonal Means
// =============================================================================

proptest! {
    #[test]
    fn zonal_means_are_constant_and_bounded_per_zone((zones, values) in grid_pair()) {
        let means = zonal_means(&zones, &values).unwrap();
        prop_assert_eq!(means.dim(), values.dim());

        let mut per_zone: HashMap<i64, Vec<f64>> = HashMap::new();
        for (&zone, &value) in zones.iter().zip(values.iter()) {
            per_zone.entry(zone as i64).or_default().push(value);
        }

        for ((row, col), &mean) in means.indexed_iter() {
            let zone = zones[(row, col)] as i64;
            let members = &per_zone[&zone];
            let min = members.iter().cloned().fold(f64::INFINITY, f64::min);
            let max = members.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

            // Rounded to one decimal, so allow half a tick of slack.
            prop_assert!(mean >= min - 0.05 - 1e-9);
            prop_assert!(mean <= max + 0.05 + 1e-9);

            // One decimal place only.
            prop_assert!((mean * 10.0 - (mean * 10.0).round()).abs() < 1e-9);
        }

        // Same zone, same output everywhere.
        let mut seen: HashMap<i64, f64> = HashMap::new();
        for (&zone, &mean) in zones.iter().zip(means.iter()) {
            let entry = seen.entry(zone as i64).or_insert(mean);
            prop_assert_eq!(*entry, mean);
        }
    }
}

// =============================================================================
// Log Fields
// =============================================================================

proptest! {
    #[test]
    fn log_field_extractors_never_panic(line in ".*") {
        let _ = fields::ip_address(&line);
        let _ = fields::user_agent(&line);
        let _ = fields::is_bot(&line);
        if let Ok(hour) = fields::hour(&line) {
            prop_assert!(hour < 24);
        }
    }
}

// =============================================================================
// Geometry
// =============================================================================

proptest! {
    #[test]
    fn point_and_vector_never_collide(x in -1e6f64..1e6, y in -1e6f64..1e6) {
        let point = Point::new(x, y);
        let vector = Vector::new(x, y);
        prop_assert_ne!(hash_of(&point), hash_of(&vector));
        prop_assert_eq!(hash_of(&point), hash_of(&Point::new(x, y)));
        prop_assert_eq!(hash_of(&vector), hash_of(&Vector::new(x, y)));
    }

    #[test]
    fn vector_ordering_follows_magnitude(
        ax in -100.0f64..100.0, ay in -100.0f64..100.0,
        bx in -100.0f64..100.0, by in -100.0f64..100.0,
    ) {
        let a = Vector::new(ax, ay);
        let b = Vector::new(bx, by);

        if a.magnitude() < b.magnitude() {
            prop_assert!(a < b);
        } else if a.magnitude() > b.magnitude() {
            prop_assert!(a > b);
        } else if a == b {
            prop_assert_eq!(a.partial_cmp(&b), Some(std::cmp::Ordering::Equal));
        } else {
            prop_assert_eq!(a.partial_cmp(&b), None);
        }
    }
}
