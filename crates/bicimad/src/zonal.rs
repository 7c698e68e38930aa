//! Zonal statistics over a pair of equal-shape 2D grids.
//!
//! A zone grid labels each cell with an integer zone id; a value grid holds
//! the measurements. [`zonal_means`] replaces every cell with the mean of its
//! zone, the operation behind raster zonal-statistics layers.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use ndarray::Array2;

use crate::error::{BicimadError, Result};

/// Read a whitespace-delimited numeric grid from a text file.
///
/// Blank lines are skipped; every remaining row must have the same number of
/// columns.
pub fn read_grid(path: impl AsRef<Path>) -> Result<Array2<f64>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| BicimadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut cells = Vec::new();
    let mut ncols = None;
    let mut nrows = 0;

    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        let mut width = 0;
        for (col, token) in line.split_whitespace().enumerate() {
            let value = token.parse::<f64>().map_err(|e| BicimadError::Parse {
                row: nrows,
                column: col,
                message: format!("'{token}': {e}"),
            })?;
            cells.push(value);
            width += 1;
        }

        let expected = *ncols.get_or_insert(width);
        if width != expected {
            return Err(BicimadError::RaggedGrid {
                path: path.to_path_buf(),
                row: nrows,
                expected,
                found: width,
            });
        }
        nrows += 1;
    }

    let ncols = ncols
        .ok_or_else(|| BicimadError::EmptyData(format!("no grid rows in '{}'", path.display())))?;

    Array2::from_shape_vec((nrows, ncols), cells).map_err(|e| BicimadError::Parse {
        row: 0,
        column: 0,
        message: e.to_string(),
    })
}

/// The distinct zone ids present in a zone grid.
///
/// Fails with [`NonIntegerZone`](BicimadError::NonIntegerZone) if any cell is
/// not an integer value.
pub fn unique_zones(zones: &Array2<f64>) -> Result<BTreeSet<i64>> {
    let ids = zone_ids(zones)?;
    Ok(ids.iter().copied().collect())
}

/// Replace every cell of the value grid with the mean of its zone, rounded
/// to one decimal place.
///
/// Fails if the grids differ in shape or if the zone grid is not integral.
pub fn zonal_means(zones: &Array2<f64>, values: &Array2<f64>) -> Result<Array2<f64>> {
    if zones.dim() != values.dim() {
        return Err(BicimadError::ShapeMismatch {
            zones: zones.dim(),
            values: values.dim(),
        });
    }

    let ids = zone_ids(zones)?;

    let mut sums: HashMap<i64, (f64, usize)> = HashMap::new();
    for (&zone, &value) in ids.iter().zip(values.iter()) {
        let entry = sums.entry(zone).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    let means: HashMap<i64, f64> = sums
        .into_iter()
        .map(|(zone, (sum, count))| (zone, round1(sum / count as f64)))
        .collect();

    Ok(ids.map(|zone| means[zone]))
}

/// Validate integrality and convert the zone grid to ids.
fn zone_ids(zones: &Array2<f64>) -> Result<Array2<i64>> {
    let mut ids = Array2::zeros(zones.dim());
    for ((row, col), &value) in zones.indexed_iter() {
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(BicimadError::NonIntegerZone { value, row, col });
        }
        ids[(row, col)] = value as i64;
    }
    Ok(ids)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
