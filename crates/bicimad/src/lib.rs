//! bicimad: analysis toolkit for BiciMad open-data trips, Apache access
//! logs, zonal raster statistics, and 2D geometry value types.
//!
//! The modules are independent exercises over a shared error type:
//!
//! - [`trips`] resolves a month/year to a download URL on the EMT open-data
//!   portal, extracts the monthly CSV from its zip archive, cleans the
//!   table, and reports usage summaries.
//! - [`logs`] extracts per-line fields from Apache combined logs and
//!   aggregates hour histograms and visitor IP sets.
//! - [`zonal`] computes per-zone means over a pair of equal-shape grids.
//! - [`geom`] provides point/vector value types with magnitude ordering and
//!   type-discriminated hashing.
//!
//! # Example
//!
//! ```no_run
//! use bicimad::TripDataset;
//!
//! let mut dataset = TripDataset::download(2, 23).unwrap();
//! dataset.clean();
//! let summary = dataset.summary().unwrap();
//!
//! println!("trips: {}", summary.total_uses);
//! println!("busiest stations: {:?}", summary.most_popular_stations);
//! ```

pub mod error;
pub mod geom;
pub mod logs;
pub mod trips;
pub mod zonal;

pub use error::{BicimadError, Result};
pub use geom::{Point, Vector};
pub use trips::{CatalogConfig, EmtCatalog, TripDataset, TripSummary, TripTable};
