//! BiciMad monthly trip data: catalog resolution, download, cleaning, and
//! summary statistics.

pub mod catalog;
pub mod dataset;
pub mod fetch;
pub mod summary;
pub mod table;

pub use catalog::{CatalogConfig, EmtCatalog};
pub use dataset::TripDataset;
pub use summary::{PopularGroups, TripSummary, most_popular, summarize};
pub use table::{ID_COLUMNS, KEPT_COLUMNS, TripTable};
