//! District performance data — static dataset, derived averages, export.
//!
//! # Layers
//!
//! ```text
//! dataset (static table) → DistrictDataService → PerformanceBundle → UI
//!                                              → DistrictSnapshot
//!                                              → CSV export
//! ```

pub mod dataset;
pub mod export;
pub mod records;
pub mod service;

pub use records::{
    DistrictRecord, DistrictSnapshot, Metric, PerformanceBundle, StateAverageRecord,
    YearlyRecord,
};
pub use service::{DataError, DistrictDataService};
