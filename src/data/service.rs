//! District data service — list, per-district bundle, latest snapshot.
//!
//! Reads exclusively from the static dataset; there are no mutation
//! operations.  State averages are recomputed on each call rather than
//! cached, so the averaging rule (exclude districts with no record for a
//! year) lives in exactly one place.

use std::collections::BTreeMap;

use thiserror::Error;

use super::dataset;
use super::records::{
    DistrictSnapshot, PerformanceBundle, StateAverageRecord, YearlyRecord,
};

// ---------------------------------------------------------------------------
// DataError
// ---------------------------------------------------------------------------

/// Errors from data lookups.
///
/// `UnknownDistrict` is an explicit "no data" condition the UI renders
/// differently from a network failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataError {
    #[error("no data for district {0:?}")]
    UnknownDistrict(String),
}

// ---------------------------------------------------------------------------
// DistrictDataService
// ---------------------------------------------------------------------------

/// Read-only access to the district performance dataset.
///
/// Cheap to construct; holds no state of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct DistrictDataService;

impl DistrictDataService {
    pub fn new() -> Self {
        Self
    }

    /// All district names in dataset declaration order.
    pub fn list_districts(&self) -> Vec<String> {
        dataset::districts().iter().map(|d| d.name.clone()).collect()
    }

    /// The named district's series plus per-year state averages.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::UnknownDistrict`] when the name is absent from
    /// the dataset.
    pub fn get_performance(&self, district_name: &str) -> Result<PerformanceBundle, DataError> {
        let district = dataset::districts()
            .iter()
            .find(|d| d.name == district_name)
            .cloned()
            .ok_or_else(|| DataError::UnknownDistrict(district_name.to_string()))?;

        Ok(PerformanceBundle {
            district,
            state_average: self.state_averages(),
        })
    }

    /// Per-year arithmetic mean of each metric across the districts that
    /// have a record for that year.  Districts missing a year are excluded
    /// from that year's mean, never counted as zero.
    pub fn state_averages(&self) -> Vec<StateAverageRecord> {
        struct Totals {
            count: usize,
            households: f64,
            person_days: f64,
            avg_days: f64,
            expenditure: f64,
        }

        let mut by_year: BTreeMap<u16, Totals> = BTreeMap::new();

        for district in dataset::districts() {
            for record in &district.series {
                let totals = by_year.entry(record.year).or_insert(Totals {
                    count: 0,
                    households: 0.0,
                    person_days: 0.0,
                    avg_days: 0.0,
                    expenditure: 0.0,
                });
                totals.count += 1;
                totals.households += record.households_employed;
                totals.person_days += record.person_days_lakh;
                totals.avg_days += record.average_days;
                totals.expenditure += record.expenditure_crore;
            }
        }

        by_year
            .into_iter()
            .map(|(year, t)| {
                let n = t.count as f64;
                StateAverageRecord {
                    year,
                    households_employed: t.households / n,
                    person_days_lakh: t.person_days / n,
                    average_days: t.avg_days / n,
                    expenditure_crore: t.expenditure / n,
                }
            })
            .collect()
    }

    /// Every district's chronologically last record, in declaration order.
    ///
    /// "Latest" is the maximum year present per district, not a global
    /// fixed year; districts with an empty series are skipped.
    pub fn latest_snapshot(&self) -> Vec<DistrictSnapshot> {
        dataset::districts()
            .iter()
            .filter_map(|d| {
                d.latest().map(|latest: &YearlyRecord| DistrictSnapshot {
                    name: d.name.clone(),
                    latest: *latest,
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
