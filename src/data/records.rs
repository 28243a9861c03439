//! Core record types for district performance data.
//!
//! All numeric conventions follow the published MGNREGA reports:
//! person-days are counted in lakhs and expenditure in crore rupees.
//! Records are immutable once loaded from the static dataset.

use serde::{Deserialize, Serialize};

use crate::i18n::Language;

// ---------------------------------------------------------------------------
// YearlyRecord
// ---------------------------------------------------------------------------

/// One financial year of performance figures for a single district.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyRecord {
    /// Calendar year of the reporting period.
    pub year: u16,
    /// Number of households that received employment under the scheme.
    pub households_employed: f64,
    /// Person-days of work generated, in lakhs.
    pub person_days_lakh: f64,
    /// Average days of employment provided per household.
    pub average_days: f64,
    /// Total expenditure on wages and materials, in crore rupees.
    pub expenditure_crore: f64,
}

impl YearlyRecord {
    /// Value of a single metric, used by the forecast and chart surfaces.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::HouseholdsEmployed => self.households_employed,
            Metric::PersonDays => self.person_days_lakh,
            Metric::AverageDays => self.average_days,
            Metric::Expenditure => self.expenditure_crore,
        }
    }
}

// ---------------------------------------------------------------------------
// Metric
// ---------------------------------------------------------------------------

/// The four published performance metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    HouseholdsEmployed,
    PersonDays,
    AverageDays,
    Expenditure,
}

impl Metric {
    /// All metrics in display order.
    pub const ALL: [Metric; 4] = [
        Metric::HouseholdsEmployed,
        Metric::PersonDays,
        Metric::AverageDays,
        Metric::Expenditure,
    ];

    /// Localized display label.
    pub fn label(&self, language: Language) -> &'static str {
        let s = language.strings();
        match self {
            Metric::HouseholdsEmployed => s.households_metric,
            Metric::PersonDays => s.person_days_metric,
            Metric::AverageDays => s.avg_days_metric,
            Metric::Expenditure => s.expenditure_metric,
        }
    }

    /// English name used inside AI prompts regardless of UI language.
    pub fn prompt_name(&self) -> &'static str {
        match self {
            Metric::HouseholdsEmployed => "Households Provided Employment",
            Metric::PersonDays => "Person-Days Generated (lakh)",
            Metric::AverageDays => "Average Days of Employment per Household",
            Metric::Expenditure => "Total Expenditure (crore rupees)",
        }
    }
}

// ---------------------------------------------------------------------------
// DistrictRecord
// ---------------------------------------------------------------------------

/// A district and its yearly series, sorted by year ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictRecord {
    /// District name — the unique lookup key.
    pub name: String,
    /// Yearly figures in ascending year order.
    pub series: Vec<YearlyRecord>,
}

impl DistrictRecord {
    /// The chronologically last record, or `None` for an empty series.
    pub fn latest(&self) -> Option<&YearlyRecord> {
        self.series.iter().max_by_key(|r| r.year)
    }
}

// ---------------------------------------------------------------------------
// StateAverageRecord
// ---------------------------------------------------------------------------

/// Per-year arithmetic mean of each metric across all districts that have
/// data for that year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateAverageRecord {
    pub year: u16,
    pub households_employed: f64,
    pub person_days_lakh: f64,
    pub average_days: f64,
    pub expenditure_crore: f64,
}

// ---------------------------------------------------------------------------
// Bundles
// ---------------------------------------------------------------------------

/// Everything the dashboard needs for one selected district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceBundle {
    pub district: DistrictRecord,
    /// State averages for every year present anywhere in the dataset,
    /// ascending by year.
    pub state_average: Vec<StateAverageRecord>,
}

impl PerformanceBundle {
    /// The district's latest record paired with the matching state average,
    /// when both exist for the same year.
    pub fn latest_with_average(&self) -> Option<(&YearlyRecord, &StateAverageRecord)> {
        let latest = self.district.latest()?;
        let avg = self.state_average.iter().find(|a| a.year == latest.year)?;
        Some((latest, avg))
    }
}

/// A district's name paired with its chronologically last record.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictSnapshot {
    pub name: String,
    pub latest: YearlyRecord,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
