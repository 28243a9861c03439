//! Static illustrative dataset — Uttar Pradesh districts, 2021–2023.
//!
//! The figures are representative, not live scheme data.  The table is
//! built once on first access and is read-only for the process lifetime.

use std::sync::OnceLock;

use super::records::{DistrictRecord, YearlyRecord};

/// One `(year, households, person-days lakh, avg days, expenditure crore)`
/// tuple per reporting year.
type Row = (u16, f64, f64, f64, f64);

const DISTRICTS: &[(&str, &[Row])] = &[
    (
        "Agra",
        &[
            (2021, 120_000.0, 50.0, 42.0, 200.0),
            (2022, 125_000.0, 55.0, 44.0, 220.0),
            (2023, 130_000.0, 60.0, 46.0, 250.0),
        ],
    ),
    (
        "Lucknow",
        &[
            (2021, 150_000.0, 70.0, 47.0, 280.0),
            (2022, 155_000.0, 75.0, 48.0, 300.0),
            (2023, 160_000.0, 80.0, 50.0, 320.0),
        ],
    ),
    (
        "Varanasi",
        &[
            (2021, 110_000.0, 45.0, 41.0, 180.0),
            (2022, 112_000.0, 48.0, 43.0, 190.0),
            (2023, 115_000.0, 52.0, 45.0, 210.0),
        ],
    ),
    (
        "Kanpur",
        &[
            (2021, 130_000.0, 60.0, 46.0, 240.0),
            (2022, 135_000.0, 65.0, 48.0, 260.0),
            (2023, 140_000.0, 70.0, 50.0, 280.0),
        ],
    ),
    (
        "Prayagraj",
        &[
            (2021, 140_000.0, 68.0, 48.5, 270.0),
            (2022, 142_000.0, 72.0, 50.7, 290.0),
            (2023, 145_000.0, 75.0, 51.7, 310.0),
        ],
    ),
];

/// The full dataset in declaration order.
///
/// Built lazily on first call; subsequent calls return the same slice.
pub fn districts() -> &'static [DistrictRecord] {
    static DATA: OnceLock<Vec<DistrictRecord>> = OnceLock::new();
    DATA.get_or_init(|| {
        DISTRICTS
            .iter()
            .map(|(name, rows)| DistrictRecord {
                name: (*name).to_string(),
                series: rows
                    .iter()
                    .map(|&(year, households, person_days, avg_days, expenditure)| YearlyRecord {
                        year,
                        households_employed: households,
                        person_days_lakh: person_days,
                        average_days: avg_days,
                        expenditure_crore: expenditure,
                    })
                    .collect(),
            })
            .collect()
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_order_is_stable() {
        let names: Vec<&str> = districts().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            ["Agra", "Lucknow", "Varanasi", "Kanpur", "Prayagraj"]
        );
    }

    #[test]
    fn every_series_is_year_ascending() {
        for district in districts() {
            let years: Vec<u16> = district.series.iter().map(|r| r.year).collect();
            let mut sorted = years.clone();
            sorted.sort_unstable();
            assert_eq!(years, sorted, "series out of order for {}", district.name);
        }
    }

    #[test]
    fn no_empty_series() {
        for district in districts() {
            assert!(!district.series.is_empty(), "{} has no data", district.name);
        }
    }
}
