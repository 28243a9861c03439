//! CSV export of a district's yearly series.
//!
//! Plain `String` rendering plus a save helper; the dashboard writes next
//! to the settings file so the user always knows where exports land.

use std::path::Path;

use anyhow::Result;

use super::records::DistrictRecord;

/// CSV column header, matching the dashboard table order.
const HEADER: &str =
    "year,households_employed,person_days_lakh,average_days,expenditure_crore";

/// Render `district`'s series as CSV, header first, one row per year.
pub fn district_csv(district: &DistrictRecord) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for record in &district.series {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            record.year,
            record.households_employed,
            record.person_days_lakh,
            record.average_days,
            record.expenditure_crore,
        ));
    }
    out
}

/// Write the district's CSV to `path`, creating parent directories.
pub fn save_district_csv(district: &DistrictRecord, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, district_csv(district))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::records::YearlyRecord;
    use tempfile::tempdir;

    fn sample_district() -> DistrictRecord {
        DistrictRecord {
            name: "Agra".into(),
            series: vec![
                YearlyRecord {
                    year: 2022,
                    households_employed: 125_000.0,
                    person_days_lakh: 55.0,
                    average_days: 44.0,
                    expenditure_crore: 220.0,
                },
                YearlyRecord {
                    year: 2023,
                    households_employed: 130_000.0,
                    person_days_lakh: 60.0,
                    average_days: 46.0,
                    expenditure_crore: 250.0,
                },
            ],
        }
    }

    #[test]
    fn header_then_one_row_per_year() {
        let csv = district_csv(&sample_district());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], HEADER);
        assert!(lines[1].starts_with("2022,"));
        assert!(lines[2].starts_with("2023,"));
    }

    #[test]
    fn empty_series_renders_header_only() {
        let district = DistrictRecord {
            name: "Empty".into(),
            series: Vec::new(),
        };
        let csv = district_csv(&district);
        assert_eq!(csv.trim_end(), HEADER);
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("exports").join("agra.csv");

        save_district_csv(&sample_district(), &path).expect("save");

        let written = std::fs::read_to_string(&path).expect("read back");
        assert!(written.starts_with(HEADER));
        assert!(written.contains("2023,130000,60,46,250"));
    }
}
