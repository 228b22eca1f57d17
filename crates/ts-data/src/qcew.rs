//! QCEW extract layout: header validation and row parsing.
//!
//! Column names follow the BLS "single file" CSV layout. Only the columns
//! below are read; everything else in the extract is ignored.

use csv::StringRecord;
use ts_core::Quarter;

/// Columns every industry extract must carry.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "year",
    "qtr",
    "month1_emplvl",
    "month2_emplvl",
    "month3_emplvl",
    "total_qtrly_wages",
    "avg_wkly_wage",
];

/// Columns read when present.
pub const OPTIONAL_COLUMNS: &[&str] = &["qtrly_estabs", "area_fips", "own_code"];

/// Cell values treated as missing (empty, `NA`, QCEW suppression markers).
const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "N", "-", "."];

/// Positions of the columns we read, resolved once from the header.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    year: usize,
    qtr: usize,
    months: [usize; 3],
    total_qtrly_wages: usize,
    avg_wkly_wage: usize,
    qtrly_estabs: Option<usize>,
    area_fips: Option<usize>,
    own_code: Option<usize>,
}

impl ColumnIndex {
    /// Resolve column positions; on failure returns the missing required columns.
    pub fn from_headers(headers: &StringRecord) -> std::result::Result<Self, Vec<&'static str>> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<&'static str> =
            REQUIRED_COLUMNS.iter().copied().filter(|c| find(c).is_none()).collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        let req = |name: &str| find(name).unwrap_or_default();
        Ok(Self {
            year: req("year"),
            qtr: req("qtr"),
            months: [req("month1_emplvl"), req("month2_emplvl"), req("month3_emplvl")],
            total_qtrly_wages: req("total_qtrly_wages"),
            avg_wkly_wage: req("avg_wkly_wage"),
            qtrly_estabs: find("qtrly_estabs"),
            area_fips: find("area_fips"),
            own_code: find("own_code"),
        })
    }
}

/// One parsed extract row, before industry labels are attached.
#[derive(Debug, Clone, PartialEq)]
pub struct QcewRow {
    /// Reference quarter.
    pub quarter: Quarter,
    /// Mean monthly employment, per establishment when `qtrly_estabs` > 0.
    pub avg_monthly_employment: Option<f64>,
    /// Total quarterly wages.
    pub total_qtrly_wages: Option<f64>,
    /// Average weekly wage.
    pub avg_wkly_wage: Option<f64>,
    /// Area code.
    pub area_fips: Option<String>,
    /// Ownership code.
    pub own_code: Option<String>,
}

/// Parse one record. `Ok(None)` for annual-average rows (`qtr == "A"`).
///
/// Errors are human-readable reasons naming the offending column; the caller
/// adds the industry, path and row.
pub fn parse_row(record: &StringRecord, cols: &ColumnIndex) -> std::result::Result<Option<QcewRow>, String> {
    let cell = |i: usize| record.get(i).map(str::trim).unwrap_or("");

    let qtr_raw = cell(cols.qtr);
    if qtr_raw.eq_ignore_ascii_case("a") {
        return Ok(None);
    }
    let year: i32 = cell(cols.year)
        .parse()
        .map_err(|_| format!("column `year`: expected an integer, got `{}`", cell(cols.year)))?;
    let qtr: u8 =
        qtr_raw.parse().map_err(|_| format!("column `qtr`: expected 1-4, got `{qtr_raw}`"))?;
    let quarter = Quarter::new(year, qtr).map_err(|e| format!("column `qtr`: {e}"))?;

    let mut months = Vec::with_capacity(3);
    for (k, &i) in cols.months.iter().enumerate() {
        if let Some(v) = parse_number(cell(i), REQUIRED_COLUMNS[2 + k])? {
            months.push(v);
        }
    }
    let mean_monthly =
        if months.is_empty() { None } else { Some(months.iter().sum::<f64>() / months.len() as f64) };

    let estabs = match cols.qtrly_estabs {
        Some(i) => parse_number(cell(i), "qtrly_estabs")?,
        None => None,
    };
    let avg_monthly_employment = match (mean_monthly, estabs) {
        (Some(m), Some(e)) if e > 0.0 => Some(m / e),
        (m, _) => m,
    };

    let text = |i: Option<usize>| {
        i.map(cell).filter(|s| !MISSING_MARKERS.contains(s)).map(str::to_string)
    };

    Ok(Some(QcewRow {
        quarter,
        avg_monthly_employment,
        total_qtrly_wages: parse_number(cell(cols.total_qtrly_wages), "total_qtrly_wages")?,
        avg_wkly_wage: parse_number(cell(cols.avg_wkly_wage), "avg_wkly_wage")?,
        area_fips: text(cols.area_fips),
        own_code: text(cols.own_code),
    }))
}

fn parse_number(raw: &str, column: &str) -> std::result::Result<Option<f64>, String> {
    if MISSING_MARKERS.contains(&raw) {
        return Ok(None);
    }
    let v: f64 =
        raw.parse().map_err(|_| format!("column `{column}`: expected a number, got `{raw}`"))?;
    Ok(v.is_finite().then_some(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> StringRecord {
        StringRecord::from(vec![
            "area_fips",
            "own_code",
            "year",
            "qtr",
            "qtrly_estabs",
            "month1_emplvl",
            "month2_emplvl",
            "month3_emplvl",
            "total_qtrly_wages",
            "avg_wkly_wage",
        ])
    }

    #[test]
    fn missing_required_columns_reported() {
        let h = StringRecord::from(vec!["year", "qtr", "month1_emplvl", "avg_wkly_wage"]);
        let missing = ColumnIndex::from_headers(&h).unwrap_err();
        assert_eq!(
            missing,
            vec!["month2_emplvl", "month3_emplvl", "total_qtrly_wages"]
        );
    }

    #[test]
    fn per_establishment_employment() {
        let cols = ColumnIndex::from_headers(&header()).unwrap();
        let rec = StringRecord::from(vec![
            "US000", "5", "2019", "2", "10", "90", "100", "110", "5000000", "1200",
        ]);
        let row = parse_row(&rec, &cols).unwrap().unwrap();
        assert_eq!(row.quarter.to_string(), "2019Q2");
        assert!((row.avg_monthly_employment.unwrap() - 10.0).abs() < 1e-12);
        assert_eq!(row.total_qtrly_wages, Some(5_000_000.0));
        assert_eq!(row.area_fips.as_deref(), Some("US000"));
    }

    #[test]
    fn suppressed_cells_are_missing() {
        let cols = ColumnIndex::from_headers(&header()).unwrap();
        let rec = StringRecord::from(vec!["US000", "5", "2019", "3", "", "N", "N", "N", "", "1100"]);
        let row = parse_row(&rec, &cols).unwrap().unwrap();
        assert_eq!(row.avg_monthly_employment, None);
        assert_eq!(row.total_qtrly_wages, None);
        assert_eq!(row.avg_wkly_wage, Some(1100.0));
    }

    #[test]
    fn zero_establishments_fall_back_to_mean_level() {
        let cols = ColumnIndex::from_headers(&header()).unwrap();
        let rec = StringRecord::from(vec!["US000", "5", "2019", "1", "0", "30", "", "60", "1", "1"]);
        let row = parse_row(&rec, &cols).unwrap().unwrap();
        assert!((row.avg_monthly_employment.unwrap() - 45.0).abs() < 1e-12);
    }

    #[test]
    fn annual_rows_skipped_and_bad_cells_rejected() {
        let cols = ColumnIndex::from_headers(&header()).unwrap();
        let annual = StringRecord::from(vec!["US000", "5", "2019", "A", "1", "1", "1", "1", "1", "1"]);
        assert!(parse_row(&annual, &cols).unwrap().is_none());

        let bad = StringRecord::from(vec!["US000", "5", "2019", "2", "1", "abc", "1", "1", "1", "1"]);
        let err = parse_row(&bad, &cols).unwrap_err();
        assert!(err.contains("month1_emplvl"), "{err}");

        let bad_q = StringRecord::from(vec!["US000", "5", "2019", "7", "1", "1", "1", "1", "1", "1"]);
        assert!(parse_row(&bad_q, &cols).unwrap_err().contains("qtr"));
    }
}
