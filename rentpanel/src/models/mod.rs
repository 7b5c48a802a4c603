//! Domain models for the rent panel pipeline.
//!
//! - [`WideTable`] - Parsed input, one row per geography, one column per month
//! - [`LongPanel`] - Tidy output, one row per (geography, month)
//! - [`PanelRow`] - A single observation in the long panel

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Canonical name of the zero-padded region column.
pub const ZIPCODE_COLUMN: &str = "Zipcode";
/// Canonical name of the county column (metro layout).
pub const COUNTY_COLUMN: &str = "County";
/// State column, used together with [`COUNTY_COLUMN`] for the allow-list key.
pub const STATE_COLUMN: &str = "State";
/// Column holding the combined `"<State>-<County>"` key.
pub const STATE_COUNTY_COLUMN: &str = "State-County";
pub const DATE_COLUMN: &str = "Date";
pub const RENT_COLUMN: &str = "Rent";
pub const YEAR_COLUMN: &str = "Year";

// =============================================================================
// Wide input
// =============================================================================

/// A delimited table held entirely as text.
///
/// Cells are never type-inferred at this stage so that identifiers such as
/// zipcodes keep their leading zeros.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WideTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl WideTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

// =============================================================================
// Long output
// =============================================================================

/// One (geography, month) observation.
///
/// `ids` is aligned with [`LongPanel::id_columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    pub ids: Vec<String>,
    pub date: NaiveDate,
    pub rent: Option<f64>,
    pub year: i32,
    pub state_county: Option<String>,
}

impl PanelRow {
    pub fn new(ids: Vec<String>, date: NaiveDate, rent: Option<f64>) -> Self {
        Self {
            ids,
            date,
            rent,
            year: date.year(),
            state_county: None,
        }
    }
}

/// Tidy long-format rent panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LongPanel {
    /// Identifier columns in input order, renamed, without the region id.
    pub id_columns: Vec<String>,
    pub rows: Vec<PanelRow>,
    /// Whether rows carry a `State-County` value.
    pub has_state_county: bool,
}

impl LongPanel {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn id_index(&self, column: &str) -> Option<usize> {
        self.id_columns.iter().position(|c| c == column)
    }

    /// Identifier value of `row` for `column`.
    pub fn value<'a>(&self, row: &'a PanelRow, column: &str) -> Option<&'a str> {
        self.id_index(column)
            .and_then(|i| row.ids.get(i))
            .map(String::as_str)
    }

    pub fn zipcode<'a>(&self, row: &'a PanelRow) -> Option<&'a str> {
        self.value(row, ZIPCODE_COLUMN)
    }

    /// Output header: identifiers, then `Date`, `Rent`, `Year` and
    /// `State-County` when present.
    pub fn headers(&self) -> Vec<String> {
        let mut headers = self.id_columns.clone();
        headers.push(DATE_COLUMN.to_string());
        headers.push(RENT_COLUMN.to_string());
        headers.push(YEAR_COLUMN.to_string());
        if self.has_state_county {
            headers.push(STATE_COUNTY_COLUMN.to_string());
        }
        headers
    }

    /// Flatten a row into text cells matching [`LongPanel::headers`].
    pub fn record(&self, row: &PanelRow) -> Vec<String> {
        let mut record = row.ids.clone();
        record.push(row.date.format("%Y-%m-%d").to_string());
        record.push(row.rent.map(|r| r.to_string()).unwrap_or_default());
        record.push(row.year.to_string());
        if self.has_state_county {
            record.push(row.state_county.clone().unwrap_or_default());
        }
        record
    }

    /// Render a row as a JSON object keyed by column name.
    pub fn to_json(&self, row: &PanelRow) -> Value {
        let mut obj = Map::new();
        for (column, value) in self.id_columns.iter().zip(&row.ids) {
            obj.insert(column.clone(), json!(value));
        }
        obj.insert(DATE_COLUMN.to_string(), json!(row.date));
        obj.insert(RENT_COLUMN.to_string(), json!(row.rent));
        obj.insert(YEAR_COLUMN.to_string(), json!(row.year));
        if self.has_state_county {
            obj.insert(STATE_COUNTY_COLUMN.to_string(), json!(row.state_county));
        }
        Value::Object(obj)
    }

    /// Distinct zipcodes in first-seen order.
    pub fn zipcodes(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.rows
            .iter()
            .filter_map(|r| self.zipcode(r))
            .filter(|z| seen.insert(*z))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn panel() -> LongPanel {
        LongPanel {
            id_columns: vec!["Zipcode".into(), "City".into()],
            rows: vec![
                PanelRow::new(vec!["02134".into(), "Boston".into()], date(2016, 7), Some(1850.0)),
                PanelRow::new(vec!["02134".into(), "Boston".into()], date(2016, 8), None),
                PanelRow::new(vec!["10001".into(), "New York".into()], date(2016, 7), Some(3100.5)),
            ],
            has_state_county: false,
        }
    }

    #[test]
    fn test_year_derived_from_date() {
        let row = PanelRow::new(vec![], date(2016, 7), Some(1.0));
        assert_eq!(row.year, 2016);
    }

    #[test]
    fn test_headers_order() {
        let mut p = panel();
        assert_eq!(p.headers(), vec!["Zipcode", "City", "Date", "Rent", "Year"]);

        p.has_state_county = true;
        assert_eq!(p.headers().last().unwrap(), "State-County");
    }

    #[test]
    fn test_record_null_rent_is_empty_cell() {
        let p = panel();
        let record = p.record(&p.rows[1]);
        assert_eq!(record, vec!["02134", "Boston", "2016-08-01", "", "2016"]);
    }

    #[test]
    fn test_to_json() {
        let p = panel();
        let obj = p.to_json(&p.rows[2]);
        assert_eq!(obj["Zipcode"], "10001");
        assert_eq!(obj["Date"], "2016-07-01");
        assert_eq!(obj["Rent"], 3100.5);
        assert_eq!(obj["Year"], 2016);
        assert!(obj.get("State-County").is_none());
    }

    #[test]
    fn test_zipcodes_distinct_in_order() {
        let p = panel();
        assert_eq!(p.zipcodes(), vec!["02134", "10001"]);
    }
}
