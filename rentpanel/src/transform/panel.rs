//! The rent panel transform.
//!
//! ```text
//! WideTable ──▶ plan columns ──▶ melt ──▶ forward-fill ──▶ cutoff
//!                                                           │
//!        LongPanel ◀── allow-list (metro) ◀── drop incomplete zipcodes
//! ```
//!
//! The transform is pure: it neither logs nor touches the filesystem. A
//! [`TransformReport`] describes what each stage did.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use super::fill::fill_by_zipcode;
use super::reshape::{melt, plan_columns};
use crate::error::{TransformError, TransformResult};
use crate::geography::{geography_key, ALLOWED_GEOGRAPHIES};
use crate::models::{LongPanel, WideTable, COUNTY_COLUMN, STATE_COLUMN, ZIPCODE_COLUMN};

/// Identifier columns of the basic layout.
pub const BASIC_LEADING_COLUMNS: usize = 4;
/// Identifier columns of the metro layout.
pub const METRO_LEADING_COLUMNS: usize = 7;

/// First month kept in the output.
pub fn default_cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(2015, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// How to read a wide rent file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelLayout {
    /// Columns before the first date column.
    pub leading_columns: usize,

    /// Provenance column, dropped from the output.
    #[serde(default = "default_region_id_column")]
    pub region_id_column: String,

    /// (source name, canonical name) pairs applied to identifier columns.
    #[serde(default = "default_renames")]
    pub renames: Vec<(String, String)>,

    /// `"<State>-<County>"` keys to keep. `None` keeps every geography.
    #[serde(default)]
    pub allowed_geographies: Option<HashSet<String>>,
}

fn default_region_id_column() -> String {
    "RegionID".to_string()
}

fn default_renames() -> Vec<(String, String)> {
    vec![("RegionName".to_string(), ZIPCODE_COLUMN.to_string())]
}

impl PanelLayout {
    /// Four identifier columns, no geography filter.
    pub fn basic() -> Self {
        Self {
            leading_columns: BASIC_LEADING_COLUMNS,
            region_id_column: default_region_id_column(),
            renames: default_renames(),
            allowed_geographies: None,
        }
    }

    /// Seven identifier columns, filtered to the metro county allow-list.
    pub fn metro() -> Self {
        Self {
            leading_columns: METRO_LEADING_COLUMNS,
            region_id_column: default_region_id_column(),
            renames: vec![
                ("RegionName".to_string(), ZIPCODE_COLUMN.to_string()),
                ("CountyName".to_string(), COUNTY_COLUMN.to_string()),
            ],
            allowed_geographies: Some(ALLOWED_GEOGRAPHIES.clone()),
        }
    }

    pub fn with_leading_columns(mut self, leading_columns: usize) -> Self {
        self.leading_columns = leading_columns;
        self
    }

    pub fn with_allowed_geographies(mut self, allowed: Option<HashSet<String>>) -> Self {
        self.allowed_geographies = allowed;
        self
    }
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self::basic()
    }
}

/// What a transform run did, stage by stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransformReport {
    /// Geography rows in the wide input
    pub geographies: usize,
    /// Date columns in the wide input
    pub date_columns: usize,
    /// Rows after melting (`geographies × date_columns`)
    pub melted_rows: usize,
    /// Rents filled from an earlier month
    pub filled_cells: usize,
    /// Rows removed by the cutoff
    pub before_cutoff_rows: usize,
    /// Zipcodes removed for having an unfillable gap after the cutoff
    pub dropped_zipcodes: Vec<String>,
    /// Rows removed together with those zipcodes
    pub dropped_rows: usize,
    /// Rows outside the geography allow-list
    pub filtered_rows: usize,
    /// Rows in the final panel
    pub output_rows: usize,
}

impl TransformReport {
    pub fn summary(&self) -> String {
        format!(
            "{} geographies x {} months -> {} rows ({} filled, {} zipcodes dropped, {} outside allow-list)",
            self.geographies,
            self.date_columns,
            self.output_rows,
            self.filled_cells,
            self.dropped_zipcodes.len(),
            self.filtered_rows
        )
    }
}

/// Reshape a wide table into the tidy long panel.
///
/// Fails on structural problems only; missing rents are forward-filled or
/// cause their zipcode to be dropped.
pub fn transform_table(
    table: &WideTable,
    layout: &PanelLayout,
    cutoff: NaiveDate,
) -> TransformResult<(LongPanel, TransformReport)> {
    let plan = plan_columns(&table.headers, layout)?;

    for (i, row) in table.rows.iter().enumerate() {
        if row.len() != table.headers.len() {
            return Err(TransformError::malformed(format!(
                "row {} has {} fields, header has {}",
                i + 1,
                row.len(),
                table.headers.len()
            )));
        }
    }

    if layout.allowed_geographies.is_some() {
        for column in [STATE_COLUMN, COUNTY_COLUMN] {
            if plan.id_index(column).is_none() {
                return Err(TransformError::schema(format!(
                    "geography filter needs a '{}' identifier column",
                    column
                )));
            }
        }
    }

    let mut panel = melt(table, &plan)?;
    ensure_unique_zipcodes(&panel, table.rows.len())?;

    let mut report = TransformReport {
        geographies: table.rows.len(),
        date_columns: plan.date_columns.len(),
        melted_rows: panel.len(),
        ..Default::default()
    };

    report.filled_cells = fill_by_zipcode(&mut panel);
    report.before_cutoff_rows = apply_cutoff(&mut panel, cutoff);

    let (dropped, dropped_rows) = drop_incomplete_zipcodes(&mut panel);
    report.dropped_zipcodes = dropped;
    report.dropped_rows = dropped_rows;

    if let Some(allowed) = &layout.allowed_geographies {
        report.filtered_rows = filter_geographies(&mut panel, allowed)?;
    }

    report.output_rows = panel.len();
    Ok((panel, report))
}

/// Each zipcode must identify exactly one geography row.
fn ensure_unique_zipcodes(panel: &LongPanel, geographies: usize) -> TransformResult<()> {
    // the first `geographies` rows are the first date column, one per input row
    let mut seen = HashSet::new();
    for row in panel.rows.iter().take(geographies) {
        if let Some(zip) = panel.zipcode(row) {
            if !seen.insert(zip) {
                return Err(TransformError::schema(format!(
                    "zipcode {} appears on more than one row",
                    zip
                )));
            }
        }
    }
    Ok(())
}

/// Keep rows dated on or after `cutoff`. Returns the number removed.
pub fn apply_cutoff(panel: &mut LongPanel, cutoff: NaiveDate) -> usize {
    let before = panel.len();
    panel.rows.retain(|row| row.date >= cutoff);
    before - panel.len()
}

/// Remove every row of each zipcode that still has a null rent.
///
/// Returns the dropped zipcodes (sorted) and the number of rows removed.
pub fn drop_incomplete_zipcodes(panel: &mut LongPanel) -> (Vec<String>, usize) {
    let Some(zip_idx) = panel.id_index(ZIPCODE_COLUMN) else {
        return (Vec::new(), 0);
    };

    let bad: BTreeSet<String> = panel
        .rows
        .iter()
        .filter(|row| row.rent.is_none())
        .map(|row| row.ids[zip_idx].clone())
        .collect();

    let before = panel.len();
    panel.rows.retain(|row| !bad.contains(&row.ids[zip_idx]));
    (bad.into_iter().collect(), before - panel.len())
}

/// Set `State-County` on every row and keep only allow-listed keys.
///
/// Returns the number of rows removed.
pub fn filter_geographies(
    panel: &mut LongPanel,
    allowed: &HashSet<String>,
) -> TransformResult<usize> {
    let (state_idx, county_idx) = match (panel.id_index(STATE_COLUMN), panel.id_index(COUNTY_COLUMN)) {
        (Some(s), Some(c)) => (s, c),
        _ => {
            return Err(TransformError::schema(format!(
                "geography filter needs '{}' and '{}' columns",
                STATE_COLUMN, COUNTY_COLUMN
            )))
        }
    };

    for row in panel.rows.iter_mut() {
        row.state_county = Some(geography_key(&row.ids[state_idx], &row.ids[county_idx]));
    }
    panel.has_state_county = true;

    let before = panel.len();
    panel.rows.retain(|row| {
        row.state_county
            .as_ref()
            .is_some_and(|key| allowed.contains(key))
    });
    Ok(before - panel.len())
}
