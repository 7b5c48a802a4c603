//! Wide-to-long reshaping.
//!
//! Splits the header into identifier and date columns, then unpivots every
//! (geography, date column) cell into one [`PanelRow`].

use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;

use super::panel::PanelLayout;
use crate::error::{TransformError, TransformResult};
use crate::models::{LongPanel, PanelRow, WideTable, ZIPCODE_COLUMN};

/// Width of a US zipcode.
pub const ZIPCODE_WIDTH: usize = 5;

/// Cell values read as a missing rent.
const NA_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "null", "NULL", "#N/A", "<NA>",
];

/// Left-pad a region name with `'0'` to [`ZIPCODE_WIDTH`]. Longer values are kept as is.
pub fn pad_zipcode(raw: &str) -> String {
    format!("{:0>width$}", raw.trim(), width = ZIPCODE_WIDTH)
}

/// Parse a date column header into the first day of its month.
///
/// Accepts `YYYY-MM`, `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYY/MM`, `MM/DD/YYYY` and a
/// bare `YYYY` (read as January).
pub fn parse_month_header(header: &str) -> TransformResult<NaiveDate> {
    let s = header.trim();
    let parsed = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}/01", s), "%Y/%m/%d"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01-01", s), "%Y-%m-%d"))
        .map_err(|e| TransformError::DateParse {
            column: header.to_string(),
            message: e.to_string(),
        })?;

    if !(1000..=9999).contains(&parsed.year()) {
        return Err(TransformError::DateParse {
            column: header.to_string(),
            message: format!("year {} is not a four-digit year", parsed.year()),
        });
    }

    Ok(parsed.with_day(1).unwrap_or(parsed))
}

/// Parse a rent cell. Missing-value tokens become `None`.
pub fn parse_rent(cell: &str) -> Option<Result<f64, std::num::ParseFloatError>> {
    let cell = cell.trim();
    if NA_TOKENS.contains(&cell) {
        return None;
    }
    match cell.parse::<f64>() {
        Ok(v) if v.is_nan() => None,
        other => Some(other),
    }
}

/// Where each output column comes from in the wide table.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPlan {
    /// (source index, output name) for every kept identifier column.
    pub id_columns: Vec<(usize, String)>,
    /// Position of `Zipcode` within `id_columns`.
    pub zipcode: usize,
    /// (source index, month) for every date column.
    pub date_columns: Vec<(usize, NaiveDate)>,
}

impl ColumnPlan {
    pub fn id_names(&self) -> Vec<String> {
        self.id_columns.iter().map(|(_, name)| name.clone()).collect()
    }

    pub fn id_index(&self, name: &str) -> Option<usize> {
        self.id_columns.iter().position(|(_, n)| n == name)
    }
}

/// Resolve renames, the dropped region id and the date columns against a header.
pub fn plan_columns(headers: &[String], layout: &PanelLayout) -> TransformResult<ColumnPlan> {
    let leading = layout.leading_columns;
    if headers.len() <= leading {
        return Err(TransformError::schema(format!(
            "expected more than {} columns ({} identifier columns plus at least one date column), found {}",
            leading,
            leading,
            headers.len()
        )));
    }

    let mut names: Vec<String> = headers[..leading].to_vec();
    for (from, to) in &layout.renames {
        let pos = names.iter().position(|n| n == from).ok_or_else(|| {
            TransformError::schema(format!(
                "cannot rename '{}' to '{}': not among the first {} columns",
                from, to, leading
            ))
        })?;
        names[pos] = to.clone();
    }

    let region_id = names
        .iter()
        .position(|n| n == &layout.region_id_column)
        .ok_or_else(|| {
            TransformError::schema(format!(
                "region id column '{}' not among the first {} columns",
                layout.region_id_column, leading
            ))
        })?;

    let id_columns: Vec<(usize, String)> = names
        .into_iter()
        .enumerate()
        .filter(|(i, _)| *i != region_id)
        .collect();

    let zipcode = id_columns
        .iter()
        .position(|(_, n)| n == ZIPCODE_COLUMN)
        .ok_or_else(|| TransformError::schema(format!("no '{}' column", ZIPCODE_COLUMN)))?;

    let mut seen = HashSet::new();
    let mut date_columns = Vec::with_capacity(headers.len() - leading);
    for (i, header) in headers.iter().enumerate().skip(leading) {
        let month = parse_month_header(header)?;
        if !seen.insert(month) {
            return Err(TransformError::schema(format!(
                "date column '{}' repeats month {}",
                header,
                month.format("%Y-%m")
            )));
        }
        date_columns.push((i, month));
    }

    Ok(ColumnPlan {
        id_columns,
        zipcode,
        date_columns,
    })
}

/// Unpivot the wide table. Produces exactly `rows × date columns` rows,
/// ordered by date column first, then by input row.
pub fn melt(table: &WideTable, plan: &ColumnPlan) -> TransformResult<LongPanel> {
    let mut ids: Vec<Vec<String>> = Vec::with_capacity(table.rows.len());
    for (row_idx, row) in table.rows.iter().enumerate() {
        let mut values = Vec::with_capacity(plan.id_columns.len());
        for (pos, (src, name)) in plan.id_columns.iter().enumerate() {
            let cell = row[*src].as_str();
            if pos == plan.zipcode {
                if cell.trim().is_empty() {
                    return Err(TransformError::malformed(format!(
                        "row {}: empty region name in column '{}'",
                        row_idx + 1,
                        name
                    )));
                }
                values.push(pad_zipcode(cell));
            } else {
                values.push(cell.to_string());
            }
        }
        ids.push(values);
    }

    let mut rows = Vec::with_capacity(table.rows.len() * plan.date_columns.len());
    for (src, month) in &plan.date_columns {
        for (row_idx, row) in table.rows.iter().enumerate() {
            let rent = match parse_rent(&row[*src]) {
                None => None,
                Some(Ok(v)) => Some(v),
                Some(Err(e)) => {
                    return Err(TransformError::malformed(format!(
                        "row {}, column '{}': rent '{}' is not numeric ({})",
                        row_idx + 1,
                        table.headers[*src],
                        row[*src],
                        e
                    )))
                }
            };
            rows.push(PanelRow::new(ids[row_idx].clone(), *month, rent));
        }
    }

    Ok(LongPanel {
        id_columns: plan.id_names(),
        rows,
        has_state_county: false,
    })
}
