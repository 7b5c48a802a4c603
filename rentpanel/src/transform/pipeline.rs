//! File-level API: read, transform, report.
//!
//! # Example
//!
//! ```rust,ignore
//! use rentpanel::{transform_file, TransformOptions};
//! use std::path::Path;
//!
//! let output = transform_file(Path::new("Zip_ZORI.csv"), &TransformOptions::metro())?;
//! println!("{}", output.report.summary());
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::panel::{default_cutoff, transform_table, PanelLayout, TransformReport};
use super::reshape::plan_columns;
use crate::error::PipelineResult;
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::LongPanel;
use crate::output::OutputFormat;
use crate::parser::{parse_bytes, parse_file, ParseResult};

/// Options for the transformation pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformOptions {
    /// Column layout and optional geography filter
    pub layout: PanelLayout,

    /// First month kept
    #[serde(default = "default_cutoff")]
    pub cutoff: NaiveDate,

    /// Delimiter (auto-detect if `None`)
    #[serde(default)]
    pub delimiter: Option<char>,

    /// Output encoding used by the CLI
    #[serde(default)]
    pub format: OutputFormat,
}

impl TransformOptions {
    /// Four identifier columns, every geography kept.
    pub fn basic() -> Self {
        Self {
            layout: PanelLayout::basic(),
            ..Default::default()
        }
    }

    /// Seven identifier columns, metro county allow-list applied.
    pub fn metro() -> Self {
        Self {
            layout: PanelLayout::metro(),
            ..Default::default()
        }
    }
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            layout: PanelLayout::basic(),
            cutoff: default_cutoff(),
            delimiter: None,
            format: OutputFormat::Csv,
        }
    }
}

/// Input file information
#[derive(Debug, Clone, Serialize)]
pub struct CsvInfo {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub row_count: usize,
}

impl From<&ParseResult> for CsvInfo {
    fn from(parsed: &ParseResult) -> Self {
        Self {
            encoding: parsed.encoding.clone(),
            delimiter: parsed.delimiter,
            headers: parsed.table.headers.clone(),
            row_count: parsed.table.row_count(),
        }
    }
}

/// Result of a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub panel: LongPanel,
    pub report: TransformReport,
    pub csv_info: CsvInfo,
}

/// Transform a wide rent file into the long panel.
pub fn transform_file(path: &Path, options: &TransformOptions) -> PipelineResult<PipelineOutput> {
    log_info(format!("📖 Reading {}", path.display()));
    let parsed = parse_file(path, options.delimiter)?;
    transform_parsed(parsed, options)
}

/// Same as [`transform_file`] but from bytes already in memory.
pub fn transform_bytes(bytes: &[u8], options: &TransformOptions) -> PipelineResult<PipelineOutput> {
    let parsed = parse_bytes(bytes, options.delimiter)?;
    transform_parsed(parsed, options)
}

fn transform_parsed(parsed: ParseResult, options: &TransformOptions) -> PipelineResult<PipelineOutput> {
    let csv_info = CsvInfo::from(&parsed);
    log_success(format!("Detected encoding: {}", csv_info.encoding));
    log_success(format!("Detected separator: '{}'", format_delimiter(csv_info.delimiter)));
    log_success(format!("Read {} geographies", csv_info.row_count));

    log_info(format!(
        "⚙️  Reshaping with {} identifier columns, cutoff {}",
        options.layout.leading_columns, options.cutoff
    ));
    let (panel, report) = transform_table(&parsed.table, &options.layout, options.cutoff)?;
    print_report(&report);

    Ok(PipelineOutput {
        panel,
        report,
        csv_info,
    })
}

fn print_report(report: &TransformReport) {
    log_info_indent(
        format!(
            "Melted {} x {} into {} rows",
            report.geographies, report.date_columns, report.melted_rows
        ),
        1,
    );
    log_info_indent(format!("Forward-filled {} missing rents", report.filled_cells), 1);
    log_info_indent(format!("Removed {} rows before the cutoff", report.before_cutoff_rows), 1);
    if !report.dropped_zipcodes.is_empty() {
        log_warning(format!(
            "Dropped {} zipcodes ({} rows) with unfillable gaps",
            report.dropped_zipcodes.len(),
            report.dropped_rows
        ));
    }
    if report.filtered_rows > 0 {
        log_info_indent(format!("Removed {} rows outside the allow-list", report.filtered_rows), 1);
    }
    log_success(format!("{} panel rows", report.output_rows));
}

/// Header summary of a wide file, without transforming it.
#[derive(Debug, Clone, Serialize)]
pub struct InspectResult {
    pub csv_info: CsvInfo,
    pub id_columns: Vec<String>,
    pub date_columns: usize,
    pub first_month: Option<NaiveDate>,
    pub last_month: Option<NaiveDate>,
}

/// Parse a file and resolve its columns against `layout`.
pub fn inspect_file(
    path: &Path,
    layout: &PanelLayout,
    delimiter: Option<char>,
) -> PipelineResult<InspectResult> {
    let parsed = parse_file(path, delimiter)?;
    let plan = plan_columns(&parsed.table.headers, layout)?;
    let months = plan.date_columns.iter().map(|(_, m)| *m);

    Ok(InspectResult {
        csv_info: CsvInfo::from(&parsed),
        id_columns: plan.id_names(),
        date_columns: plan.date_columns.len(),
        first_month: months.clone().min(),
        last_month: months.max(),
    })
}

/// Format delimiter for display
pub fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}
