//! # Rentpanel - wide rent panels to tidy long panels
//!
//! Rentpanel reads rent files laid out one row per zipcode and one column per
//! month, and produces a long panel keyed by (date, location) that can be
//! merged with other time series.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Wide File  │────▶│   Parser    │────▶│  Transform  │────▶│ Long Panel  │
//! │ (CSV/TSV..) │     │  (auto-enc) │     │ (melt+fill) │     │ (CSV/JSON)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rentpanel::{transform_file, TransformOptions};
//! use std::path::Path;
//!
//! let output = transform_file(Path::new("Zip_ZORI.csv"), &TransformOptions::basic()).unwrap();
//! println!("{} rows", output.panel.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Wide table and long panel
//! - [`parser`] - Delimited file reading with auto-detection
//! - [`transform`] - Melt, forward-fill, cutoff, drop and filter
//! - [`geography`] - Metro county allow-list
//! - [`output`] - CSV and JSON writers
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod geography;
pub mod transform;

// Output
pub mod logs;
pub mod output;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{CsvError, PipelineError, TransformError};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{LongPanel, PanelRow, WideTable};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes, parse_file, parse_file_auto,
    parse_wide, ParseResult,
};

// =============================================================================
// Re-exports - Transform
// =============================================================================

pub use transform::{
    default_cutoff, fill_by_zipcode, forward_fill, pad_zipcode, transform_table, PanelLayout,
    TransformReport,
};

pub use transform::pipeline::{
    inspect_file, transform_bytes, transform_file, CsvInfo, InspectResult, PipelineOutput,
    TransformOptions,
};

// =============================================================================
// Re-exports - Geography
// =============================================================================

pub use geography::{is_allowed, MetroArea, ALLOWED_GEOGRAPHIES, METRO_AREAS};

// =============================================================================
// Re-exports - Output
// =============================================================================

pub use output::{write_csv, write_json, write_panel, OutputFormat};
