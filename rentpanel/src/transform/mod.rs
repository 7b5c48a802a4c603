//! Transformation module.
//!
//! - Reshape: column planning and wide-to-long melt
//! - Fill: per-zipcode forward-fill
//! - Panel: the full transform with cutoff, drop and allow-list stages
//! - Pipeline: file-level entry points with progress logging

pub mod fill;
pub mod panel;
pub mod pipeline;
pub mod reshape;

pub use fill::{fill_by_zipcode, forward_fill};
pub use panel::*;
pub use pipeline::*;
pub use reshape::{melt, pad_zipcode, parse_month_header, plan_columns, ColumnPlan};
