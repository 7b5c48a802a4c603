//! Serialization of a [`LongPanel`] to CSV or JSON.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::PipelineResult;
use crate::models::LongPanel;

/// Output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

/// Write the panel as CSV with a header row. A null rent is an empty cell.
pub fn write_csv<W: Write>(panel: &LongPanel, writer: W) -> PipelineResult<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(panel.headers())?;
    for row in &panel.rows {
        out.write_record(panel.record(row))?;
    }
    out.flush()?;
    Ok(())
}

/// Write the panel as a pretty-printed JSON array of objects.
pub fn write_json<W: Write>(panel: &LongPanel, writer: W) -> PipelineResult<()> {
    let rows: Vec<serde_json::Value> = panel.rows.iter().map(|r| panel.to_json(r)).collect();
    serde_json::to_writer_pretty(writer, &rows)?;
    Ok(())
}

/// Write the panel to `path`, or to stdout when `path` is `None`.
pub fn write_panel(panel: &LongPanel, format: OutputFormat, path: Option<&Path>) -> PipelineResult<()> {
    match path {
        Some(p) => {
            let mut writer = BufWriter::new(File::create(p)?);
            write_format(panel, format, &mut writer)?;
            writer.flush()?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            write_format(panel, format, &mut lock)?;
            if format == OutputFormat::Json {
                writeln!(lock)?;
            }
        }
    }
    Ok(())
}

fn write_format<W: Write>(panel: &LongPanel, format: OutputFormat, writer: W) -> PipelineResult<()> {
    match format {
        OutputFormat::Csv => write_csv(panel, writer),
        OutputFormat::Json => write_json(panel, writer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PanelRow;
    use chrono::NaiveDate;

    fn panel() -> LongPanel {
        let date = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
        let mut row = PanelRow::new(
            vec!["94501".into(), "CA".into(), "Alameda County".into()],
            date,
            Some(2500.0),
        );
        row.state_county = Some("CA-Alameda County".into());
        LongPanel {
            id_columns: vec!["Zipcode".into(), "State".into(), "County".into()],
            rows: vec![row],
            has_state_county: true,
        }
    }

    #[test]
    fn test_write_csv() {
        let mut buf = Vec::new();
        write_csv(&panel(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Zipcode,State,County,Date,Rent,Year,State-County"));
        assert_eq!(lines.next(), Some("94501,CA,Alameda County,2015-01-01,2500,2015,CA-Alameda County"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_write_json() {
        let mut buf = Vec::new();
        write_json(&panel(), &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(value[0]["Zipcode"], "94501");
        assert_eq!(value[0]["State-County"], "CA-Alameda County");
    }

    #[test]
    fn test_write_panel_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.csv");

        write_panel(&panel(), OutputFormat::Csv, Some(&path)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Zipcode,"));
    }
}
