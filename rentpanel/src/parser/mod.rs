//! Delimited file reader with encoding and delimiter auto-detection.
//!
//! Produces a [`WideTable`] of text cells. No rent-specific logic here.

use std::path::Path;

use crate::error::{CsvError, CsvResult};
use crate::models::WideTable;

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed table
    pub table: WideTable,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
}

/// Detect the encoding of raw bytes using chardet
///
/// A UTF-16 byte order mark wins over chardet's guess.
pub fn detect_encoding(bytes: &[u8]) -> String {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return "utf-16le".to_string();
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return "utf-16be".to_string();
    }

    let result = chardet::detect(bytes);
    let charset = result.0;

    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" | "" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        "utf-16le" | "utf-16" => "utf-16le".to_string(),
        "utf-16be" => "utf-16be".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => String::from_utf8(bytes.to_vec())
            .map_err(|e| CsvError::EncodingError(e.to_string())),
        "iso-8859-1" | "latin-1" | "latin1" => {
            Ok(encoding_rs::ISO_8859_15.decode(bytes).0.into_owned())
        }
        "windows-1252" | "cp1252" => Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.into_owned()),
        "utf-16le" | "utf-16" => decode_utf16(encoding_rs::UTF_16LE, bytes),
        "utf-16be" => decode_utf16(encoding_rs::UTF_16BE, bytes),
        // Unknown charset: fall back to lossy UTF-8
        _ => Ok(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn decode_utf16(encoding: &'static encoding_rs::Encoding, bytes: &[u8]) -> CsvResult<String> {
    // `decode` sniffs and strips the BOM
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(CsvError::EncodingError(format!(
            "invalid {} byte sequence",
            encoding.name()
        )));
    }
    Ok(text.into_owned())
}

/// Detect the delimiter by counting occurrences in the header line.
///
/// Rent panels are usually comma separated, so a tie goes to `,`.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse delimited text into a [`WideTable`].
///
/// Every row must have as many fields as the header. Blank lines are skipped.
pub fn parse_wide(content: &str, delimiter: char) -> CsvResult<WideTable> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }
    let delimiter = u8::try_from(delimiter).map_err(|_| CsvError::ParseError {
        line: 0,
        message: format!("delimiter '{}' is not a single-byte character", delimiter),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(WideTable::new(headers, rows))
}

/// Parse a file with auto-detection of encoding and delimiter.
pub fn parse_file_auto<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes, None)
}

/// Parse a file, auto-detecting only what `delimiter` leaves open.
pub fn parse_file<P: AsRef<Path>>(path: P, delimiter: Option<char>) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes(&bytes, delimiter)
}

/// Parse raw bytes, detecting the encoding and (unless given) the delimiter.
pub fn parse_bytes(bytes: &[u8], delimiter: Option<char>) -> CsvResult<ParseResult> {
    if bytes.is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));
    let table = parse_wide(&content, delimiter)?;

    Ok(ParseResult {
        table,
        encoding,
        delimiter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_simple_table() {
        let csv = "RegionID,RegionName,2015-01\n1,02134,1800\n2,10001,";
        let table = parse_wide(csv, ',').unwrap();

        assert_eq!(table.headers, vec!["RegionID", "RegionName", "2015-01"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][1], "02134");
        assert_eq!(table.rows[1][2], "");
    }

    #[test]
    fn test_quoted_values() {
        let csv = "RegionName,Metro\n\"02134\",\"Boston, MA\"";
        let table = parse_wide(csv, ',').unwrap();

        assert_eq!(table.rows[0][0], "02134");
        assert_eq!(table.rows[0][1], "Boston, MA");
    }

    #[test]
    fn test_empty_lines_skipped() {
        let csv = "a,b\n1,2\n\n3,4\n";
        let table = parse_wide(csv, ',').unwrap();

        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let csv = "a,b,c\n1,2\n";
        let err = parse_wide(csv, ',').unwrap_err();
        assert!(matches!(err, CsvError::ParseError { .. }));
    }

    #[test]
    fn test_empty_csv_error() {
        assert!(matches!(parse_wide("", ','), Err(CsvError::EmptyFile)));
        assert!(matches!(parse_bytes(b"", None), Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
        assert_eq!(detect_delimiter("a|b|c\n1|2|3"), '|');
        assert_eq!(detect_delimiter("single"), ',');
    }

    #[test]
    fn test_bom_stripped() {
        let bytes = b"\xEF\xBB\xBFRegionID,RegionName\n1,02134\n";
        let result = parse_bytes(bytes, None).unwrap();
        assert_eq!(result.table.headers[0], "RegionID");
    }

    #[test]
    fn test_latin1_decoding() {
        // "Société" in ISO-8859-1
        let bytes: &[u8] = &[0x53, 0x6F, 0x63, 0x69, 0xE9, 0x74, 0xE9];
        let decoded = decode_content(bytes, "iso-8859-1").unwrap();
        assert!(decoded.contains("Soci"));
    }

    #[test]
    fn test_utf16le_export() {
        let text = "RegionID,RegionName,2015-01\n1,501,1200\n";
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }

        let result = parse_bytes(&bytes, None).unwrap();
        assert_eq!(result.encoding, "utf-16le");
        assert_eq!(result.delimiter, ',');
        assert_eq!(result.table.headers, vec!["RegionID", "RegionName", "2015-01"]);
        assert_eq!(result.table.rows[0], vec!["1", "501", "1200"]);
    }

    #[test]
    fn test_utf16be_decoding() {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in "a,b".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(detect_encoding(&bytes), "utf-16be");
        assert_eq!(decode_content(&bytes, "utf-16be").unwrap(), "a,b");
    }

    #[test]
    fn test_parse_file_with_explicit_delimiter() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "RegionID;RegionName;2015-01\n7;501;1200\n").unwrap();

        let result = parse_file(file.path(), Some(';')).unwrap();
        assert_eq!(result.delimiter, ';');
        assert_eq!(result.table.rows[0], vec!["7", "501", "1200"]);
    }

    #[test]
    fn test_missing_file() {
        let err = parse_file_auto("/nonexistent/panel.csv").unwrap_err();
        assert!(matches!(err, CsvError::IoError(_)));
    }
}
