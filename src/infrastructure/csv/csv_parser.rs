// ============================================================
// CSV PARSER
// ============================================================
// Turn delimited text into a lazy, restartable sequence of raw rows

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

use crate::domain::csv::{RawRow, RowSource};
use crate::domain::error::{AppError, Result};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// CSV parser producing [`DelimitedRows`]
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parse the header row and keep the body for lazy iteration.
    ///
    /// Fails only when the text is empty or looks like an HTML page.
    pub fn parse_content(&self, content: &str) -> Result<DelimitedRows> {
        let content = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(content);
        let leading = content.trim_start();

        if leading.is_empty() {
            return Err(AppError::ParseError("source is empty".to_string()));
        }
        if leading.starts_with('<') {
            return Err(AppError::ParseError(
                "source looks like an HTML page, not tabular data".to_string(),
            ));
        }

        let content = tighten_quoted_fields(content, char::from(self.delimiter));
        let headers = reader_for(self.delimiter, content.as_bytes())
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        debug!(columns = headers.len(), "Parsed CSV header row");

        Ok(DelimitedRows {
            delimiter: self.delimiter,
            headers,
            content,
        })
    }
}

fn reader_for(delimiter: u8, bytes: &[u8]) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(Trim::All)
        .flexible(true) // rows may be shorter or longer than the header
        .from_reader(bytes)
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Drop the blanks around a quoted field so the reader still sees it as
/// quoted: `Pune, "Green, Acres"` keeps its inner comma. Unquoted fields are
/// left alone for `Trim::All`.
fn tighten_quoted_fields(content: &str, delimiter: char) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut padding = String::new();
    let mut field_start = true;
    let mut in_quotes = false;

    while let Some(c) = chars.next() {
        if in_quotes {
            out.push(c);
            if c != '"' {
                continue;
            }
            if chars.peek() == Some(&'"') {
                out.push('"');
                chars.next();
                continue;
            }

            in_quotes = false;
            let mut trailing = String::new();
            while let Some(&next) = chars.peek() {
                if !is_blank(next) {
                    break;
                }
                trailing.push(next);
                chars.next();
            }
            match chars.peek() {
                Some(&next) if next != delimiter && next != '\n' && next != '\r' => {
                    out.push_str(&trailing)
                }
                _ => {}
            }
            continue;
        }

        if field_start && is_blank(c) {
            padding.push(c);
            continue;
        }
        if field_start && c == '"' {
            padding.clear();
            in_quotes = true;
            field_start = false;
            out.push(c);
            continue;
        }

        out.push_str(&padding);
        padding.clear();
        out.push(c);
        field_start = c == delimiter || c == '\n' || c == '\r';
    }

    out.push_str(&padding);
    out
}

/// Parsed CSV body; each [`RowSource::rows`] call re-reads it from the top.
#[derive(Debug, Clone)]
pub struct DelimitedRows {
    delimiter: u8,
    headers: Vec<String>,
    content: String,
}

impl DelimitedRows {
    fn to_row(&self, record: &StringRecord) -> Option<RawRow> {
        if record.iter().all(|cell| cell.trim().is_empty()) {
            return None;
        }

        // a repeated header keeps its first column
        let mut row = RawRow::with_capacity(self.headers.len());
        for (idx, header) in self.headers.iter().enumerate() {
            let value = record.get(idx).unwrap_or_default().to_string();
            row.entry(header.clone()).or_insert(value);
        }
        Some(row)
    }
}

impl RowSource for DelimitedRows {
    fn headers(&self) -> &[String] {
        &self.headers
    }

    fn rows(&self) -> Box<dyn Iterator<Item = RawRow> + '_> {
        let reader = reader_for(self.delimiter, self.content.as_bytes());
        Box::new(
            reader
                .into_records()
                .enumerate()
                .filter_map(move |(index, result)| match result {
                    Ok(record) => self.to_row(&record),
                    Err(e) => {
                        warn!(row = index + 1, error = %e, "Skipping unreadable CSV row");
                        None
                    }
                }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let content = "name,age,city\nAlice,30,NYC\nBob,25,LA";
        let parsed = CsvParser::new().parse_content(content).unwrap();
        let rows: Vec<_> = parsed.rows().collect();

        assert_eq!(parsed.headers(), &["name", "age", "city"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["name"], "Alice");
        assert_eq!(rows[1]["city"], "LA");
    }

    #[test]
    fn test_strips_bom_and_handles_crlf() {
        let content = "\u{feff}CITY,TEAM\r\nPune,Alpha\r\n\r\nDelhi,Beta\r\n";
        let parsed = CsvParser::new().parse_content(content).unwrap();
        let rows: Vec<_> = parsed.rows().collect();

        assert_eq!(parsed.headers()[0], "CITY");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["TEAM"], "Beta");
    }

    #[test]
    fn test_quoted_fields_and_doubled_quotes() {
        let content = "Society Name,Bucket of Issues\n\"Green, Acres\",\"Missing \"\"stamp\"\" page\"\n";
        let parsed = CsvParser::new().parse_content(content).unwrap();
        let row = parsed.rows().next().unwrap();

        assert_eq!(row["Society Name"], "Green, Acres");
        assert_eq!(row["Bucket of Issues"], "Missing \"stamp\" page");
    }

    #[test]
    fn test_short_rows_fill_with_empty() {
        let content = "a,b,c\n1\n";
        let parsed = CsvParser::new().parse_content(content).unwrap();
        let row = parsed.rows().next().unwrap();

        assert_eq!(row["a"], "1");
        assert_eq!(row["b"], "");
        assert_eq!(row["c"], "");
    }

    #[test]
    fn test_trims_cells_and_headers() {
        let content = "  CITY , \"TEAM\" \n  Pune  ,  \"Alpha\"\n";
        let parsed = CsvParser::new().parse_content(content).unwrap();
        let row = parsed.rows().next().unwrap();

        assert_eq!(parsed.headers(), &["CITY", "TEAM"]);
        assert_eq!(row["CITY"], "Pune");
        assert_eq!(row["TEAM"], "Alpha");
    }

    #[test]
    fn test_rows_are_restartable() {
        let parsed = CsvParser::new().parse_content("x\n1\n2\n3").unwrap();
        assert_eq!(parsed.rows().count(), 3);
        assert_eq!(parsed.rows().count(), 3);
    }

    #[test]
    fn test_rejects_empty_and_html() {
        assert!(matches!(
            CsvParser::new().parse_content("  \n"),
            Err(AppError::ParseError(_))
        ));
        assert!(matches!(
            CsvParser::new().parse_content("<!DOCTYPE html><html></html>"),
            Err(AppError::ParseError(_))
        ));
    }

    #[test]
    fn test_header_only_is_empty() {
        let parsed = CsvParser::new().parse_content("CITY,TEAM\n").unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_quoted_field_after_padding_keeps_inner_comma() {
        let content = "CITY, Society Name, TEAM\nPune, \"Green, Acres\" , Alpha\n";
        let parsed = CsvParser::new().parse_content(content).unwrap();
        let row = parsed.rows().next().unwrap();

        assert_eq!(row["CITY"], "Pune");
        assert_eq!(row["Society Name"], "Green, Acres");
        assert_eq!(row["TEAM"], "Alpha");
    }

    #[test]
    fn test_quote_wrapped_values_are_kept() {
        let content = "Society Name,Bucket of Issues\n\"\"\"Royal\"\"\",\"\"\"a\"\"\"\"b\"\"\"\n";
        let parsed = CsvParser::new().parse_content(content).unwrap();
        let row = parsed.rows().next().unwrap();

        assert_eq!(row["Society Name"], "\"Royal\"");
        assert_eq!(row["Bucket of Issues"], "\"a\"\"b\"");
    }

    #[test]
    fn test_duplicate_header_keeps_first_column() {
        let parsed = CsvParser::new().parse_content("CITY,CITY\nPune,Delhi\n").unwrap();
        assert_eq!(parsed.rows().next().unwrap()["CITY"], "Pune");
    }

    #[test]
    fn test_padding_inside_unquoted_field_is_kept() {
        let parsed = CsvParser::new()
            .parse_content("Society Name\n  Green  Acres \"East\"  \n")
            .unwrap();
        assert_eq!(parsed.rows().next().unwrap()["Society Name"], "Green  Acres \"East\"");
    }

    #[test]
    fn test_custom_delimiter() {
        let parsed = CsvParser::new()
            .with_delimiter(b';')
            .parse_content("a;b\n1;2")
            .unwrap();
        assert_eq!(parsed.rows().next().unwrap()["b"], "2");
    }
}
