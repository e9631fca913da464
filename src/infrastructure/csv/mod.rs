// ============================================================
// TABULAR INFRASTRUCTURE LAYER
// ============================================================
// CSV and JSON decoding into raw row sources

mod csv_parser;
mod json_rows;

pub use csv_parser::{CsvParser, DelimitedRows};
pub use json_rows::{parse_json_rows, parse_json_text};
