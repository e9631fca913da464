// ============================================================
// TABULAR DOMAIN LAYER
// ============================================================
// Loosely-keyed rows as they arrive from a source, before normalization
// No I/O, no async, no external dependencies

mod field_map;
mod row_source;

pub use field_map::FieldMap;
pub use row_source::{KeyedRows, RawRow, RowSource};
