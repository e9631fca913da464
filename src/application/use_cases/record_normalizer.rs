use tracing::debug;

use crate::domain::csv::{FieldMap, RawRow, RowSource};
use crate::domain::error::{AppError, Result};
use crate::domain::record::{LogicalField, Record, NOT_AVAILABLE};

pub struct RecordNormalizer;

impl RecordNormalizer {
    /// Convert every row into a `Record`, preserving order.
    pub fn normalize(source: &dyn RowSource, field_map: &FieldMap) -> Result<Vec<Record>> {
        let records: Vec<Record> = source
            .rows()
            .map(|row| Self::normalize_row(&row, field_map))
            .collect();

        if records.is_empty() {
            return Err(AppError::EmptyDataset);
        }

        debug!(records = records.len(), "Normalized rows");
        Ok(records)
    }

    pub fn normalize_row(row: &RawRow, field_map: &FieldMap) -> Record {
        let mut record = Record::default();

        for field in LogicalField::REQUIRED.into_iter().chain(LogicalField::OPTIONAL) {
            let value = field_map
                .column(field)
                .and_then(|column| row.get(column))
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .unwrap_or(NOT_AVAILABLE);
            *record.slot_mut(field) = value.to_string();
        }

        record
    }
}
