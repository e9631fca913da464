use std::collections::HashMap;

use serde::Serialize;

use crate::domain::record::LogicalField;

/// Logical field -> actual column name, resolved once per load.
///
/// Required fields are always present once a `FieldMap` exists; optional
/// fields may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldMap {
    columns: HashMap<LogicalField, String>,
}

impl FieldMap {
    pub(crate) fn insert(&mut self, field: LogicalField, column: String) {
        self.columns.insert(field, column);
    }

    pub fn column(&self, field: LogicalField) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }
}
