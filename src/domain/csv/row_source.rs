use std::collections::HashMap;

/// Column name -> trimmed cell text.
pub type RawRow = HashMap<String, String>;

/// A finite, restartable sequence of raw rows.
///
/// Every call to [`RowSource::rows`] starts again from the first data row, so
/// a source can be validated and then normalized without buffering it.
pub trait RowSource {
    /// Header names in source order.
    fn headers(&self) -> &[String];

    fn rows(&self) -> Box<dyn Iterator<Item = RawRow> + '_>;

    fn is_empty(&self) -> bool {
        self.rows().next().is_none()
    }
}

/// Rows that arrived already keyed (e.g. decoded JSON objects).
#[derive(Debug, Clone, Default)]
pub struct KeyedRows {
    headers: Vec<String>,
    rows: Vec<RawRow>,
}

impl KeyedRows {
    pub fn new(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { headers, rows }
    }

    /// Build from rows alone; headers are the keys of the first row.
    pub fn from_rows(rows: Vec<RawRow>) -> Self {
        let mut headers: Vec<String> = rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        headers.sort();
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

impl RowSource for KeyedRows {
    fn headers(&self) -> &[String] {
        &self.headers
    }

    fn rows(&self) -> Box<dyn Iterator<Item = RawRow> + '_> {
        Box::new(self.rows.iter().cloned())
    }

    fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_rows_restart() {
        let row: RawRow = [("CITY".to_string(), "Pune".to_string())].into_iter().collect();
        let rows = KeyedRows::from_rows(vec![row.clone(), row]);

        assert_eq!(rows.headers(), &["CITY".to_string()]);
        assert_eq!(rows.rows().count(), 2);
        assert_eq!(rows.rows().count(), 2);
        assert!(!rows.is_empty());
    }
}
