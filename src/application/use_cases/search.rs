use crate::domain::dashboard::{TablePage, TableRow};
use crate::domain::record::Record;

/// Rows rendered per table page.
pub const TABLE_PAGE_SIZE: usize = 100;

/// Records where any field contains `term`, ignoring case. Empty term matches all.
pub fn search<'a>(subset: &'a [Record], term: &str) -> Vec<&'a Record> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return subset.iter().collect();
    }

    subset
        .iter()
        .filter(|record| {
            record
                .values()
                .iter()
                .any(|value| value.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Search, then keep the first page for display.
pub fn table_page(subset: &[Record], term: &str) -> TablePage {
    let matches = search(subset, term);
    TablePage {
        search_term: term.to_string(),
        total_matches: matches.len(),
        rows: matches
            .into_iter()
            .take(TABLE_PAGE_SIZE)
            .map(|record| TableRow {
                record: record.clone(),
                is_valid: record.is_valid(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(employee: &str, society: &str, status: &str) -> Record {
        Record {
            employee_identifier: employee.into(),
            society_name: society.into(),
            status: status.into(),
            ..Record::default()
        }
    }

    #[test]
    fn test_empty_term_returns_everything_in_order() {
        let subset = vec![record("b", "X", "Valid"), record("a", "Y", "Invalid")];
        let found = search(&subset, "");
        assert_eq!(found, subset.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_case_insensitive_across_fields() {
        let subset = vec![
            record("asha@corp.in", "Green Acres", "Valid"),
            record("ravi@corp.in", "Blue Heights", "Invalid"),
        ];
        assert_eq!(search(&subset, "GREEN").len(), 1);
        assert_eq!(search(&subset, "corp").len(), 2);
        assert_eq!(search(&subset, "invalid")[0].employee_identifier, "ravi@corp.in");
        assert!(search(&subset, "nowhere").is_empty());
    }

    #[test]
    fn test_sentinel_is_searchable() {
        let subset = vec![record("a", "X", "Valid")];
        // product etc. default to N/A
        assert_eq!(search(&subset, "n/a").len(), 1);
    }

    #[test]
    fn test_table_page_is_bounded() {
        let subset: Vec<_> = (0..150).map(|i| record(&format!("e{}", i), "S", "Valid")).collect();
        let page = table_page(&subset, "");

        assert_eq!(page.total_matches, 150);
        assert_eq!(page.rows.len(), TABLE_PAGE_SIZE);
        assert!(page.rows[0].is_valid);
        assert_eq!(page.rows[0].record.employee_identifier, "e0");
    }
}
