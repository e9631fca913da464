// ============================================================
// HEADER RESOLVER
// ============================================================
// Match logical fields onto whatever column names the source uses

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::domain::csv::FieldMap;
use crate::domain::error::{AppError, Result};
use crate::domain::record::LogicalField;

/// Lowercase and drop whitespace, `_` and `-`, so `Name_Of Employee`
/// and `name of employee` compare equal.
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

pub struct HeaderResolver;

impl HeaderResolver {
    /// Resolve every required field or report all the missing ones.
    pub fn resolve(headers: &[String]) -> Result<FieldMap> {
        // first header wins when two normalize the same
        let mut lookup: HashMap<String, &str> = HashMap::new();
        for header in headers {
            lookup
                .entry(normalize_header(header))
                .or_insert(header.as_str());
        }

        let mut field_map = FieldMap::default();
        let mut missing = Vec::new();

        for field in LogicalField::REQUIRED {
            match Self::find(&lookup, field) {
                Some(column) => field_map.insert(field, column.to_string()),
                None => missing.push(field.label().to_string()),
            }
        }

        if !missing.is_empty() {
            warn!(missing = ?missing, "Required columns not found");
            return Err(AppError::HeaderMismatch(missing));
        }

        for field in LogicalField::OPTIONAL {
            match Self::find(&lookup, field) {
                Some(column) => field_map.insert(field, column.to_string()),
                None => debug!(field = field.label(), "Optional column not present"),
            }
        }

        Ok(field_map)
    }

    fn find<'a>(lookup: &HashMap<String, &'a str>, field: LogicalField) -> Option<&'a str> {
        field
            .aliases()
            .iter()
            .find_map(|alias| lookup.get(&normalize_header(alias)).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolves_canonical_headers() {
        let map = HeaderResolver::resolve(&headers(&[
            "Name of Employee",
            "CITY",
            "TEAM",
            "Agreement Status Final",
            "Bucket of Issues",
            "Society Name",
            "Kibana Id",
        ]))
        .unwrap();

        assert_eq!(map.column(LogicalField::Status), Some("Agreement Status Final"));
        assert_eq!(map.column(LogicalField::ExternalTraceId), Some("Kibana Id"));
        assert_eq!(map.column(LogicalField::Product), None);
    }

    #[test]
    fn test_resolves_loose_casing_and_separators() {
        let map = HeaderResolver::resolve(&headers(&[
            "name_of_employee",
            "CITY",
            "Team",
            "status",
            "Bucket_Of_Issues",
            "Society Name",
        ]))
        .unwrap();

        assert_eq!(map.column(LogicalField::EmployeeIdentifier), Some("name_of_employee"));
        assert_eq!(map.column(LogicalField::Team), Some("Team"));
        assert_eq!(map.column(LogicalField::Status), Some("status"));
        assert_eq!(map.column(LogicalField::IssueBucket), Some("Bucket_Of_Issues"));
        assert_eq!(map.len(), 6);
    }

    #[test]
    fn test_reports_every_missing_field() {
        let err = HeaderResolver::resolve(&headers(&[
            "Name of Employee",
            "CITY",
            "Agreement Status Final",
            "Bucket of Issues",
        ]))
        .unwrap_err();

        assert_eq!(
            err,
            AppError::HeaderMismatch(vec!["TEAM".to_string(), "Society Name".to_string()])
        );
    }

    #[test]
    fn test_canonical_label_preferred_over_alias() {
        let map = HeaderResolver::resolve(&headers(&[
            "Status",
            "Agreement Status Final",
            "Name of Employee",
            "CITY",
            "TEAM",
            "Bucket of Issues",
            "Society Name",
        ]))
        .unwrap();
        assert_eq!(map.column(LogicalField::Status), Some("Agreement Status Final"));
    }

    #[test]
    fn test_first_duplicate_header_wins() {
        let map = HeaderResolver::resolve(&headers(&[
            " city ",
            "CITY",
            "Name of Employee",
            "TEAM",
            "Agreement Status Final",
            "Bucket of Issues",
            "Society Name",
        ]))
        .unwrap();
        assert_eq!(map.column(LogicalField::City), Some(" city "));
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("  Name_of-Employee "), "nameofemployee");
    }
}
