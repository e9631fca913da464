use serde::{Deserialize, Serialize};

use crate::domain::record::Record;

/// Wildcard token used by filter controls.
pub const ALL: &str = "All";

/// One filter control: the wildcard or an exact value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    #[default]
    All,
    Exact(String),
}

impl Selection {
    /// Exact, case-sensitive comparison; the wildcard accepts anything.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Exact(expected) => expected == value,
        }
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        if value == ALL {
            Selection::All
        } else {
            Selection::Exact(value)
        }
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        Selection::from(value.to_string())
    }
}

impl From<Selection> for String {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::All => ALL.to_string(),
            Selection::Exact(value) => value,
        }
    }
}

/// Current selection of the five filter controls, combined with AND.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterCriteria {
    pub city: Selection,
    pub team: Selection,
    pub employee_identifier: Selection,
    pub status: Selection,
    pub issue_bucket: Selection,
}

impl FilterCriteria {
    pub fn matches(&self, record: &Record) -> bool {
        self.city.accepts(&record.city)
            && self.team.accepts(&record.team)
            && self.employee_identifier.accepts(&record.employee_identifier)
            && self.status.accepts(&record.status)
            && self.issue_bucket.accepts(&record.issue_bucket)
    }

    pub fn is_unfiltered(&self) -> bool {
        *self == FilterCriteria::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_from_wire_string() {
        assert_eq!(Selection::from("All"), Selection::All);
        assert_eq!(Selection::from("Pune"), Selection::Exact("Pune".into()));
        // only the exact token is the wildcard
        assert_eq!(Selection::from("all"), Selection::Exact("all".into()));
    }

    #[test]
    fn test_criteria_deserialize_with_missing_fields() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"city":"Pune","status":"All"}"#).unwrap();
        assert_eq!(criteria.city, Selection::Exact("Pune".into()));
        assert_eq!(criteria.team, Selection::All);
        assert_eq!(criteria.status, Selection::All);
    }

    #[test]
    fn test_criteria_serializes_wildcard_as_all() {
        let json = serde_json::to_value(FilterCriteria::default()).unwrap();
        assert_eq!(json["employeeIdentifier"], "All");
    }
}
