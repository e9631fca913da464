//! Plain view structures handed to the rendering client.

use serde::{Deserialize, Serialize};

use crate::domain::filter::FilterCriteria;
use crate::domain::record::Record;

/// Direction of the compliance rate relative to the previous computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improved,
    Worsened,
    #[default]
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    /// Percentage in `0.0..=100.0`; zero for an empty subset.
    pub compliance_rate: f64,
    pub trend: Trend,
}

impl Kpis {
    /// Rate formatted for display, e.g. `66.7%`.
    pub fn rate_label(&self) -> String {
        format!("{:.1}%", self.compliance_rate)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub label: String,
    pub count: usize,
}

/// Field used by a valid-vs-invalid breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryField {
    Team,
    City,
}

impl CategoryField {
    pub fn value_of(self, record: &Record) -> &str {
        match self {
            CategoryField::Team => &record.team,
            CategoryField::City => &record.city,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub valid: usize,
    pub invalid: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub field: CategoryField,
    pub entries: Vec<CategoryCount>,
}

/// Distinct values offered by each filter control (wildcard not included).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub city: Vec<String>,
    pub team: Vec<String>,
    pub employee_identifier: Vec<String>,
    pub status: Vec<String>,
    pub issue_bucket: Vec<String>,
}

/// Everything the dashboard draws for one filter selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardViews {
    pub criteria: FilterCriteria,
    pub filtered_count: usize,
    pub kpis: Kpis,
    pub rate_label: String,
    pub status_distribution: Vec<DistributionEntry>,
    pub issue_distribution: Vec<DistributionEntry>,
    pub team_breakdown: CategoryBreakdown,
    pub city_breakdown: CategoryBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(flatten)]
    pub record: Record,
    pub is_valid: bool,
}

/// Search result as displayed: a bounded page plus the full match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TablePage {
    pub search_term: String,
    pub total_matches: usize,
    pub rows: Vec<TableRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_label_one_decimal() {
        let kpis = Kpis {
            total: 3,
            valid: 2,
            invalid: 1,
            compliance_rate: 200.0 / 3.0,
            trend: Trend::Improved,
        };
        assert_eq!(kpis.rate_label(), "66.7%");
    }

    #[test]
    fn test_trend_defaults_to_unchanged() {
        assert_eq!(Trend::default(), Trend::Unchanged);
    }
}
