//! KPI and distribution computations over a record subset.
//!
//! Every function here is pure and total: an empty subset yields zero counts
//! and empty distributions. The only state is [`TrendTracker`], which the
//! session owns and passes in.

use std::collections::{BTreeMap, HashMap};

use crate::domain::dashboard::{
    CategoryBreakdown, CategoryCount, CategoryField, DistributionEntry, Kpis, Trend,
};
use crate::domain::record::{is_missing, Record, NOT_AVAILABLE};

/// Remembers the last computed compliance rate.
#[derive(Debug, Clone, Default)]
pub struct TrendTracker {
    previous_rate: f64,
    last_trend: Trend,
}

impl TrendTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare against the previous rate, then remember this one.
    pub fn observe(&mut self, rate: f64) -> Trend {
        let trend = if rate > self.previous_rate {
            Trend::Improved
        } else if rate < self.previous_rate {
            Trend::Worsened
        } else {
            Trend::Unchanged
        };
        self.previous_rate = rate;
        self.last_trend = trend;
        trend
    }

    pub fn last_trend(&self) -> Trend {
        self.last_trend
    }

    pub fn previous_rate(&self) -> f64 {
        self.previous_rate
    }
}

pub fn compute_kpis(subset: &[Record], tracker: &mut TrendTracker) -> Kpis {
    let total = subset.len();
    let valid = subset.iter().filter(|record| record.is_valid()).count();
    let compliance_rate = if total > 0 {
        valid as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    Kpis {
        total,
        valid,
        invalid: total - valid,
        compliance_rate,
        trend: tracker.observe(compliance_rate),
    }
}

/// Count per status, labels in order of first appearance.
pub fn status_distribution(subset: &[Record]) -> Vec<DistributionEntry> {
    count_in_first_seen_order(subset.iter().map(|record| {
        if record.status.trim().is_empty() {
            NOT_AVAILABLE
        } else {
            record.status.as_str()
        }
    }))
}

/// Count per issue bucket, blank/N/A excluded, most frequent first.
pub fn issue_distribution(subset: &[Record]) -> Vec<DistributionEntry> {
    let mut entries = count_in_first_seen_order(
        subset
            .iter()
            .map(|record| record.issue_bucket.as_str())
            .filter(|bucket| !is_missing(bucket)),
    );
    // stable: ties keep first-seen order
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// Valid vs other-status counts per category, categories ascending.
///
/// Categories come from the subset itself, so a category only appears when
/// at least one record in the subset carries it.
pub fn category_breakdown(subset: &[Record], field: CategoryField) -> CategoryBreakdown {
    let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();

    for record in subset {
        let category = field.value_of(record);
        if is_missing(category) {
            continue;
        }
        let slot = counts.entry(category).or_default();
        if record.is_valid() {
            slot.0 += 1;
        } else {
            slot.1 += 1;
        }
    }

    CategoryBreakdown {
        field,
        entries: counts
            .into_iter()
            .map(|(category, (valid, invalid))| CategoryCount {
                category: category.to_string(),
                valid,
                invalid,
            })
            .collect(),
    }
}

fn count_in_first_seen_order<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<DistributionEntry> {
    let mut positions: HashMap<&'a str, usize> = HashMap::new();
    let mut entries: Vec<DistributionEntry> = Vec::new();

    for label in labels {
        let position = *positions.entry(label).or_insert_with(|| {
            entries.push(DistributionEntry {
                label: label.to_string(),
                count: 0,
            });
            entries.len() - 1
        });
        entries[position].count += 1;
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(city: &str, team: &str, status: &str, bucket: &str) -> Record {
        Record {
            city: city.into(),
            team: team.into(),
            status: status.into(),
            issue_bucket: bucket.into(),
            ..Record::default()
        }
    }

    fn entry(label: &str, count: usize) -> DistributionEntry {
        DistributionEntry {
            label: label.into(),
            count,
        }
    }

    #[test]
    fn test_kpis_counts_and_rate() {
        let subset = vec![
            record("Pune", "A", "Valid", "N/A"),
            record("Pune", "A", "valid", "N/A"),
            record("Pune", "A", "Invalid", "Unsigned"),
            record("Pune", "A", "N/A", "N/A"),
        ];
        let kpis = compute_kpis(&subset, &mut TrendTracker::new());

        assert_eq!(kpis.total, 4);
        assert_eq!(kpis.valid, 2);
        assert_eq!(kpis.invalid, 2);
        assert_eq!(kpis.valid + kpis.invalid, kpis.total);
        assert!((kpis.compliance_rate - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kpis_empty_subset_is_zero() {
        let kpis = compute_kpis(&[], &mut TrendTracker::new());
        assert_eq!(kpis.total, 0);
        assert_eq!(kpis.invalid, 0);
        assert_eq!(kpis.compliance_rate, 0.0);
        assert!(!kpis.compliance_rate.is_nan());
    }

    #[test]
    fn test_trend_sequence() {
        let mut tracker = TrendTracker::new();
        assert_eq!(tracker.last_trend(), Trend::Unchanged);

        assert_eq!(tracker.observe(50.0), Trend::Improved);
        assert_eq!(tracker.observe(50.0), Trend::Unchanged);
        assert_eq!(tracker.observe(20.0), Trend::Worsened);
        assert_eq!(tracker.previous_rate(), 20.0);
    }

    #[test]
    fn test_status_distribution_first_seen_order() {
        let subset = vec![
            record("", "", "Invalid", ""),
            record("", "", "Valid", ""),
            record("", "", "Invalid", ""),
            record("", "", " ", ""),
        ];
        assert_eq!(
            status_distribution(&subset),
            vec![entry("Invalid", 2), entry("Valid", 1), entry("N/A", 1)]
        );
    }

    #[test]
    fn test_issue_distribution_sorted_and_stable() {
        let subset = vec![
            record("", "", "Invalid", "Unsigned"),
            record("", "", "Invalid", "Missing stamp"),
            record("", "", "Valid", "N/A"),
            record("", "", "Invalid", "Wrong rent"),
            record("", "", "Invalid", "Missing stamp"),
            record("", "", "Invalid", " "),
        ];
        let distribution = issue_distribution(&subset);

        assert_eq!(
            distribution,
            vec![
                entry("Missing stamp", 2),
                entry("Unsigned", 1),
                entry("Wrong rent", 1)
            ]
        );
        assert!(distribution.windows(2).all(|w| w[0].count >= w[1].count));
        assert!(distribution.iter().all(|e| e.label != NOT_AVAILABLE));
    }

    #[test]
    fn test_city_breakdown() {
        let subset = vec![
            record("Pune", "", "Valid", ""),
            record("Pune", "", "Invalid", ""),
            record("Delhi", "", "Valid", ""),
        ];
        let breakdown = category_breakdown(&subset, CategoryField::City);

        assert_eq!(breakdown.field, CategoryField::City);
        assert_eq!(
            breakdown.entries,
            vec![
                CategoryCount {
                    category: "Delhi".into(),
                    valid: 1,
                    invalid: 0
                },
                CategoryCount {
                    category: "Pune".into(),
                    valid: 1,
                    invalid: 1
                },
            ]
        );
    }

    #[test]
    fn test_team_breakdown_skips_sentinel() {
        let subset = vec![
            record("", "N/A", "Valid", ""),
            record("", "Beta", "N/A", ""),
            record("", "Alpha", "VALID", ""),
        ];
        let breakdown = category_breakdown(&subset, CategoryField::Team);
        let categories: Vec<_> = breakdown.entries.iter().map(|e| e.category.as_str()).collect();

        assert_eq!(categories, vec!["Alpha", "Beta"]);
        assert_eq!(breakdown.entries[1].invalid, 1);
    }

    #[test]
    fn test_empty_subset_distributions() {
        assert!(status_distribution(&[]).is_empty());
        assert!(issue_distribution(&[]).is_empty());
        assert!(category_breakdown(&[], CategoryField::Team).entries.is_empty());
    }
}
