use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::dashboard::FilterOptions;
use crate::domain::filter::FilterCriteria;
use crate::domain::record::{is_missing, LogicalField, Record};

/// Records matching every criterion, in master order.
pub fn apply_filters(master: &[Record], criteria: &FilterCriteria) -> Vec<Record> {
    master
        .iter()
        .filter(|record| criteria.matches(record))
        .cloned()
        .collect()
}

/// Distinct, sorted, non-sentinel values for each filter control.
pub fn filter_options(master: &[Record]) -> FilterOptions {
    let distinct = |field: LogicalField| -> Vec<String> {
        master
            .iter()
            .map(|record| record.get(field))
            .filter(|value| !is_missing(value))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    };

    FilterOptions {
        city: distinct(LogicalField::City),
        team: distinct(LogicalField::Team),
        employee_identifier: distinct(LogicalField::EmployeeIdentifier),
        status: distinct(LogicalField::Status),
        issue_bucket: distinct(LogicalField::IssueBucket),
    }
}

/// Owns the current criteria and the subset they select.
#[derive(Debug, Default)]
pub struct FilterEngine {
    criteria: FilterCriteria,
    subset: Option<Vec<Record>>,
}

impl FilterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// `None` until a dataset has been filtered at least once.
    pub fn subset(&self) -> Option<&[Record]> {
        self.subset.as_deref()
    }

    pub fn apply(&mut self, master: &[Record], criteria: FilterCriteria) -> &[Record] {
        let subset = apply_filters(master, &criteria);
        debug!(
            master = master.len(),
            selected = subset.len(),
            criteria = ?criteria,
            "Applied filters"
        );
        self.criteria = criteria;
        self.subset.insert(subset)
    }

    /// Back to all-wildcard criteria over a fresh master dataset.
    pub fn reset(&mut self, master: &[Record]) -> &[Record] {
        self.apply(master, FilterCriteria::default())
    }
}
