// ============================================================
// DASHBOARD SESSION
// ============================================================
// Owns the master dataset and every piece of mutable dashboard state

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::application::use_cases::aggregation::{
    category_breakdown, compute_kpis, issue_distribution, status_distribution, TrendTracker,
};
use crate::application::use_cases::csv_export::to_csv;
use crate::application::use_cases::filter_engine::{filter_options, FilterEngine};
use crate::application::use_cases::ingestion::LoadedDataset;
use crate::application::use_cases::search::table_page;
use crate::domain::csv::FieldMap;
use crate::domain::dashboard::{CategoryField, DashboardViews, FilterOptions, TablePage};
use crate::domain::filter::FilterCriteria;
use crate::domain::record::Record;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSummary {
    pub session_id: Uuid,
    pub source: String,
    pub records: usize,
    pub fingerprint: String,
    /// Logical field -> source column actually used.
    pub columns: FieldMap,
    pub loaded_at: DateTime<Utc>,
}

/// State for one dashboard. Nothing here is global, so independent sessions
/// can coexist.
#[derive(Debug)]
pub struct DashboardSession {
    id: Uuid,
    master: Option<Arc<[Record]>>,
    filters: FilterEngine,
    trend: TrendTracker,
    search_term: String,
    views: Option<DashboardViews>,
    last_load: Option<LoadSummary>,
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            master: None,
            filters: FilterEngine::new(),
            trend: TrendTracker::new(),
            search_term: String::new(),
            views: None,
            last_load: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_loaded(&self) -> bool {
        self.master.is_some()
    }

    /// Swap in a freshly loaded master dataset; filters and search start over.
    pub fn replace_dataset(&mut self, dataset: LoadedDataset) -> LoadSummary {
        let summary = LoadSummary {
            session_id: self.id,
            source: dataset.source,
            records: dataset.records.len(),
            fingerprint: dataset.fingerprint,
            columns: dataset.field_map,
            loaded_at: Utc::now(),
        };

        let master: Arc<[Record]> = Arc::from(dataset.records);
        self.filters.reset(&master);
        self.master = Some(master);
        self.search_term.clear();
        self.recompute_views();

        info!(
            session = %self.id,
            records = summary.records,
            fingerprint = %summary.fingerprint,
            "Master dataset replaced"
        );
        self.last_load = Some(summary.clone());
        summary
    }

    pub fn master(&self) -> Option<&[Record]> {
        self.master.as_deref()
    }

    /// Summary of the load that produced the current master dataset.
    pub fn last_load(&self) -> Option<&LoadSummary> {
        self.last_load.as_ref()
    }

    pub fn criteria(&self) -> &FilterCriteria {
        self.filters.criteria()
    }

    /// The current filtered subset; `None` before the first load.
    pub fn filtered(&self) -> Option<&[Record]> {
        self.filters.subset()
    }

    pub fn views(&self) -> Option<&DashboardViews> {
        self.views.as_ref()
    }

    pub fn filter_options(&self) -> Option<FilterOptions> {
        self.master().map(filter_options)
    }

    /// Re-filter the master dataset and recompute every view.
    ///
    /// A new selection clears the search term.
    pub fn apply_filters(&mut self, criteria: FilterCriteria) -> Option<&DashboardViews> {
        let master = self.master.clone()?;
        self.filters.apply(&master, criteria);
        self.search_term.clear();
        self.recompute_views();
        self.views.as_ref()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Search the filtered subset. `None` reuses the previous term.
    pub fn table(&mut self, term: Option<&str>) -> Option<TablePage> {
        if let Some(term) = term {
            self.search_term = term.to_string();
        }
        let subset = self.filters.subset()?;
        Some(table_page(subset, &self.search_term))
    }

    pub fn export_csv(&self) -> Option<String> {
        self.filtered().map(to_csv)
    }

    fn recompute_views(&mut self) {
        let Some(subset) = self.filters.subset() else {
            self.views = None;
            return;
        };

        let kpis = compute_kpis(subset, &mut self.trend);
        self.views = Some(DashboardViews {
            criteria: self.filters.criteria().clone(),
            filtered_count: subset.len(),
            rate_label: kpis.rate_label(),
            kpis,
            status_distribution: status_distribution(subset),
            issue_distribution: issue_distribution(subset),
            team_breakdown: category_breakdown(subset, CategoryField::Team),
            city_breakdown: category_breakdown(subset, CategoryField::City),
        });
    }
}
