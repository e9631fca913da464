// ============================================================
// INGESTION USE CASE
// ============================================================
// Fetch -> parse -> resolve headers -> normalize, all or nothing

use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info};

use crate::application::use_cases::header_resolver::HeaderResolver;
use crate::application::use_cases::record_normalizer::RecordNormalizer;
use crate::domain::csv::{FieldMap, RowSource};
use crate::domain::data_source::DataSource;
use crate::domain::error::{AppError, Result};
use crate::domain::record::Record;
use crate::infrastructure::csv::{parse_json_text, CsvParser};
use crate::infrastructure::data_source::{DataSourceClient, PayloadFormat, RawPayload};

/// A fully normalized dataset, ready to become the session's master.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub records: Vec<Record>,
    pub field_map: FieldMap,
    pub fingerprint: String,
    pub source: String,
}

pub struct IngestionUseCase {
    client: Arc<dyn DataSourceClient + Send + Sync>,
}

impl IngestionUseCase {
    pub fn new(client: Arc<dyn DataSourceClient + Send + Sync>) -> Self {
        Self { client }
    }

    pub async fn load(&self, source: &DataSource) -> Result<LoadedDataset> {
        let start = Instant::now();
        let described = source.describe();

        let result = match self.client.fetch(source).await {
            Ok(payload) => Self::ingest_payload(payload, described.clone()),
            Err(err) => Err(err),
        };

        match &result {
            Ok(dataset) => info!(
                source = %described,
                records = dataset.records.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Loaded dataset"
            ),
            Err(err) => error!(source = %described, error = %err, "Dataset load failed"),
        }
        result
    }

    pub fn ingest_payload(payload: RawPayload, source: String) -> Result<LoadedDataset> {
        let (records, field_map) = match payload.format {
            PayloadFormat::Csv => Self::build(&CsvParser::new().parse_content(&payload.text)?)?,
            PayloadFormat::Json => Self::build(&parse_json_text(&payload.text)?)?,
        };

        Ok(LoadedDataset {
            records,
            field_map,
            fingerprint: payload.fingerprint,
            source,
        })
    }

    fn build(rows: &dyn RowSource) -> Result<(Vec<Record>, FieldMap)> {
        if rows.is_empty() {
            return Err(AppError::EmptyDataset);
        }
        let field_map = HeaderResolver::resolve(rows.headers())?;
        let records = RecordNormalizer::normalize(rows, &field_map)?;
        Ok((records, field_map))
    }
}
