pub mod aggregation;
pub mod csv_export;
pub mod filter_engine;
pub mod header_resolver;
pub mod ingestion;
pub mod insights;
pub mod record_normalizer;
pub mod search;
pub mod session;
