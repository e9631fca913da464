pub mod dashboard;
pub mod data_source;
pub mod error;
pub mod filter;
pub mod llm_config;
pub mod record;

// Raw tabular rows and header resolution results
pub mod csv;
