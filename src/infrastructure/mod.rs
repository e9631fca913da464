pub mod config;
pub mod csv;
pub mod data_source;
pub mod llm_clients;
pub mod response;
