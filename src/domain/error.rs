use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppError {
    /// Source text is empty or is not tabular (e.g. an HTML error page).
    ParseError(String),
    /// Required logical fields with no matching column. Holds every missing label.
    HeaderMismatch(Vec<String>),
    EmptyDataset,
    TransportError(String),
    GenerationError(String),
    ConfigError(String),
    /// A generation control is already running.
    Busy(String),
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::HeaderMismatch(missing) => write!(
                f,
                "Header mismatch error: could not find these required columns: {}",
                missing.join(", ")
            ),
            AppError::EmptyDataset => write!(f, "Empty dataset error: the source has no data rows"),
            AppError::TransportError(msg) => write!(f, "Transport error: {}", msg),
            AppError::GenerationError(msg) => write!(f, "Generation error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Busy(msg) => write!(f, "Busy: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_mismatch_lists_every_label() {
        let err = AppError::HeaderMismatch(vec!["TEAM".to_string(), "Society Name".to_string()]);
        let message = err.to_string();
        assert!(message.contains("TEAM"));
        assert!(message.contains("Society Name"));
        assert!(message.starts_with("Header mismatch error"));
    }
}
