use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

/// Where the agreement sheet comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DataSource {
    /// Published-spreadsheet CSV export or any `text/csv` resource.
    Csv { url: String },
    /// Bare array of row objects, or `{ "data": [...] }`.
    Json { url: String },
    /// File on disk; `.json` is decoded as JSON, anything else as CSV.
    Local { path: PathBuf },
    #[default]
    Unset,
}

impl DataSource {
    pub fn validate(&self) -> Result<()> {
        match self {
            DataSource::Csv { url } | DataSource::Json { url } => {
                let parsed = url::Url::parse(url).map_err(|e| {
                    AppError::ConfigError(format!("invalid data source url '{}': {}", url, e))
                })?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    return Err(AppError::ConfigError(format!(
                        "unsupported url scheme '{}'",
                        parsed.scheme()
                    )));
                }
                Ok(())
            }
            DataSource::Local { path } if path.as_os_str().is_empty() => {
                Err(AppError::ConfigError("local data source path is empty".to_string()))
            }
            DataSource::Local { .. } => Ok(()),
            DataSource::Unset => Err(AppError::ConfigError(
                "data source is not configured".to_string(),
            )),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            DataSource::Csv { url } => format!("csv:{}", url),
            DataSource::Json { url } => format!("json:{}", url),
            DataSource::Local { path } => format!("file:{}", path.display()),
            DataSource::Unset => "unset".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_is_config_error() {
        let err = DataSource::Unset.validate().unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_rejects_non_http_url() {
        let source = DataSource::Csv {
            url: "ftp://example.com/sheet.csv".into(),
        };
        assert!(source.validate().is_err());

        let source = DataSource::Json {
            url: "https://example.com/data.json".into(),
        };
        assert!(source.validate().is_ok());
    }

    #[test]
    fn test_tagged_serde() {
        let source: DataSource =
            serde_json::from_str(r#"{"kind":"local","path":"data/agreements.csv"}"#).unwrap();
        assert_eq!(
            source,
            DataSource::Local {
                path: PathBuf::from("data/agreements.csv")
            }
        );
    }
}
