use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(String),

    #[error("Failed to read credential file {path}: {source}")]
    CredentialRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse credential file {path}: {source}")]
    CredentialParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Google service-account key file. Only the identifying fields are kept;
/// the key material is never logged.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountCredentials {
    #[serde(rename = "type")]
    pub account_type: String,
    pub project_id: String,
    pub client_email: String,
    #[serde(default)]
    pub client_id: Option<String>,
}

pub fn load_service_account(path: impl AsRef<Path>) -> Result<ServiceAccountCredentials, ConfigError> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Missing("TTS_SA_KEY_JSON_PATH".to_string()));
    }

    let raw = fs::read_to_string(path).map_err(|source| ConfigError::CredentialRead {
        path: path.to_path_buf(),
        source,
    })?;

    let credentials: ServiceAccountCredentials =
        serde_json::from_str(&raw).map_err(|source| ConfigError::CredentialParse {
            path: path.to_path_buf(),
            source,
        })?;

    info!("Loaded TTS credentials for project: {}", credentials.project_id);
    Ok(credentials)
}
