//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the services. Nothing
//! in this crate reads process environment variables; the helpers below take the raw value
//! the binary read so that parsing and defaults live in one place.

use crate::constants::{DEFAULT_DATA_BACKEND, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::{ServiceError, ServiceResult};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use ward_client::{DataClient, HttpDataClient, MemoryDataClient};

/// Where records are kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataBackend {
    /// The hosted platform, over HTTP.
    Http,
    /// In-process tables; nothing survives a restart.
    Memory,
}

impl FromStr for DataBackend {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(DataBackend::Http),
            "memory" => Ok(DataBackend::Memory),
            other => Err(ServiceError::InvalidConfig(format!(
                "unknown data backend '{other}' (expected 'http' or 'memory')"
            ))),
        }
    }
}

impl fmt::Display for DataBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DataBackend::Http => "http",
            DataBackend::Memory => "memory",
        })
    }
}

/// Platform credentials for the HTTP backend.
#[derive(Clone)]
pub struct PlatformCredentials {
    data_url: String,
    project_id: String,
    public_key: String,
}

impl fmt::Debug for PlatformCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformCredentials")
            .field("data_url", &self.data_url)
            .field("project_id", &self.project_id)
            .field("public_key", &"<redacted>")
            .finish()
    }
}

impl PlatformCredentials {
    pub fn new(data_url: String, project_id: String, public_key: String) -> ServiceResult<Self> {
        for (name, value) in [
            ("data URL", &data_url),
            ("project id", &project_id),
            ("public key", &public_key),
        ] {
            if value.trim().is_empty() {
                return Err(ServiceError::InvalidConfig(format!("{name} cannot be empty")));
            }
        }
        Ok(Self {
            data_url,
            project_id,
            public_key,
        })
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    backend: DataBackend,
    credentials: Option<PlatformCredentials>,
    request_timeout: Duration,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidConfig` if the HTTP backend is selected without
    /// credentials, or if the timeout is zero.
    pub fn new(
        backend: DataBackend,
        credentials: Option<PlatformCredentials>,
        request_timeout: Duration,
    ) -> ServiceResult<Self> {
        if backend == DataBackend::Http && credentials.is_none() {
            return Err(ServiceError::InvalidConfig(
                "the http backend needs a data URL, project id and public key".into(),
            ));
        }
        if request_timeout.is_zero() {
            return Err(ServiceError::InvalidConfig(
                "request timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            backend,
            credentials,
            request_timeout,
        })
    }

    /// Configuration for the in-memory backend.
    pub fn memory() -> Self {
        Self {
            backend: DataBackend::Memory,
            credentials: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    pub fn backend(&self) -> DataBackend {
        self.backend
    }

    pub fn credentials(&self) -> Option<&PlatformCredentials> {
        self.credentials.as_ref()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Build the data client this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Transport` if the HTTP client cannot be built.
    pub fn connect(&self) -> ServiceResult<Arc<dyn DataClient>> {
        match (&self.backend, &self.credentials) {
            (DataBackend::Http, Some(creds)) => {
                let client = HttpDataClient::new(
                    &creds.data_url,
                    &creds.project_id,
                    &creds.public_key,
                    self.request_timeout,
                )?;
                tracing::info!(url = creds.data_url(), "-- Using hosted data platform");
                Ok(Arc::new(client))
            }
            (DataBackend::Http, None) => Err(ServiceError::InvalidConfig(
                "the http backend needs platform credentials".into(),
            )),
            (DataBackend::Memory, _) => {
                tracing::info!("-- Using in-memory data backend");
                Ok(Arc::new(MemoryDataClient::new()))
            }
        }
    }
}

/// Parse a backend name taken from the environment, defaulting to `http`.
pub fn backend_from_env_value(value: Option<String>) -> ServiceResult<DataBackend> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_DATA_BACKEND.to_string())
        .parse()
}

/// Parse a timeout in whole seconds taken from the environment, defaulting to 30.
pub fn request_timeout_from_env_value(value: Option<String>) -> ServiceResult<Duration> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let secs = match value {
        Some(v) => v.parse::<u64>().map_err(|_| {
            ServiceError::InvalidConfig(format!(
                "request timeout '{v}' is not a whole number of seconds"
            ))
        })?,
        None => DEFAULT_REQUEST_TIMEOUT_SECS,
    };
    Ok(Duration::from_secs(secs))
}

/// Build credentials from three optional environment values.
///
/// Returns `Ok(None)` when all three are unset, and an error when only some are.
pub fn credentials_from_env_values(
    data_url: Option<String>,
    project_id: Option<String>,
    public_key: Option<String>,
) -> ServiceResult<Option<PlatformCredentials>> {
    match (data_url, project_id, public_key) {
        (None, None, None) => Ok(None),
        (Some(url), Some(project), Some(key)) => {
            PlatformCredentials::new(url, project, key).map(Some)
        }
        _ => Err(ServiceError::InvalidConfig(
            "data URL, project id and public key must be set together".into(),
        )),
    }
}
