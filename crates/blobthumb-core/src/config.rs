//! Configuration module
//!
//! The pipeline configuration is resolved once per invocation from the
//! environment and handed to the pipeline by reference. Nothing below the
//! function entry point reads the environment.

use std::env;
use std::fmt;

use crate::error::{PipelineError, PipelineResult};

pub const ACCOUNT_NAME_VAR: &str = "ACCOUNT_NAME";
pub const ACCOUNT_KEY_VAR: &str = "ACCOUNT_KEY";
pub const FETCH_CONNECTION_STRING_VAR: &str = "AzureWebJobsStorage";
pub const THUMBNAIL_WIDTH_VAR: &str = "THUMBNAIL_WIDTH";
pub const THUMBNAIL_CONTAINER_VAR: &str = "THUMBNAIL_CONTAINER_NAME";
pub const IMAGE_CONTAINER_VAR: &str = "IMAGE_CONTAINER_NAME";

/// Thumbnail pipeline configuration
///
/// The publish credential (`account_name` + `account_key`) and the fetch
/// credential (`fetch_connection_string`) are configured independently so
/// that reads and writes can run under different trust contexts.
#[derive(Clone)]
pub struct PipelineConfig {
    pub destination_container: String,
    pub source_container: String,
    pub thumbnail_width: u32,
    pub account_name: String,
    pub account_key: String,
    pub fetch_connection_string: String,
}

impl PipelineConfig {
    pub fn new(
        source_container: impl Into<String>,
        destination_container: impl Into<String>,
        thumbnail_width: u32,
        account_name: impl Into<String>,
        account_key: impl Into<String>,
        fetch_connection_string: impl Into<String>,
    ) -> PipelineResult<Self> {
        let config = PipelineConfig {
            destination_container: destination_container.into(),
            source_container: source_container.into(),
            thumbnail_width,
            account_name: account_name.into(),
            account_key: account_key.into(),
            fetch_connection_string: fetch_connection_string.into(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the process environment (and `.env` if present).
    pub fn from_env() -> PipelineResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> PipelineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| -> PipelineResult<String> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| PipelineError::Configuration(format!("{} must be set", name)))
        };

        let width_raw = required(THUMBNAIL_WIDTH_VAR)?;
        let thumbnail_width = width_raw.parse::<u32>().map_err(|_| {
            PipelineError::Configuration(format!(
                "{} must be a positive integer, got '{}'",
                THUMBNAIL_WIDTH_VAR, width_raw
            ))
        })?;

        let config = PipelineConfig {
            destination_container: required(THUMBNAIL_CONTAINER_VAR)?,
            source_container: required(IMAGE_CONTAINER_VAR)?,
            thumbnail_width,
            account_name: required(ACCOUNT_NAME_VAR)?,
            account_key: required(ACCOUNT_KEY_VAR)?,
            fetch_connection_string: required(FETCH_CONNECTION_STRING_VAR)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.thumbnail_width == 0 {
            return Err(PipelineError::Configuration(format!(
                "{} must be greater than zero",
                THUMBNAIL_WIDTH_VAR
            )));
        }

        let non_empty = [
            (THUMBNAIL_CONTAINER_VAR, &self.destination_container),
            (IMAGE_CONTAINER_VAR, &self.source_container),
            (ACCOUNT_NAME_VAR, &self.account_name),
            (ACCOUNT_KEY_VAR, &self.account_key),
            (FETCH_CONNECTION_STRING_VAR, &self.fetch_connection_string),
        ];
        for (name, value) in non_empty {
            if value.trim().is_empty() {
                return Err(PipelineError::Configuration(format!(
                    "{} must not be empty",
                    name
                )));
            }
        }

        if self.source_container == self.destination_container {
            return Err(PipelineError::Configuration(format!(
                "{} and {} must name different containers",
                IMAGE_CONTAINER_VAR, THUMBNAIL_CONTAINER_VAR
            )));
        }

        if self.source_container.contains('/') || self.destination_container.contains('/') {
            return Err(PipelineError::Configuration(
                "container names must not contain '/'".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("destination_container", &self.destination_container)
            .field("source_container", &self.source_container)
            .field("thumbnail_width", &self.thumbnail_width)
            .field("account_name", &self.account_name)
            .field("account_key", &"<redacted>")
            .field("fetch_connection_string", &"<redacted>")
            .finish()
    }
}
