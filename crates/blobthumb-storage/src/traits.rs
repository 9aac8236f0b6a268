//! Blob store abstraction trait
//!
//! This module defines the BlobStore trait that all storage backends must implement.

use crate::locator::BlobLocator;
use async_trait::async_trait;
use blobthumb_core::PipelineError;
use bytes::Bytes;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Blob not found: {0}")]
    NotFound(String),

    #[error("Invalid blob URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for PipelineError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidUrl { url, reason } => {
                PipelineError::InvalidSourceUrl { url, reason }
            }
            StorageError::ConfigError(message) => PipelineError::Configuration(message),
            other => PipelineError::Transport(other.to_string()),
        }
    }
}

/// Blob store abstraction trait
///
/// One implementation is bound to one credential. The pipeline holds two
/// stores, one for fetching the source and one for publishing the thumbnail.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Download the full contents of a blob into memory
    async fn download(&self, blob: &BlobLocator) -> StorageResult<Bytes>;

    /// Write a blob, replacing any existing content at that location
    async fn upload(&self, blob: &BlobLocator, data: Bytes, content_type: &str)
        -> StorageResult<()>;
}
