#[cfg(feature = "storage-azure")]
use crate::AzureBlobStore;
use crate::{BlobStore, StorageResult};
use blobthumb_core::PipelineConfig;
use std::sync::Arc;

/// Create the store used to read source images (fetch connection string)
#[cfg(feature = "storage-azure")]
pub fn create_fetch_store(config: &PipelineConfig) -> StorageResult<Arc<dyn BlobStore>> {
    let store = AzureBlobStore::from_connection_string(&config.fetch_connection_string)?;
    tracing::debug!(credential = store.credential().kind(), "Fetch store ready");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "storage-azure"))]
pub fn create_fetch_store(_config: &PipelineConfig) -> StorageResult<Arc<dyn BlobStore>> {
    Err(crate::StorageError::ConfigError(
        "Azure storage backend not available (storage-azure feature not enabled)".to_string(),
    ))
}

/// Create the store used to publish thumbnails (account name + key)
#[cfg(feature = "storage-azure")]
pub fn create_publish_store(config: &PipelineConfig) -> StorageResult<Arc<dyn BlobStore>> {
    let store = AzureBlobStore::from_shared_key(&config.account_name, &config.account_key);
    tracing::debug!(account = %config.account_name, "Publish store ready");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "storage-azure"))]
pub fn create_publish_store(_config: &PipelineConfig) -> StorageResult<Arc<dyn BlobStore>> {
    Err(crate::StorageError::ConfigError(
        "Azure storage backend not available (storage-azure feature not enabled)".to_string(),
    ))
}
