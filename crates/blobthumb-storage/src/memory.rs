//! In-memory blob store for tests and local runs

use crate::locator::BlobLocator;
use crate::traits::{BlobStore, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::memory::InMemory;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, GetOptions, ObjectStore, PutMode, PutOptions, PutPayload,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// A blob read back from the memory store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub data: Bytes,
    pub content_type: Option<String>,
}

/// Blob store backed by `object_store`'s in-memory implementation
///
/// Blobs are keyed by `{account}/{container}/{blob}`. Operation counters and
/// an upload failure switch let tests observe what the pipeline did.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    store: InMemory,
    downloads: AtomicUsize,
    uploads: AtomicUsize,
    fail_uploads: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(blob: &BlobLocator) -> StorageResult<Path> {
        let name = blob.object_path()?;
        Path::parse(format!("{}/{}/{}", blob.account(), blob.container(), name)).map_err(|e| {
            StorageError::InvalidUrl {
                url: blob.to_string(),
                reason: e.to_string(),
            }
        })
    }

    /// Seed a blob without counting it as an upload
    pub async fn insert(&self, blob: &BlobLocator, data: impl Into<Bytes>) -> StorageResult<()> {
        self.store
            .put_opts(&Self::key(blob)?, PutPayload::from(data.into()), PutOptions::default())
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        Ok(())
    }

    /// Read a blob back with its content type, if it exists
    pub async fn get(&self, blob: &BlobLocator) -> StorageResult<Option<StoredBlob>> {
        match self.store.get_opts(&Self::key(blob)?, GetOptions::default()).await {
            Ok(result) => {
                let content_type = result.attributes.get(&Attribute::ContentType).map(|v| {
                    let value: &str = v.as_ref();
                    value.to_string()
                });
                let data = result
                    .bytes()
                    .await
                    .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;
                Ok(Some(StoredBlob { data, content_type }))
            }
            Err(ObjectStoreError::NotFound { .. }) => Ok(None),
            Err(e) => Err(StorageError::DownloadFailed(e.to_string())),
        }
    }

    /// Make every subsequent upload fail with `UploadFailed`
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn download(&self, blob: &BlobLocator) -> StorageResult<Bytes> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        let result = self
            .store
            .get_opts(&Self::key(blob)?, GetOptions::default())
            .await
            .map_err(|e| match e {
                ObjectStoreError::NotFound { .. } => StorageError::NotFound(blob.to_string()),
                other => StorageError::DownloadFailed(other.to_string()),
            })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        tracing::debug!(blob = %blob, size_bytes = bytes.len() as u64, "Memory download");
        Ok(bytes)
    }

    async fn upload(
        &self,
        blob: &BlobLocator,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        self.uploads.fetch_add(1, Ordering::SeqCst);
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(format!(
                "upload rejected for {}",
                blob
            )));
        }

        let size = data.len() as u64;
        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            mode: PutMode::Overwrite,
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&Self::key(blob)?, PutPayload::from(data), options)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        tracing::debug!(blob = %blob, size_bytes = size, "Memory upload");
        Ok(())
    }
}
