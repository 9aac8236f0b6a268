use crate::connection::{ConnectionString, StorageCredential};
use crate::locator::{BlobLocator, EndpointStyle};
use crate::traits::{BlobStore, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::azure::{MicrosoftAzure, MicrosoftAzureBuilder};
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, GetOptions, ObjectStore, PutMode, PutOptions, PutPayload,
    Result as ObjectResult,
};

/// Azure Blob Storage implementation
///
/// A client is built per blob from the locator's account and container, so a
/// single store can read or write anywhere its credential is accepted.
#[derive(Clone, Debug)]
pub struct AzureBlobStore {
    credential: StorageCredential,
    // Service endpoint the credential was issued for, when known
    expected_endpoint: Option<String>,
}

impl AzureBlobStore {
    pub fn new(credential: StorageCredential) -> Self {
        AzureBlobStore {
            credential,
            expected_endpoint: None,
        }
    }

    /// Store authenticated with an account name + account key pair
    pub fn from_shared_key(account: impl Into<String>, key: impl Into<String>) -> Self {
        Self::new(StorageCredential::shared_key(account, key))
    }

    /// Store authenticated with whatever a connection string carries
    pub fn from_connection_string(connection_string: &str) -> StorageResult<Self> {
        let parsed: ConnectionString = connection_string.parse()?;
        let credential = parsed.credential()?;
        Ok(AzureBlobStore {
            credential,
            expected_endpoint: parsed.blob_service_endpoint(),
        })
    }

    pub fn credential(&self) -> &StorageCredential {
        &self.credential
    }

    fn client_for(&self, blob: &BlobLocator) -> StorageResult<MicrosoftAzure> {
        let endpoint = blob.service_endpoint();

        if let Some(expected) = &self.expected_endpoint {
            if !expected.eq_ignore_ascii_case(&endpoint) {
                tracing::warn!(
                    expected = %expected,
                    endpoint = %endpoint,
                    "Blob endpoint differs from the connection string endpoint"
                );
            }
        }

        let mut builder = MicrosoftAzureBuilder::new().with_container_name(blob.container());

        builder = match &self.credential {
            StorageCredential::Emulator => builder.with_use_emulator(true),
            StorageCredential::SharedKey { account, key } => {
                if !account.eq_ignore_ascii_case(blob.account()) {
                    tracing::warn!(
                        credential_account = %account,
                        blob_account = %blob.account(),
                        "Shared key account does not match the blob account"
                    );
                }
                builder
                    .with_account(account.clone())
                    .with_access_key(key.clone())
                    .with_endpoint(endpoint.clone())
            }
            StorageCredential::Sas(sas) => {
                let pairs: Vec<(String, String)> = url::form_urlencoded::parse(sas.as_bytes())
                    .into_owned()
                    .collect();
                builder
                    .with_account(blob.account().to_string())
                    .with_sas_authorization(pairs)
                    .with_endpoint(endpoint.clone())
            }
        };

        if blob.style() == EndpointStyle::PathStyle || endpoint.starts_with("http://") {
            builder = builder.with_allow_http(true);
        }

        builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))
    }
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    async fn download(&self, blob: &BlobLocator) -> StorageResult<Bytes> {
        let start = std::time::Instant::now();
        let client = self.client_for(blob)?;
        let location = blob.object_path()?;

        let result: ObjectResult<_> = client.get_opts(&location, GetOptions::default()).await;

        let result = result.map_err(|e| match e {
            ObjectStoreError::NotFound { .. } => StorageError::NotFound(blob.to_string()),
            other => {
                tracing::error!(
                    error = %other,
                    account = %blob.account(),
                    container = %blob.container(),
                    blob = %blob.blob_name(),
                    credential = self.credential.kind(),
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "Azure download failed"
                );
                StorageError::DownloadFailed(other.to_string())
            }
        })?;

        let bytes = result
            .bytes()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

        tracing::info!(
            account = %blob.account(),
            container = %blob.container(),
            blob = %blob.blob_name(),
            size_bytes = bytes.len() as u64,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Azure download successful"
        );

        Ok(bytes)
    }

    async fn upload(
        &self,
        blob: &BlobLocator,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let client = self.client_for(blob)?;
        let location = blob.object_path()?;
        let size = data.len() as u64;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            mode: PutMode::Overwrite,
            attributes,
            ..Default::default()
        };

        let result: ObjectResult<_> = client
            .put_opts(&location, PutPayload::from(data), options)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                account = %blob.account(),
                container = %blob.container(),
                blob = %blob.blob_name(),
                credential = self.credential.kind(),
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Azure upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            account = %blob.account(),
            container = %blob.container(),
            blob = %blob.blob_name(),
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Azure upload successful"
        );

        Ok(())
    }
}
