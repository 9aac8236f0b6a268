//! Blobthumb Storage Library
//!
//! This crate provides blob addressing and the blob store abstraction used by
//! the thumbnail pipeline, with an Azure Blob Storage backend and an
//! in-memory backend.
//!
//! # Blob URLs
//!
//! Blobs are addressed by their absolute URL, in either layout:
//!
//! - **Virtual-hosted**: `https://{account}.blob.core.windows.net/{container}/{blob}`
//! - **Path-style** (emulators): `http://127.0.0.1:10000/{account}/{container}/{blob}`
//!
//! `BlobLocator` parses both and is the only type the stores accept.

pub mod connection;
pub mod factory;
pub mod locator;
#[cfg(feature = "storage-azure")]
pub mod azure;
#[cfg(feature = "storage-memory")]
pub mod memory;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-azure")]
pub use azure::AzureBlobStore;
pub use connection::{ConnectionString, StorageCredential};
pub use factory::{create_fetch_store, create_publish_store};
pub use locator::{BlobLocator, EndpointStyle};
#[cfg(feature = "storage-memory")]
pub use memory::{MemoryBlobStore, StoredBlob};
pub use traits::{BlobStore, StorageError, StorageResult};
