#![allow(dead_code)]

pub mod fixtures;

use blobthumb_core::PipelineConfig;
use blobthumb_function::{HostState, ThumbnailPipeline};
use blobthumb_storage::{BlobLocator, MemoryBlobStore, StoredBlob};
use std::sync::Arc;

pub const IMAGES_URL: &str = "https://imagesacct.blob.core.windows.net/images";
pub const THUMBNAILS_URL: &str = "https://imagesacct.blob.core.windows.net/thumbnails";

/// Pipeline over two in-memory stores, one per credential
pub struct TestPipeline {
    pub config: PipelineConfig,
    pub fetch: Arc<MemoryBlobStore>,
    pub publish: Arc<MemoryBlobStore>,
}

impl TestPipeline {
    pub fn new(thumbnail_width: u32) -> Self {
        let config = PipelineConfig::new(
            "images",
            "thumbnails",
            thumbnail_width,
            "imagesacct",
            "a2V5",
            "AccountName=imagesacct;AccountKey=a2V5",
        )
        .expect("valid test config");

        Self {
            config,
            fetch: Arc::new(MemoryBlobStore::new()),
            publish: Arc::new(MemoryBlobStore::new()),
        }
    }

    pub fn pipeline(&self) -> ThumbnailPipeline {
        ThumbnailPipeline::new(self.config.clone(), self.fetch.clone(), self.publish.clone())
    }

    /// Host state building a fresh pipeline over the same stores per invocation
    pub fn host_state(&self) -> HostState {
        let config = self.config.clone();
        let fetch = self.fetch.clone();
        let publish = self.publish.clone();
        HostState::new(move || {
            Ok(ThumbnailPipeline::new(
                config.clone(),
                fetch.clone(),
                publish.clone(),
            ))
        })
    }

    pub async fn seed_source(&self, name: &str, data: Vec<u8>) -> String {
        let url = format!("{}/{}", IMAGES_URL, name);
        self.fetch
            .insert(&locator(&url), data)
            .await
            .expect("seed source blob");
        url
    }

    pub async fn thumbnail(&self, name: &str) -> Option<StoredBlob> {
        let url = format!("{}/{}", THUMBNAILS_URL, name);
        self.publish
            .get(&locator(&url))
            .await
            .expect("read thumbnail")
    }
}

pub fn locator(url: &str) -> BlobLocator {
    BlobLocator::parse(url).expect("valid blob url")
}
