//! Thumbnail pipeline
//!
//! One invocation handles one blob-created event: resolve the source and
//! destination blobs, pick the encoder from the extension, download, resize,
//! and publish under the same blob name in the thumbnail container.

use std::sync::Arc;
use std::time::Instant;

use blobthumb_core::{LogLevel, PipelineConfig, PipelineError, PipelineResult, SourceEvent};
use blobthumb_processing::{EncoderChoice, ThumbnailTransformer};
use blobthumb_storage::{create_fetch_store, create_publish_store, BlobLocator, BlobStore};
use serde::Serialize;

/// What an invocation did with its event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// A thumbnail was written to the destination container
    Published {
        source: String,
        destination: String,
        content_type: String,
        width: u32,
        height: u32,
        size_bytes: usize,
    },
    /// The extension has no encoder; nothing was downloaded or written
    Skipped { source: String, extension: String },
    /// Not a blob-created notification
    Ignored { event_type: String },
}

impl Outcome {
    /// One-line summary for invocation logs
    pub fn summary(&self) -> String {
        match self {
            Outcome::Published {
                destination,
                width,
                height,
                ..
            } => format!("Published {}x{} thumbnail to {}", width, height, destination),
            Outcome::Skipped { source, extension } => {
                format!("No encoder support for '{}': {}", extension, source)
            }
            Outcome::Ignored { event_type } => format!("Ignored event of type {}", event_type),
        }
    }
}

/// Source and destination of one event
#[derive(Debug, Clone)]
pub struct ResolvedBlob {
    pub source: BlobLocator,
    pub destination: BlobLocator,
    pub extension: String,
}

pub struct ThumbnailPipeline {
    config: PipelineConfig,
    fetch_store: Arc<dyn BlobStore>,
    publish_store: Arc<dyn BlobStore>,
}

impl ThumbnailPipeline {
    pub fn new(
        config: PipelineConfig,
        fetch_store: Arc<dyn BlobStore>,
        publish_store: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            config,
            fetch_store,
            publish_store,
        }
    }

    /// Build the Azure-backed pipeline for a resolved configuration
    pub fn from_config(config: PipelineConfig) -> PipelineResult<Self> {
        let fetch_store = create_fetch_store(&config)?;
        let publish_store = create_publish_store(&config)?;
        Ok(Self::new(config, fetch_store, publish_store))
    }

    /// Resolve configuration from the environment and build the pipeline
    pub fn from_env() -> PipelineResult<Self> {
        Self::from_config(PipelineConfig::from_env()?)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Parse the event URL and derive the thumbnail destination.
    ///
    /// The source must live in the configured image container; only the
    /// container segment differs between source and destination.
    pub fn resolve(&self, url: &str) -> PipelineResult<ResolvedBlob> {
        let source = BlobLocator::parse(url)?;

        if source.container() != self.config.source_container {
            return Err(PipelineError::ContainerMismatch {
                url: url.to_string(),
                expected: self.config.source_container.clone(),
            });
        }

        let destination = source.with_container(&self.config.destination_container);
        let extension = source.extension();

        Ok(ResolvedBlob {
            source,
            destination,
            extension,
        })
    }

    /// Handle one event, logging a failure at its level before returning it.
    pub async fn handle(&self, event: &SourceEvent) -> PipelineResult<Outcome> {
        let result = self.process(event).await;

        if let Err(e) = &result {
            match e.log_level() {
                LogLevel::Warn => tracing::warn!(
                    error = %e,
                    error_code = e.error_code(),
                    url = %event.url(),
                    "Thumbnail not created"
                ),
                LogLevel::Error => tracing::error!(
                    error = %e,
                    error_code = e.error_code(),
                    recoverable = e.is_recoverable(),
                    url = %event.url(),
                    "Thumbnail pipeline failed"
                ),
            }
        }

        result
    }

    async fn process(&self, event: &SourceEvent) -> PipelineResult<Outcome> {
        if !event.is_blob_created() {
            tracing::info!(event_type = %event.event_type, "Ignoring event");
            return Ok(Outcome::Ignored {
                event_type: event.event_type.clone(),
            });
        }

        let url = event.url();
        tracing::info!(url = %url, "Blob created");

        let resolved = self.resolve(url)?;

        let format = match EncoderChoice::from_extension(&resolved.extension).format() {
            Some(format) => format,
            None => {
                tracing::info!(
                    url = %url,
                    extension = %resolved.extension,
                    "No encoder support for file extension"
                );
                return Ok(Outcome::Skipped {
                    source: url.to_string(),
                    extension: resolved.extension,
                });
            }
        };

        let start = Instant::now();
        let data = self.fetch_store.download(&resolved.source).await?;
        tracing::info!(
            url = %url,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Resizing image"
        );

        let target_width = self.config.thumbnail_width;
        let label = url.to_string();
        let thumbnail = tokio::task::spawn_blocking(move || {
            ThumbnailTransformer::create_thumbnail(&data, &label, target_width, format)
        })
        .await
        .map_err(|e| PipelineError::Internal(format!("Thumbnail task failed: {}", e)))??;

        tracing::info!(
            destination = %resolved.destination,
            width = thumbnail.width,
            height = thumbnail.height,
            size_bytes = thumbnail.data.len(),
            "Uploading thumbnail"
        );

        let size_bytes = thumbnail.data.len();
        let content_type = thumbnail.content_type();
        let start = Instant::now();
        self.publish_store
            .upload(&resolved.destination, thumbnail.data, content_type)
            .await?;

        tracing::info!(
            destination = %resolved.destination,
            duration_ms = start.elapsed().as_millis() as u64,
            "Thumbnail published"
        );

        Ok(Outcome::Published {
            source: url.to_string(),
            destination: resolved.destination.to_string(),
            content_type: content_type.to_string(),
            width: thumbnail.width,
            height: thumbnail.height,
            size_bytes,
        })
    }
}
