//! Blobthumb Core Library
//!
//! This crate provides the configuration, error taxonomy and event model
//! shared by every Blobthumb component.

pub mod config;
pub mod error;
pub mod event;

// Re-export commonly used types
pub use config::PipelineConfig;
pub use error::{LogLevel, PipelineError, PipelineResult};
pub use event::{BlobCreatedData, SourceEvent, BLOB_CREATED_EVENT};
