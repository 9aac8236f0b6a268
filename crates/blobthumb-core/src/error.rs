//! Error types module
//!
//! Every fatal condition of a pipeline invocation is a `PipelineError`.
//! An unsupported file extension is not an error; it is reported as a skipped
//! outcome by the pipeline.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected rejections of the input (bad event or URL, upscaling)
    Warn,
    /// Unexpected failures
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error("Invalid source URL '{url}': {reason}")]
    InvalidSourceUrl { url: String, reason: String },

    #[error("Source URL '{url}' is not in container '{expected}'")]
    ContainerMismatch { url: String, expected: String },

    #[error("Failed to decode image '{url}': {message}")]
    Decode { url: String, message: String },

    #[error("Failed to encode thumbnail as {format}: {message}")]
    Encode { format: String, message: String },

    #[error(
        "Upscaling not supported: target width {target_width}px is not smaller than source width {source_width}px"
    )]
    UpscaleUnsupported { source_width: u32, target_width: u32 },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    /// Machine-readable error code (e.g., "DECODE_ERROR")
    pub fn error_code(&self) -> &'static str {
        match self {
            PipelineError::Configuration(_) => "CONFIGURATION_ERROR",
            PipelineError::InvalidEvent(_) => "INVALID_EVENT",
            PipelineError::InvalidSourceUrl { .. } => "INVALID_SOURCE_URL",
            PipelineError::ContainerMismatch { .. } => "CONTAINER_MISMATCH",
            PipelineError::Decode { .. } => "DECODE_ERROR",
            PipelineError::Encode { .. } => "ENCODE_ERROR",
            PipelineError::UpscaleUnsupported { .. } => "UPSCALE_UNSUPPORTED",
            PipelineError::Transport(_) => "TRANSPORT_ERROR",
            PipelineError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether redelivering the same event could succeed.
    ///
    /// Only transport failures depend on anything outside the event itself.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, PipelineError::Transport(_))
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            PipelineError::InvalidEvent(_)
            | PipelineError::InvalidSourceUrl { .. }
            | PipelineError::ContainerMismatch { .. }
            | PipelineError::UpscaleUnsupported { .. } => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}
