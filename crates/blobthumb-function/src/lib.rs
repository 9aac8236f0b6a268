//! Blobthumb Function
//!
//! Hosts the thumbnail pipeline behind the Azure Functions custom handler
//! protocol, plus a one-shot mode that replays events from a file.

pub mod events;
pub mod host;
pub mod pipeline;
pub mod telemetry;

pub use events::{event_from_value, parse_events, run_events, RunSummary};
pub use host::{router, HostState, InvocationRequest, InvocationResponse, FUNCTION_NAME};
pub use pipeline::{Outcome, ResolvedBlob, ThumbnailPipeline};
pub use telemetry::init_tracing;
