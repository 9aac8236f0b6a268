//! Azure Functions custom handler host
//!
//! The functions host forwards each trigger to `POST /{function}` with the
//! binding data under `Data` and answers with the `Outputs`/`Logs`/`ReturnValue`
//! envelope. A non-2xx status marks the invocation as failed.

use std::sync::Arc;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use blobthumb_core::{PipelineError, PipelineResult, SourceEvent};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::Instrument;

use crate::events::event_from_value;
use crate::pipeline::ThumbnailPipeline;

/// Function name, and therefore route, registered with the host
pub const FUNCTION_NAME: &str = "Thumbnail";

/// Name of the Event Grid trigger binding in `function.json`
pub const EVENT_BINDING: &str = "eventGridEvent";

const INVOCATION_ID_HEADER: &str = "x-azure-functions-invocationid";

type PipelineFactory = dyn Fn() -> PipelineResult<ThumbnailPipeline> + Send + Sync;

/// Shared handler state.
///
/// A pipeline is built per invocation so configuration is re-read each time.
#[derive(Clone)]
pub struct HostState {
    factory: Arc<PipelineFactory>,
}

impl HostState {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> PipelineResult<ThumbnailPipeline> + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
        }
    }

    /// Pipelines configured from the process environment
    pub fn from_env() -> Self {
        Self::new(ThumbnailPipeline::from_env)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvocationRequest {
    #[serde(rename = "Data", default)]
    pub data: Map<String, Value>,
    #[serde(rename = "Metadata", default)]
    pub metadata: Map<String, Value>,
}

impl InvocationRequest {
    /// Decode a request body; anything that is not the host envelope is an
    /// invalid event.
    pub fn from_slice(body: &[u8]) -> PipelineResult<Self> {
        serde_json::from_slice(body).map_err(|e| PipelineError::InvalidEvent(e.to_string()))
    }

    /// The trigger event, taken from the `eventGridEvent` binding or, failing
    /// that, from the only binding present.
    pub fn event(&self) -> PipelineResult<SourceEvent> {
        let value = match self.data.get(EVENT_BINDING) {
            Some(value) => value.clone(),
            None if self.data.len() == 1 => self.data.values().next().cloned().unwrap_or_default(),
            None => {
                return Err(PipelineError::InvalidEvent(format!(
                    "invocation data has no '{}' binding",
                    EVENT_BINDING
                )))
            }
        };
        event_from_value(value)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvocationResponse {
    #[serde(rename = "Outputs")]
    pub outputs: Map<String, Value>,
    #[serde(rename = "Logs")]
    pub logs: Vec<String>,
    #[serde(rename = "ReturnValue")]
    pub return_value: Option<Value>,
}

impl InvocationResponse {
    fn with_log(line: String) -> Self {
        Self {
            logs: vec![line],
            ..Self::default()
        }
    }

    fn failure(err: &PipelineError) -> Self {
        Self::with_log(format!("{}: {}", err.error_code(), err))
    }
}

pub fn router(state: HostState) -> Router {
    Router::new()
        .route(&format!("/{}", FUNCTION_NAME), post(invoke))
        .with_state(state)
}

async fn invoke(
    State(state): State<HostState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<InvocationResponse>) {
    let invocation_id = headers
        .get(INVOCATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let span = tracing::info_span!("invocation", function = FUNCTION_NAME, invocation_id = %invocation_id);

    async move {
        let event = match InvocationRequest::from_slice(&body).and_then(|r| r.event()) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!(error = %e, "Rejected invocation payload");
                return (StatusCode::BAD_REQUEST, Json(InvocationResponse::failure(&e)));
            }
        };

        let pipeline = match (state.factory)() {
            Ok(pipeline) => pipeline,
            Err(e) => {
                tracing::error!(error = %e, error_code = e.error_code(), "Pipeline setup failed");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(InvocationResponse::failure(&e)),
                );
            }
        };

        match pipeline.handle(&event).await {
            Ok(outcome) => (
                StatusCode::OK,
                Json(InvocationResponse::with_log(outcome.summary())),
            ),
            Err(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(InvocationResponse::failure(&e)),
            ),
        }
    }
    .instrument(span)
    .await
}

/// Serve the custom handler until Ctrl+C or SIGTERM
pub async fn serve(state: HostState, port: u16) -> Result<()> {
    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, function = FUNCTION_NAME, "Custom handler listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
///
/// The functions host sends SIGTERM when it recycles the worker. Once this
/// resolves the listener stops accepting invocations and in-flight ones run
/// to completion.
///
/// # Panics
/// - Panics if the Ctrl+C or SIGTERM handler cannot be installed
async fn shutdown_signal() {
    let interrupt = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        "SIGINT"
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
        "SIGTERM"
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    let signal = tokio::select! {
        signal = interrupt => signal,
        signal = terminate => signal,
    };

    tracing::info!(signal, "Draining in-flight invocations before exit");
}
