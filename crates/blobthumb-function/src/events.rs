//! Event payload parsing shared by the host handler and the `run` command

use std::io::Write;

use anyhow::Result;
use blobthumb_core::{PipelineError, PipelineResult, SourceEvent};
use serde_json::Value;

use crate::pipeline::{Outcome, ThumbnailPipeline};

/// Counts for one `run` over an events document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub published: usize,
    pub failures: usize,
}

/// Parse a JSON document holding either one event or an array of events.
pub fn parse_events(json: &str) -> PipelineResult<Vec<SourceEvent>> {
    let value: Value =
        serde_json::from_str(json).map_err(|e| PipelineError::InvalidEvent(e.to_string()))?;

    match value {
        Value::Array(items) => items.into_iter().map(event_from_value).collect(),
        other => Ok(vec![event_from_value(other)?]),
    }
}

/// Decode one event from a JSON value.
///
/// Some hosts forward trigger payloads as a JSON-encoded string; those are
/// unwrapped first.
pub fn event_from_value(value: Value) -> PipelineResult<SourceEvent> {
    let value = match value {
        Value::String(text) => serde_json::from_str::<Value>(&text)
            .map_err(|e| PipelineError::InvalidEvent(e.to_string()))?,
        other => other,
    };

    serde_json::from_value(value).map_err(|e| PipelineError::InvalidEvent(e.to_string()))
}

/// Handle every event in `json` in order, writing each outcome to `out` as
/// one JSON line.
///
/// All events are attempted. Fails when any event failed; the pipeline has
/// already logged each failure.
pub async fn run_events<W: Write>(
    pipeline: &ThumbnailPipeline,
    json: &str,
    out: &mut W,
) -> Result<RunSummary> {
    let events = parse_events(json)?;
    let mut summary = RunSummary {
        total: events.len(),
        ..RunSummary::default()
    };

    for event in &events {
        match pipeline.handle(event).await {
            Ok(outcome) => {
                if matches!(outcome, Outcome::Published { .. }) {
                    summary.published += 1;
                }
                writeln!(out, "{}", serde_json::to_string(&outcome)?)?;
            }
            Err(_) => summary.failures += 1,
        }
    }

    tracing::info!(
        total = summary.total,
        published = summary.published,
        failures = summary.failures,
        "Run complete"
    );

    if summary.failures > 0 {
        anyhow::bail!("{} of {} events failed", summary.failures, summary.total);
    }
    Ok(summary)
}
