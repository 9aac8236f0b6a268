//! Event Grid storage events

use serde::{Deserialize, Serialize};

/// Event type published by Azure Storage when a blob is created.
pub const BLOB_CREATED_EVENT: &str = "Microsoft.Storage.BlobCreated";

/// The notification that triggers one pipeline invocation.
///
/// Accepts the Event Grid schema (`eventType`) as well as the CloudEvents
/// schema (`type`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEvent {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(alias = "type")]
    pub event_type: String,
    #[serde(default)]
    pub event_time: Option<String>,
    pub data: BlobCreatedData,
}

/// Payload of a `Microsoft.Storage.BlobCreated` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobCreatedData {
    pub url: String,
    #[serde(default)]
    pub api: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub content_length: Option<u64>,
    #[serde(default)]
    pub blob_type: Option<String>,
}

impl SourceEvent {
    /// Build a minimal blob-created event for the given URL.
    pub fn blob_created(url: impl Into<String>) -> Self {
        SourceEvent {
            id: None,
            topic: None,
            subject: None,
            event_type: BLOB_CREATED_EVENT.to_string(),
            event_time: None,
            data: BlobCreatedData {
                url: url.into(),
                api: None,
                content_type: None,
                content_length: None,
                blob_type: None,
            },
        }
    }

    pub fn url(&self) -> &str {
        &self.data.url
    }

    /// Only "created" notifications are acted on.
    pub fn is_blob_created(&self) -> bool {
        self.event_type.eq_ignore_ascii_case(BLOB_CREATED_EVENT)
    }
}
