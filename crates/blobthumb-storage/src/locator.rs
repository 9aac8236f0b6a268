//! Blob addressing
//!
//! A `BlobLocator` is a parsed blob URL: the account, the container and the
//! blob name within that container.

use crate::traits::{StorageError, StorageResult};
use std::fmt;
use url::Url;

/// How the account is encoded in a blob URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointStyle {
    /// `https://{account}.blob.{suffix}/{container}/{blob}`
    VirtualHosted,
    /// `http://{host}:{port}/{account}/{container}/{blob}`
    PathStyle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobLocator {
    url: Url,
    account: String,
    container: String,
    blob_name: String,
    // Blob name as it appears in the URL (still percent-encoded)
    raw_blob_path: String,
    style: EndpointStyle,
}

impl BlobLocator {
    /// Parse an absolute blob URL.
    pub fn parse(raw: &str) -> StorageResult<Self> {
        let invalid = |reason: &str| StorageError::InvalidUrl {
            url: raw.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;
        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(invalid("scheme must be http or https"));
        }
        let host = url
            .host_str()
            .ok_or_else(|| invalid("missing host"))?
            .to_string();

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.collect())
            .unwrap_or_default();

        let (style, account, rest) = match host.split_once('.') {
            Some((account, suffix)) if !account.is_empty() && suffix.starts_with("blob.") => {
                (EndpointStyle::VirtualHosted, account.to_string(), &segments[..])
            }
            _ => {
                let (account, rest) = segments
                    .split_first()
                    .filter(|(account, _)| !account.is_empty())
                    .ok_or_else(|| invalid("missing account segment"))?;
                (EndpointStyle::PathStyle, account.to_string(), rest)
            }
        };

        let (container, blob_parts) = rest
            .split_first()
            .filter(|(container, _)| !container.is_empty())
            .ok_or_else(|| invalid("missing container segment"))?;

        let raw_blob_path = blob_parts.join("/");
        if raw_blob_path.is_empty() || raw_blob_path.ends_with('/') {
            return Err(invalid("missing blob name"));
        }

        let blob_name = urlencoding::decode(&raw_blob_path)
            .map_err(|e| invalid(&format!("blob name is not valid UTF-8: {}", e)))?
            .into_owned();

        Ok(BlobLocator {
            container: container.to_string(),
            url,
            account,
            blob_name,
            raw_blob_path,
            style,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    /// Blob name relative to its container, percent-decoded
    pub fn blob_name(&self) -> &str {
        &self.blob_name
    }

    pub fn style(&self) -> EndpointStyle {
        self.style
    }

    /// Lower-case extension of the blob name including the leading dot,
    /// or an empty string when the name has none.
    pub fn extension(&self) -> String {
        let file_name = self.blob_name.rsplit('/').next().unwrap_or(&self.blob_name);
        match file_name.rfind('.') {
            Some(idx) if idx + 1 < file_name.len() => file_name[idx..].to_lowercase(),
            _ => String::new(),
        }
    }

    /// The same blob name in another container of the same account.
    ///
    /// Only the container segment of the path changes; host, blob name, query
    /// and fragment are kept as they are.
    pub fn with_container(&self, container: &str) -> BlobLocator {
        let path = match self.style {
            EndpointStyle::VirtualHosted => format!("/{}/{}", container, self.raw_blob_path),
            EndpointStyle::PathStyle => {
                format!("/{}/{}/{}", self.account, container, self.raw_blob_path)
            }
        };

        let mut url = self.url.clone();
        url.set_path(&path);

        BlobLocator {
            url,
            container: container.to_string(),
            ..self.clone()
        }
    }

    /// Base URL of the blob service for this account, without the container.
    pub fn service_endpoint(&self) -> String {
        let mut endpoint = format!(
            "{}://{}",
            self.url.scheme(),
            self.url.host_str().unwrap_or_default()
        );
        if let Some(port) = self.url.port() {
            endpoint.push_str(&format!(":{}", port));
        }
        if self.style == EndpointStyle::PathStyle {
            endpoint.push('/');
            endpoint.push_str(&self.account);
        }
        endpoint
    }

    /// The blob name as an object_store path, taken verbatim.
    ///
    /// Clients percent-encode the path when building the request, so the
    /// decoded name must not be escaped here as well.
    #[cfg(any(feature = "storage-azure", feature = "storage-memory"))]
    pub(crate) fn object_path(&self) -> StorageResult<object_store::path::Path> {
        object_store::path::Path::parse(&self.blob_name).map_err(|e| StorageError::InvalidUrl {
            url: self.url.to_string(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for BlobLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url)
    }
}
