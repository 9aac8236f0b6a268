//! Storage connection strings and credentials

use crate::traits::{StorageError, StorageResult};
use std::fmt;
use std::str::FromStr;

/// Credential used to sign blob requests
#[derive(Clone, PartialEq, Eq)]
pub enum StorageCredential {
    /// Account name + base64 account key
    SharedKey { account: String, key: String },
    /// Shared access signature query string (without the leading `?`)
    Sas(String),
    /// Local storage emulator (Azurite) with its well-known account
    Emulator,
}

impl StorageCredential {
    pub fn shared_key(account: impl Into<String>, key: impl Into<String>) -> Self {
        StorageCredential::SharedKey {
            account: account.into(),
            key: key.into(),
        }
    }

    /// Short label for logs; never contains secret material.
    pub fn kind(&self) -> &'static str {
        match self {
            StorageCredential::SharedKey { .. } => "shared_key",
            StorageCredential::Sas(_) => "sas",
            StorageCredential::Emulator => "emulator",
        }
    }
}

impl fmt::Debug for StorageCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageCredential::SharedKey { account, .. } => f
                .debug_struct("SharedKey")
                .field("account", account)
                .field("key", &"<redacted>")
                .finish(),
            StorageCredential::Sas(_) => f.write_str("Sas(<redacted>)"),
            StorageCredential::Emulator => f.write_str("Emulator"),
        }
    }
}

/// Parsed `Key=Value;Key=Value` storage connection string
///
/// Unknown keys (queue/table endpoints and the like) are ignored.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionString {
    pub account_name: Option<String>,
    pub account_key: Option<String>,
    pub shared_access_signature: Option<String>,
    pub blob_endpoint: Option<String>,
    pub default_endpoints_protocol: Option<String>,
    pub endpoint_suffix: Option<String>,
    pub use_development_storage: bool,
}

impl ConnectionString {
    /// Resolve the credential this connection string carries.
    ///
    /// The emulator flag wins, then an account key, then a SAS token.
    pub fn credential(&self) -> StorageResult<StorageCredential> {
        if self.use_development_storage {
            return Ok(StorageCredential::Emulator);
        }

        if let Some(key) = &self.account_key {
            let account = self.account_name.clone().ok_or_else(|| {
                StorageError::ConfigError(
                    "connection string has AccountKey but no AccountName".to_string(),
                )
            })?;
            return Ok(StorageCredential::shared_key(account, key.clone()));
        }

        if let Some(sas) = &self.shared_access_signature {
            return Ok(StorageCredential::Sas(sas.trim_start_matches('?').to_string()));
        }

        Err(StorageError::ConfigError(
            "connection string carries no credential (AccountKey, SharedAccessSignature or UseDevelopmentStorage)"
                .to_string(),
        ))
    }

    /// Blob service endpoint implied by the connection string, if any.
    pub fn blob_service_endpoint(&self) -> Option<String> {
        if let Some(endpoint) = &self.blob_endpoint {
            return Some(endpoint.trim_end_matches('/').to_string());
        }
        let account = self.account_name.as_ref()?;
        let protocol = self.default_endpoints_protocol.as_deref().unwrap_or("https");
        let suffix = self.endpoint_suffix.as_deref().unwrap_or("core.windows.net");
        Some(format!("{}://{}.blob.{}", protocol, account, suffix))
    }
}

impl FromStr for ConnectionString {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parsed = ConnectionString::default();

        for pair in s.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                StorageError::ConfigError(format!(
                    "malformed connection string segment (expected Key=Value): '{}'",
                    pair.split('=').next().unwrap_or_default()
                ))
            })?;
            let value = value.trim().to_string();

            match key.trim().to_ascii_lowercase().as_str() {
                "accountname" => parsed.account_name = Some(value),
                "accountkey" => parsed.account_key = Some(value),
                "sharedaccesssignature" => parsed.shared_access_signature = Some(value),
                "blobendpoint" => parsed.blob_endpoint = Some(value),
                "defaultendpointsprotocol" => parsed.default_endpoints_protocol = Some(value),
                "endpointsuffix" => parsed.endpoint_suffix = Some(value),
                "usedevelopmentstorage" => {
                    parsed.use_development_storage = value.eq_ignore_ascii_case("true")
                }
                _ => {}
            }
        }

        Ok(parsed)
    }
}

impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionString")
            .field("account_name", &self.account_name)
            .field("account_key", &self.account_key.as_ref().map(|_| "<redacted>"))
            .field(
                "shared_access_signature",
                &self.shared_access_signature.as_ref().map(|_| "<redacted>"),
            )
            .field("blob_endpoint", &self.blob_endpoint)
            .field("endpoint_suffix", &self.endpoint_suffix)
            .field("use_development_storage", &self.use_development_storage)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_account_key_connection_string() {
        let cs: ConnectionString = "DefaultEndpointsProtocol=https;AccountName=imagesacct;AccountKey=bXlrZXk=;EndpointSuffix=core.windows.net"
            .parse()
            .unwrap();
        assert_eq!(cs.account_name.as_deref(), Some("imagesacct"));
        // Base64 padding survives the Key=Value split
        assert_eq!(cs.account_key.as_deref(), Some("bXlrZXk="));
        assert_eq!(
            cs.credential().unwrap(),
            StorageCredential::shared_key("imagesacct", "bXlrZXk=")
        );
        assert_eq!(
            cs.blob_service_endpoint().as_deref(),
            Some("https://imagesacct.blob.core.windows.net")
        );
    }

    #[test]
    fn development_storage_uses_emulator() {
        let cs: ConnectionString = "UseDevelopmentStorage=true".parse().unwrap();
        assert_eq!(cs.credential().unwrap(), StorageCredential::Emulator);
    }

    #[test]
    fn sas_connection_string() {
        let cs: ConnectionString =
            "BlobEndpoint=https://acct.blob.core.windows.net/;SharedAccessSignature=?sv=2022-11-02&sig=abc"
                .parse()
                .unwrap();
        assert_eq!(
            cs.credential().unwrap(),
            StorageCredential::Sas("sv=2022-11-02&sig=abc".to_string())
        );
        assert_eq!(
            cs.blob_service_endpoint().as_deref(),
            Some("https://acct.blob.core.windows.net")
        );
    }

    #[test]
    fn keys_are_case_insensitive_and_unknown_keys_ignored() {
        let cs: ConnectionString =
            "accountname=a;ACCOUNTKEY=k;QueueEndpoint=https://a.queue.core.windows.net;"
                .parse()
                .unwrap();
        assert_eq!(cs.credential().unwrap(), StorageCredential::shared_key("a", "k"));
    }

    #[test]
    fn rejects_missing_credentials() {
        let cs: ConnectionString = "AccountName=a".parse().unwrap();
        assert!(matches!(cs.credential(), Err(StorageError::ConfigError(_))));

        let cs: ConnectionString = "AccountKey=k".parse().unwrap();
        assert!(matches!(cs.credential(), Err(StorageError::ConfigError(_))));
    }

    #[test]
    fn rejects_malformed_segment() {
        let err = "AccountName=a;garbage".parse::<ConnectionString>().unwrap_err();
        assert!(err.to_string().contains("garbage"));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let cs: ConnectionString = "AccountName=a;AccountKey=c2VjcmV0".parse().unwrap();
        assert!(!format!("{:?}", cs).contains("c2VjcmV0"));
        let cred = cs.credential().unwrap();
        assert!(!format!("{:?}", cred).contains("c2VjcmV0"));
        assert_eq!(cred.kind(), "shared_key");
    }
}
