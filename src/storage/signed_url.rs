//! # Signed-URL Issuer
//!
//! Issues write URLs for drawing uploads and read URLs handed to the remote
//! API, and recovers object keys from signed URLs clients send back.

use percent_encoding::percent_decode_str;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{BlobStore, SignedAccess};
use crate::config::StorageConfig;
use crate::error::{AutomationError, AutomationResult};

/// A freshly issued upload target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLocation {
    pub key: String,
    pub url: String,
}

pub struct SignedUrlIssuer {
    store: Arc<dyn BlobStore>,
    config: StorageConfig,
}

impl SignedUrlIssuer {
    pub fn new(store: Arc<dyn BlobStore>, config: StorageConfig) -> Self {
        Self { store, config }
    }

    /// Key for a new drawing: `<upload_prefix><uuid-v4>/<drawing name>`
    pub fn upload_key(&self, drawing_name: &str) -> String {
        format!(
            "{}{}/{}",
            self.config.upload_prefix,
            Uuid::new_v4(),
            drawing_name
        )
    }

    /// Issue a signed write URL for a new drawing
    ///
    /// The drawing name arrives percent-encoded; a missing or empty name falls
    /// back to the configured default.
    pub async fn issue_upload_location(
        &self,
        drawing_name: Option<&str>,
    ) -> AutomationResult<UploadLocation> {
        let name = resolve_drawing_name(drawing_name, &self.config.default_drawing_name)?;
        let key = self.upload_key(&name);

        let url = self
            .store
            .presign(&key, SignedAccess::Write, self.config.signed_url_ttl())
            .await?;

        info!(key = %key, bucket = %self.store.bucket(), "Issued upload location");
        Ok(UploadLocation { key, url })
    }

    /// Issue a signed read URL for an existing object
    pub async fn issue_read_url(&self, key: &str) -> AutomationResult<String> {
        let url = self
            .store
            .presign(key, SignedAccess::Read, self.config.signed_url_ttl())
            .await?;
        debug!(key = %key, "Issued read URL");
        Ok(url)
    }

    /// Recover the object key from a signed URL using the configured marker
    pub fn object_key_from(&self, signed_url: &str) -> AutomationResult<String> {
        extract_object_key(signed_url, &self.config.bucket_domain_marker)
    }
}

fn resolve_drawing_name(raw: Option<&str>, default_name: &str) -> AutomationResult<String> {
    match raw.filter(|name| !name.is_empty()) {
        Some(encoded) => percent_decode_str(encoded)
            .decode_utf8()
            .map(|decoded| decoded.into_owned())
            .map_err(|e| {
                AutomationError::invalid_input(format!("drawing name is not valid UTF-8: {e}"))
            }),
        None => Ok(default_name.to_string()),
    }
}

/// Extract an object key from a signed URL
///
/// The key is everything after the first occurrence of `marker` up to (not
/// including) the first `?` that follows, percent-decoded. Stored objects were
/// keyed this way, so the rule stays string based; the URL parser only gates
/// obviously malformed input.
pub fn extract_object_key(signed_url: &str, marker: &str) -> AutomationResult<String> {
    if reqwest::Url::parse(signed_url).is_err() {
        return Err(AutomationError::invalid_input(
            "drawing location is not an absolute URL",
        ));
    }

    let Some(start) = signed_url.find(marker) else {
        warn!(marker = %marker, "Signed URL is missing the bucket marker");
        return Err(AutomationError::invalid_input(format!(
            "invalid pre-signed url: missing '{marker}'"
        )));
    };

    let after_marker = &signed_url[start + marker.len()..];
    let Some(end) = after_marker.find('?') else {
        return Err(AutomationError::invalid_input(
            "invalid pre-signed url: missing query string",
        ));
    };

    let raw_key = &after_marker[..end];
    if raw_key.is_empty() {
        return Err(AutomationError::invalid_input(
            "invalid pre-signed url: empty object key",
        ));
    }

    percent_decode_str(raw_key)
        .decode_utf8()
        .map(|key| key.into_owned())
        .map_err(|e| {
            AutomationError::invalid_input(format!("invalid pre-signed url: undecodable key: {e}"))
        })
}
