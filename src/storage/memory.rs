//! In-memory blob store.
//!
//! Produces URLs shaped like the hosted store's (`https://<bucket>.s3.amazonaws.com/<key>`)
//! so signed URLs it issues round-trip through key extraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use super::{BlobStore, ObjectAcl, SignedAccess, StorageError, StorageResult};

/// Characters left untouched when encoding one key segment
const KEY_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a key, keeping `/` as the segment separator
pub(crate) fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| utf8_percent_encode(segment, KEY_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Vec<u8>,
    pub acl: ObjectAcl,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct MemoryBlobStore {
    bucket: String,
    endpoint: String,
    objects: DashMap<String, StoredObject>,
}

impl MemoryBlobStore {
    pub fn new(bucket: impl Into<String>) -> Self {
        let bucket = bucket.into();
        let endpoint = format!("https://{bucket}.s3.amazonaws.com");
        Self::with_endpoint(bucket, endpoint)
    }

    pub fn with_endpoint(bucket: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            objects: DashMap::new(),
        }
    }

    pub fn object_url(&self, key: &str) -> String {
        format!("{}/{}", self.endpoint, encode_key(key))
    }

    pub fn get_object(&self, key: &str) -> Option<StoredObject> {
        self.objects.get(key).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    /// All keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn check_key(&self, key: &str) -> StorageResult<()> {
        if self.bucket.is_empty() {
            return Err(StorageError::BucketNotConfigured);
        }
        if key.is_empty() {
            return Err(StorageError::invalid_key(key, "object keys cannot be empty"));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn presign(
        &self,
        key: &str,
        access: SignedAccess,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.check_key(key)?;

        let method = match access {
            SignedAccess::Read => "GET",
            SignedAccess::Write => "PUT",
        };

        Ok(format!(
            "{}?X-Amz-Method={}&X-Amz-Expires={}&X-Amz-Signature={}",
            self.object_url(key),
            method,
            expires_in.as_secs(),
            Uuid::new_v4().simple()
        ))
    }

    async fn put_object(&self, key: &str, data: Vec<u8>, acl: ObjectAcl) -> StorageResult<String> {
        self.check_key(key)?;

        debug!(bucket = %self.bucket, key = %key, bytes = data.len(), "Storing object");
        self.objects.insert(
            key.to_string(),
            StoredObject {
                data,
                acl,
                uploaded_at: Utc::now(),
            },
        );

        Ok(self.object_url(key))
    }
}
