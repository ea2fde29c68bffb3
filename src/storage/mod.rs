//! # Blob Store
//!
//! Backend-agnostic blob store operations needed by the automation flow:
//! time-limited signed URLs and public object uploads. Backends that hold real
//! credentials implement [`BlobStore`]; [`MemoryBlobStore`] serves local
//! development and tests and is only used by the server when
//! `storage.backend = "memory"` is set.

pub mod memory;
pub mod signed_url;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

use crate::config::{BlobStoreBackend, StorageConfig};

pub use memory::{MemoryBlobStore, StoredObject};
pub use signed_url::{extract_object_key, SignedUrlIssuer, UploadLocation};

/// Blob store failures
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Bucket is not configured")]
    BucketNotConfigured,

    /// No `storage.backend` was selected
    #[error("Blob store backend is not configured")]
    BackendNotConfigured,

    #[error("Invalid object key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Upload of '{key}' failed: {reason}")]
    UploadFailed { key: String, reason: String },

    #[error("Signing '{key}' failed: {reason}")]
    SigningFailed { key: String, reason: String },
}

impl StorageError {
    pub fn upload_failed(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UploadFailed {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// What a signed URL grants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignedAccess {
    /// GET the object
    Read,
    /// PUT the object
    Write,
}

/// Visibility of an uploaded object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectAcl {
    Private,
    PublicRead,
}

/// Low-level blob store operations - implemented by each backend
#[async_trait]
pub trait BlobStore: Send + Sync {
    fn bucket(&self) -> &str;

    /// Time-limited URL granting `access` to one object
    async fn presign(
        &self,
        key: &str,
        access: SignedAccess,
        expires_in: Duration,
    ) -> StorageResult<String>;

    /// Upload bytes and return the object's public location
    async fn put_object(&self, key: &str, data: Vec<u8>, acl: ObjectAcl) -> StorageResult<String>;
}

/// Build the blob store selected by `storage.backend`
///
/// An unset backend is an error rather than a silent fallback to memory.
pub fn blob_store_from_config(config: &StorageConfig) -> StorageResult<Arc<dyn BlobStore>> {
    match config.backend {
        Some(BlobStoreBackend::Memory) => {
            warn!(
                bucket = %config.bucket,
                "Using the in-memory blob store: for development only, \
                 signed URLs it issues do not reach a real bucket"
            );
            Ok(Arc::new(MemoryBlobStore::new(config.bucket.clone())))
        }
        None => Err(StorageError::BackendNotConfigured),
    }
}
