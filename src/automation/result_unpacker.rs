//! # Result Unpacker
//!
//! Downloads a work item's result archive and uploads every entry to the blob
//! store under a fresh prefix.
//!
//! ```text
//! archive bytes → [blocking zip decoder] → entry channel → upload tasks → OutputSetBuilder
//! ```
//!
//! The decoder runs on a blocking thread, walks the archive's central directory
//! and hands entries over a bounded channel as it reads them. Each entry
//! becomes its own upload task (bounded by a semaphore); tasks classify their
//! uploaded location as they finish and decrement a shared in-flight counter.
//! The output set is released once the decoder is done and the counter is back
//! at zero.
//!
//! The first failed upload aborts all sibling uploads, closes the channel (which
//! stops the decoder) and fails the whole unpack with a partial-failure error.

use parking_lot::Mutex;
use std::io::{Cursor, Read};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};
use zip::ZipArchive;

use crate::error::{AutomationError, AutomationResult};
use crate::models::{ExtractedOutputSet, OutputSetBuilder};
use crate::storage::{BlobStore, ObjectAcl};
use crate::transport::HttpTransport;

/// Decoded entries waiting for an upload task
const ENTRY_CHANNEL_CAPACITY: usize = 8;

/// One file read out of the archive
#[derive(Debug)]
struct ArchiveEntry {
    path: String,
    contents: Vec<u8>,
}

/// Normalize an archive entry path
///
/// Only the first backslash becomes a forward slash; archives produced by the
/// remote job nest at most one folder deep.
pub fn normalize_entry_path(path: &str) -> String {
    path.replacen('\\', "/", 1)
}

pub struct ResultUnpacker {
    transport: Arc<dyn HttpTransport>,
    store: Arc<dyn BlobStore>,
    max_concurrent_uploads: usize,
}

impl std::fmt::Debug for ResultUnpacker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultUnpacker")
            .field("bucket", &self.store.bucket())
            .field("max_concurrent_uploads", &self.max_concurrent_uploads)
            .finish()
    }
}

impl ResultUnpacker {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        store: Arc<dyn BlobStore>,
        max_concurrent_uploads: usize,
    ) -> Self {
        Self {
            transport,
            store,
            max_concurrent_uploads: max_concurrent_uploads.max(1),
        }
    }

    /// Download the archive at `archive_url` and unpack it under `prefix`
    #[instrument(skip(self, archive_url))]
    pub async fn unpack(
        &self,
        archive_url: &str,
        prefix: &str,
    ) -> AutomationResult<ExtractedOutputSet> {
        let archive = self
            .transport
            .download(archive_url, "download result archive")
            .await?;
        debug!(bytes = archive.len(), "Downloaded result archive");

        self.unpack_archive(archive, prefix).await
    }

    /// Unpack archive bytes already in memory under `prefix`
    pub async fn unpack_archive(
        &self,
        archive: Vec<u8>,
        prefix: &str,
    ) -> AutomationResult<ExtractedOutputSet> {
        let (entry_tx, mut entry_rx) = mpsc::channel(ENTRY_CHANNEL_CAPACITY);
        let decoder = tokio::task::spawn_blocking(move || decode_entries(archive, entry_tx));

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_uploads));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let outputs = Arc::new(Mutex::new(OutputSetBuilder::new()));
        let mut uploads: JoinSet<AutomationResult<()>> = JoinSet::new();
        let mut decoding = true;

        loop {
            // Only successful uploads decrement the counter; failures stay
            // in flight until they are joined below.
            if !decoding && in_flight.load(Ordering::Acquire) == 0 {
                break;
            }

            tokio::select! {
                entry = entry_rx.recv(), if decoding => match entry {
                    Some(entry) => {
                        in_flight.fetch_add(1, Ordering::AcqRel);
                        uploads.spawn(upload_entry(
                            entry,
                            prefix.to_string(),
                            self.store.clone(),
                            semaphore.clone(),
                            in_flight.clone(),
                            outputs.clone(),
                        ));
                    }
                    None => decoding = false,
                },
                Some(joined) = uploads.join_next() => {
                    let failure = match joined {
                        Ok(Ok(())) => None,
                        Ok(Err(e)) => Some(e),
                        Err(e) => Some(AutomationError::partial_failure(
                            prefix,
                            format!("upload task did not complete: {e}"),
                        )),
                    };

                    if let Some(e) = failure {
                        uploads.abort_all();
                        drop(entry_rx);
                        error!(
                            error = %e,
                            aborted = in_flight.load(Ordering::Acquire),
                            "Result upload failed, cancelled remaining uploads"
                        );
                        return Err(e);
                    }
                },
                else => break,
            }
        }

        let entries = decoder.await.map_err(|e| {
            AutomationError::invalid_response("decode result archive", e.to_string())
        })??;

        let set = std::mem::take(&mut *outputs.lock()).build();
        if set.primary.is_none() {
            warn!(entries, "Result archive contained no viewer payload");
        }
        info!(
            entries,
            uploaded = set.uploaded,
            primary = ?set.primary,
            custom_data = ?set.custom_data,
            "Unpacked result archive"
        );
        Ok(set)
    }
}

async fn upload_entry(
    entry: ArchiveEntry,
    prefix: String,
    store: Arc<dyn BlobStore>,
    semaphore: Arc<Semaphore>,
    in_flight: Arc<AtomicUsize>,
    outputs: Arc<Mutex<OutputSetBuilder>>,
) -> AutomationResult<()> {
    let key = format!("{prefix}{}", normalize_entry_path(&entry.path));

    let _permit = semaphore.acquire_owned().await.map_err(|_| {
        AutomationError::partial_failure(&key, "upload limiter closed")
    })?;

    let location = store
        .put_object(&key, entry.contents, ObjectAcl::PublicRead)
        .await
        .map_err(|e| AutomationError::partial_failure(&key, e.to_string()))?;

    let role = outputs.lock().record(&key, &location);
    let remaining = in_flight.fetch_sub(1, Ordering::AcqRel) - 1;
    debug!(key = %key, role = ?role, remaining, "Uploaded result entry");
    Ok(())
}

/// Read entries off the archive and hand them to the upload side
///
/// Entries are located through the central directory, so archives written by
/// streaming writers (sizes in trailing data descriptors) decode as well.
/// Stops early, without error, once the receiving side has gone away.
fn decode_entries(
    archive: Vec<u8>,
    entries: mpsc::Sender<ArchiveEntry>,
) -> AutomationResult<usize> {
    let operation = "decode result archive";
    let mut archive = ZipArchive::new(Cursor::new(archive))
        .map_err(|e| AutomationError::invalid_response(operation, e.to_string()))?;
    let mut count = 0;

    for index in 0..archive.len() {
        let mut file = archive
            .by_index(index)
            .map_err(|e| AutomationError::invalid_response(operation, e.to_string()))?;

        if file.is_dir() {
            continue;
        }

        let path = file.name().to_string();
        let mut contents = Vec::with_capacity(usize::try_from(file.size()).unwrap_or(0));
        file.read_to_end(&mut contents).map_err(|e| {
            AutomationError::invalid_response(operation, format!("entry '{path}': {e}"))
        })?;
        drop(file);

        if entries.blocking_send(ArchiveEntry { path, contents }).is_err() {
            debug!(count, "Upload side closed, stopped decoding");
            break;
        }
        count += 1;
    }

    Ok(count)
}
