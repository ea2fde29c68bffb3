use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use viewer_automation::error::{AutomationError, AutomationResult};
use viewer_automation::storage::{
    BlobStore, MemoryBlobStore, ObjectAcl, SignedAccess, StorageError, StorageResult,
};
use viewer_automation::transport::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, RequestBody,
};

/// A request the transport saw
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub url: String,
    pub authorization: Option<String>,
    pub body: RequestBody,
}

impl RecordedCall {
    pub fn json_body(&self) -> Option<&serde_json::Value> {
        match &self.body {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Respond(HttpResponse),
    NetworkError(String),
}

/// Transport answering from per-route scripts
///
/// Each route (method + exact URL) holds a queue of answers. Answers are
/// consumed in order and the last one repeats. Unscripted routes answer 404.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<Scripted>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: HttpMethod, url: &str, answer: Scripted) {
        self.routes
            .lock()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(answer);
    }

    pub fn respond(&self, method: HttpMethod, url: &str, status: u16, body: impl Into<Vec<u8>>) {
        self.push(method, url, Scripted::Respond(HttpResponse::new(status, body)));
    }

    pub fn respond_json(
        &self,
        method: HttpMethod,
        url: &str,
        status: u16,
        body: serde_json::Value,
    ) {
        self.respond(method, url, status, body.to_string());
    }

    pub fn fail(&self, method: HttpMethod, url: &str, message: &str) {
        self.push(method, url, Scripted::NetworkError(message.to_string()));
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls_to(&self, method: HttpMethod, url: &str) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.method == method && call.url == url)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> AutomationResult<HttpResponse> {
        self.calls.lock().push(RecordedCall {
            method: request.method,
            url: request.url.clone(),
            authorization: request.authorization.clone(),
            body: request.body.clone(),
        });

        let answer = {
            let mut routes = self.routes.lock();
            match routes.get_mut(&(request.method, request.url.clone())) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match answer {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::NetworkError(message)) => Err(AutomationError::Transport {
                operation: request.url,
                message,
                timed_out: false,
            }),
            None => Ok(HttpResponse::new(404, "no scripted response")),
        }
    }
}

/// Blob store that rejects uploads whose key ends with `failing_suffix`
///
/// Other uploads go to the wrapped in-memory store after `delay`.
#[derive(Debug)]
pub struct FailingBlobStore {
    pub inner: MemoryBlobStore,
    pub failing_suffix: String,
    pub delay: Duration,
}

impl FailingBlobStore {
    pub fn new(bucket: &str, failing_suffix: &str) -> Self {
        Self {
            inner: MemoryBlobStore::new(bucket),
            failing_suffix: failing_suffix.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl BlobStore for FailingBlobStore {
    fn bucket(&self) -> &str {
        self.inner.bucket()
    }

    async fn presign(
        &self,
        key: &str,
        access: SignedAccess,
        expires_in: Duration,
    ) -> StorageResult<String> {
        self.inner.presign(key, access, expires_in).await
    }

    async fn put_object(&self, key: &str, data: Vec<u8>, acl: ObjectAcl) -> StorageResult<String> {
        if key.ends_with(&self.failing_suffix) {
            return Err(StorageError::upload_failed(key, "access denied"));
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.inner.put_object(key, data, acl).await
    }
}
