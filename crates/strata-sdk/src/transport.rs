//! Transport layer for RPC communication

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::SdkError;

/// Transport trait for RPC communication (object-safe)
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an RPC request and get JSON response
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError>;
}

/// Helper to deserialize response
pub fn deserialize_response<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, SdkError> {
    serde_json::from_value(value).map_err(|e| SdkError::Serialization(e.to_string()))
}

/// A recorded request
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// RPC method
    pub method: String,
    /// Request parameters
    pub params: Vec<Value>,
}

#[derive(Default)]
struct MockState {
    queued: HashMap<String, VecDeque<Result<Value, SdkError>>>,
    sticky: HashMap<String, Value>,
    calls: Vec<RecordedCall>,
}

/// Mock transport for testing
///
/// Answers from per-method queues first, then from fixed responses, and
/// records every request so tests can assert what reached the network.
/// Clones share state.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Create a mock with no responses
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response returned whenever the queue for `method` is empty
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn set_response(&self, method: &str, response: Value) {
        self.lock().sticky.insert(method.to_string(), response);
    }

    /// Queue a one-shot response for `method`
    pub fn push_response(&self, method: &str, response: Value) {
        self.push_result(method, Ok(response));
    }

    /// Queue a one-shot error for `method`
    pub fn push_error(&self, method: &str, error: SdkError) {
        self.push_result(method, Err(error));
    }

    fn push_result(&self, method: &str, result: Result<Value, SdkError>) {
        self.lock()
            .queued
            .entry(method.to_string())
            .or_default()
            .push_back(result);
    }

    /// All requests seen so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Number of requests for `method`
    pub fn call_count(&self, method: &str) -> usize {
        self.lock().calls.iter().filter(|c| c.method == method).count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        // Poisoning only follows a panic in another test thread
        self.state.lock().expect("MockTransport mutex poisoned")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| SdkError::Transport("MockTransport mutex poisoned".to_string()))?;

        state.calls.push(RecordedCall {
            method: method.to_string(),
            params,
        });

        if let Some(result) = state.queued.get_mut(method).and_then(VecDeque::pop_front) {
            return result;
        }

        if let Some(response) = state.sticky.get(method) {
            return Ok(response.clone());
        }

        Err(SdkError::Rpc {
            code: -32601,
            message: format!("Method not found: {}", method),
        })
    }
}

/// HTTP transport speaking JSON-RPC 2.0
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    request_id: std::sync::atomic::AtomicU64,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.to_string(),
            request_id: std::sync::atomic::AtomicU64::new(1),
        }
    }

    fn next_id(&self) -> u64 {
        self.request_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, SdkError> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": self.next_id(),
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        let response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(SdkError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        response.result.ok_or_else(|| SdkError::Rpc {
            code: -32603,
            message: "No result in response".to_string(),
        })
    }
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}
