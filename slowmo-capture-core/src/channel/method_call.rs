use std::fmt;

use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::error::CaptureError;

/// Name of the method channel the plugin answers on.
pub const CHANNEL_NAME: &str = "slowmo_video_recorder";

/// A call across the host boundary: method name plus argument bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// The single reply to a [`MethodCall`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodResponse {
    Success {
        value: Value,
    },
    Error {
        code: String,
        message: String,
        details: Option<Value>,
    },
    NotImplemented,
}

impl MethodResponse {
    pub fn success(value: impl Into<Value>) -> Self {
        Self::Success { value: value.into() }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Error code, for error responses.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Error { code, .. } => Some(code),
            _ => None,
        }
    }
}

impl From<&CaptureError> for MethodResponse {
    fn from(error: &CaptureError) -> Self {
        let (message, details) = match error {
            CaptureError::InvalidArguments(reason) => {
                ("Invalid arguments".to_owned(), Some(Value::String(reason.clone())))
            }
            _ => (capitalize(&error.to_string()), None),
        };
        Self::Error {
            code: error.code().into(),
            message,
            details,
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One-shot responder for a method call. Replying consumes it.
pub struct MethodResult {
    responder: Box<dyn FnOnce(MethodResponse) + Send + 'static>,
}

impl MethodResult {
    pub fn new<F>(responder: F) -> Self
    where
        F: FnOnce(MethodResponse) + Send + 'static,
    {
        Self {
            responder: Box::new(responder),
        }
    }

    /// A responder whose reply is delivered to the returned receiver.
    pub fn channel() -> (Self, Receiver<MethodResponse>) {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let result = Self::new(move |response| {
            let _ = tx.send(response);
        });
        (result, rx)
    }

    pub fn send(self, response: MethodResponse) {
        (self.responder)(response);
    }

    pub fn success(self, value: impl Into<Value>) {
        self.send(MethodResponse::success(value));
    }

    pub fn error(self, error: &CaptureError) {
        self.send(MethodResponse::from(error));
    }

    pub fn not_implemented(self) {
        self.send(MethodResponse::NotImplemented);
    }
}

impl fmt::Debug for MethodResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodResult").finish_non_exhaustive()
    }
}
