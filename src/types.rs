use serde::Deserialize;
use serde_json::Value;

use crate::context::ContextOverrides;

/// The catch-all error type returned by user handlers.
pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A local stand-in for the platform's invocation payload.
/// It pairs the raw event with optional overrides for the synthetic context.
/// The event is kept as a raw `Value` and reaches the handler untouched.
#[derive(Deserialize, Debug)]
pub struct RequestPayload {
    pub event: Value,
    #[serde(default)]
    pub context: Option<ContextOverrides>,
}

/// Fatal failures of a single invocation run.
/// Nothing here is retried; every variant ends the process with a non-zero exit.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("cannot find handler module '{module}'")]
    ModuleNotFound { module: String },
    #[error("module '{module}' has no handler '{symbol}'")]
    SymbolNotFound { module: String, symbol: String },
    #[error("malformed JSON on stdin: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("handler failed: {0}")]
    Handler(Error),
    #[error("handler result cannot be serialized: {0}")]
    Encode(#[source] serde_json::Error),
}
