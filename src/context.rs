//! Synthetic execution context handed to handlers in place of the one the
//! platform provides to deployed functions.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

const DEFAULT_NAME: &str = "Fake";
const DEFAULT_VERSION: &str = "LATEST";
const DEFAULT_TIMEOUT_SECS: u64 = 6;

// Placeholder identity values, matching what a deployed function would see
// in shape but not in substance.
const MEMORY_LIMIT_MB: &str = "1024";
const REQUEST_ID: &str = "1234567890";
const LOG_STREAM_SUFFIX: &str = "58419525dade4d17a495dceeeed44708";

/// Recognized context overrides from the request envelope.
/// Anything not named here is attached verbatim as an extra attribute.
#[derive(Deserialize, Debug, Default)]
pub struct ContextOverrides {
    pub name: Option<String>,
    pub version: Option<String>,
    /// Execution budget in seconds.
    pub timeout: Option<u64>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Execution metadata for one invocation: identity accessors, elapsed-time
/// accounting and a write-through log sink.
/// Created once per process run and discarded when the process exits.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    name: String,
    version: String,
    timeout: Duration,
    /// Wall-clock construction stamp, used for the date-derived names.
    created: DateTime<Utc>,
    /// Monotonic twin of `created` backing the remaining-time math,
    /// immune to system clock adjustments mid-invocation.
    started: Instant,
    extra: HashMap<String, Value>,
    /// Interactive input for handlers that prompt a human. None when the
    /// process has no controlling terminal.
    terminal: Option<Arc<File>>,
    /// Flips to true shortly before the declared timeout elapses.
    timeout_warning: Option<watch::Receiver<bool>>,
}

impl ExecutionContext {
    pub fn new(overrides: ContextOverrides) -> Self {
        Self {
            name: overrides.name.unwrap_or_else(|| DEFAULT_NAME.to_owned()),
            version: overrides.version.unwrap_or_else(|| DEFAULT_VERSION.to_owned()),
            timeout: Duration::from_secs(overrides.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            created: Utc::now(),
            started: Instant::now(),
            extra: overrides.extra,
            terminal: None,
            timeout_warning: None,
        }
    }

    /// Milliseconds left of the declared budget. Floors at zero once the
    /// budget is exhausted, no matter how long ago that was.
    pub fn remaining_time_in_millis(&self) -> u64 {
        let elapsed = self.started.elapsed().as_millis();
        self.timeout.as_millis().saturating_sub(elapsed) as u64
    }

    pub fn function_name(&self) -> &str {
        &self.name
    }

    pub fn function_version(&self) -> &str {
        &self.version
    }

    pub fn invoked_function_arn(&self) -> String {
        ["arn:aws:lambda:serverless:", &self.name].concat()
    }

    pub fn memory_limit_in_mb(&self) -> &'static str {
        MEMORY_LIMIT_MB
    }

    pub fn request_id(&self) -> &'static str {
        REQUEST_ID
    }

    pub fn log_group_name(&self) -> String {
        ["/aws/lambda/", &self.name].concat()
    }

    /// E.g. `2026/08/07/[$LATEST]58419525dade4d17a495dceeeed44708`
    pub fn log_stream_name(&self) -> String {
        format!(
            "{}/[${}]{}",
            self.created.format("%Y/%m/%d"),
            self.version,
            LOG_STREAM_SUFFIX
        )
    }

    /// The declared execution budget.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// An extra attribute supplied in the request's context overrides.
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// Write-through log sink for handlers that log via the context object.
    pub fn log(&self, line: &str) {
        // same sink as the result document; the platform interleaves them too
        let _ = std::io::stdout().write_all(line.as_bytes());
    }

    /// Interactive input for prompting a human, if a controlling terminal
    /// was available after the event was read off stdin.
    pub fn interactive_input(&self) -> Option<Arc<File>> {
        self.terminal.clone()
    }

    /// A channel that flips to true shortly before the declared timeout
    /// elapses. None when the warning timer was not armed.
    pub fn timeout_warning(&self) -> Option<watch::Receiver<bool>> {
        self.timeout_warning.clone()
    }

    pub(crate) fn attach_terminal(&mut self, terminal: File) {
        self.terminal = Some(Arc::new(terminal));
    }

    pub(crate) fn attach_timeout_warning(&mut self, warning: watch::Receiver<bool>) {
        self.timeout_warning = Some(warning);
    }
}

impl Default for ExecutionContext {
    fn default() -> Self {
        Self::new(ContextOverrides::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_identity() {
        let ctx = ExecutionContext::default();

        assert_eq!(ctx.function_name(), "Fake");
        assert_eq!(ctx.function_version(), "LATEST");
        assert_eq!(ctx.invoked_function_arn(), "arn:aws:lambda:serverless:Fake");
        assert_eq!(ctx.memory_limit_in_mb(), "1024");
        assert_eq!(ctx.request_id(), "1234567890");
        assert_eq!(ctx.log_group_name(), "/aws/lambda/Fake");
    }

    #[test]
    fn log_stream_name_is_date_derived() {
        let ctx = ExecutionContext::default();
        let name = ctx.log_stream_name();

        // YYYY/MM/DD prefix followed by the bracketed version and the suffix
        assert_eq!(&name[4..5], "/");
        assert_eq!(&name[7..8], "/");
        assert!(name.contains("/[$LATEST]"));
        assert!(name.ends_with("58419525dade4d17a495dceeeed44708"));
    }

    #[test]
    fn overrides_are_applied() {
        let overrides: ContextOverrides = serde_json::from_value(json!({
            "name": "greeter",
            "version": "42",
            "timeout": 30,
            "memory": 512
        }))
        .unwrap();
        let ctx = ExecutionContext::new(overrides);

        assert_eq!(ctx.function_name(), "greeter");
        assert_eq!(ctx.function_version(), "42");
        assert_eq!(ctx.timeout(), Duration::from_secs(30));
        assert_eq!(ctx.invoked_function_arn(), "arn:aws:lambda:serverless:greeter");
        assert_eq!(ctx.extra("memory"), Some(&json!(512)));
    }

    #[test]
    fn extras_do_not_clobber_identity_accessors() {
        let overrides: ContextOverrides = serde_json::from_value(json!({
            "request_id": "spoofed",
            "memory_limit_in_mb": "64"
        }))
        .unwrap();
        let ctx = ExecutionContext::new(overrides);

        assert_eq!(ctx.request_id(), "1234567890");
        assert_eq!(ctx.memory_limit_in_mb(), "1024");
        assert_eq!(ctx.extra("request_id"), Some(&json!("spoofed")));
    }

    #[test]
    fn remaining_time_decreases_with_elapsed_time() {
        let ctx = ExecutionContext::default();

        let first = ctx.remaining_time_in_millis();
        std::thread::sleep(Duration::from_millis(50));
        let second = ctx.remaining_time_in_millis();

        assert!(first <= 6000);
        assert!(second < first);
        // the gap tracks real elapsed time, allowing for scheduling jitter
        assert!(first - second >= 40);
    }

    #[test]
    fn remaining_time_floors_at_zero() {
        let overrides = ContextOverrides {
            timeout: Some(0),
            ..Default::default()
        };
        let ctx = ExecutionContext::new(overrides);
        std::thread::sleep(Duration::from_millis(10));

        assert_eq!(ctx.remaining_time_in_millis(), 0);
    }
}
