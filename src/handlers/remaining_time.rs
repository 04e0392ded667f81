use serde_json::{json, Value};
use tokio::time::{sleep, Duration};

use crate::context::ExecutionContext;
use crate::types::Error;

/// Samples the remaining budget twice around a 100ms sleep, to verify the
/// elapsed-time accounting against real wall time.
pub async fn handler(_event: Value, ctx: ExecutionContext) -> Result<Value, Error> {
    let start = ctx.remaining_time_in_millis();
    sleep(Duration::from_millis(100)).await;
    let stop = ctx.remaining_time_in_millis();

    Ok(json!({ "start": start, "stop": stop }))
}
