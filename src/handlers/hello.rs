use serde_json::{json, Value};

use crate::context::ExecutionContext;
use crate::types::Error;

/// A minimal request/response converter in the HTTP gateway shape.
pub async fn hello(event: Value, ctx: ExecutionContext) -> Result<Value, Error> {
    let path = event.get("path").and_then(Value::as_str).unwrap_or("/");

    Ok(json!({
        "statusCode": 200,
        "body": format!("{} served {}", ctx.function_name(), path),
    }))
}

/// Returns the event exactly as received.
pub async fn echo(event: Value, _ctx: ExecutionContext) -> Result<Value, Error> {
    Ok(event)
}
