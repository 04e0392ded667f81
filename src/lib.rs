//! Local invocation harness for cloud-function handlers.
//!
//! One invocation per process run: resolve a handler by module path and
//! symbol name, read a single JSON event from the input stream, build a
//! synthetic execution context, invoke the handler and write its result to
//! the output stream as pretty-printed JSON. Stateless across runs.

pub mod codec;
pub mod context;
pub mod handlers;
pub mod registry;
pub mod timeout;
pub mod types;

use std::io::Write;
use tokio::io::AsyncRead;
use tracing::{debug, info};

use crate::context::ExecutionContext;
use crate::registry::{HandlerRegistry, DEFAULT_ROOT};
use crate::timeout::TimeoutWarning;
use crate::types::InvokeError;

/// Runs one complete invocation: resolve, decode, invoke, encode.
/// The caller supplies the streams so the whole pipeline can run against
/// in-memory buffers in tests.
///
/// Failures propagate untouched; nothing is retried and no output is
/// written unless the handler completed and its result serialized.
pub async fn invoke<R, W>(
    registry: &HandlerRegistry,
    module: &str,
    symbol: &str,
    input: &mut R,
    output: &mut W,
) -> Result<(), InvokeError>
where
    R: AsyncRead + Unpin,
    W: Write,
{
    // resolve before touching stdin so a bad handler address fails without
    // consuming the event
    let handler = {
        // the working directory is only searchable for the duration of the
        // resolution, like the platform's temporary search-path extension
        let _cwd = registry.push_search_root(DEFAULT_ROOT);
        registry.resolve(module, symbol)?
    };
    debug!("Resolved {module} / {symbol}");

    let request = codec::read_request(input).await?;

    let mut ctx = ExecutionContext::new(request.context.unwrap_or_default());
    if let Some(terminal) = codec::open_controlling_terminal() {
        // stdin is spent on the event; interactive handlers prompt via the
        // controlling terminal instead
        ctx.attach_terminal(terminal);
    }
    export_platform_env(&ctx);

    let mut warning = TimeoutWarning::arm(ctx.timeout());
    ctx.attach_timeout_warning(warning.subscribe());

    info!("Invoking {} with {}s budget", ctx.function_name(), ctx.timeout().as_secs());
    let result = handler.invoke(request.event, &ctx).await;

    // released here on the success path; the drop guard covers early returns
    warning.cancel();

    let result = result.map_err(InvokeError::Handler)?;
    codec::write_result(output, &result)?;

    Ok(())
}

/// Sets the platform-shaped env vars a deployed function would see.
/// Values already present in the environment win.
fn export_platform_env(ctx: &ExecutionContext) {
    for (key, value) in [
        ("AWS_LAMBDA_FUNCTION_NAME", ctx.function_name().to_owned()),
        ("AWS_LAMBDA_FUNCTION_VERSION", ctx.function_version().to_owned()),
        ("AWS_LAMBDA_FUNCTION_MEMORY_SIZE", ctx.memory_limit_in_mb().to_owned()),
        ("AWS_LAMBDA_LOG_GROUP_NAME", ctx.log_group_name()),
        ("AWS_LAMBDA_LOG_STREAM_NAME", ctx.log_stream_name()),
    ] {
        if std::env::var(key).is_err() {
            std::env::set_var(key, value);
        }
    }
}
