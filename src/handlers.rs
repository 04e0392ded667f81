//! Bundled example handlers. They live under the working-directory search
//! root, the same place a developer's own handlers would resolve from, and
//! double as local fixtures for exercising the harness end to end.

pub mod decimals;
pub mod hello;
pub mod remaining_time;

use crate::registry::{handler_fn, HandlerRegistry};

pub(crate) fn register_builtin(registry: &mut HandlerRegistry) {
    registry.register("handler", "hello", handler_fn(hello::hello));
    registry.register("handler", "echo", handler_fn(hello::echo));
    registry.register("fixtures/remaining_time", "handler", handler_fn(remaining_time::handler));
    registry.register("fixtures/decimals", "handler", handler_fn(decimals::handler));
}
