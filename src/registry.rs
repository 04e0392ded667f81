//! Handler lookup by module path and symbol name.
//!
//! The real platform imports the handler module at runtime; here the set of
//! invokable functions is a registry keyed the same way, with named search
//! roots standing in for the module search path. A root is only consulted
//! while a [`SearchRootGuard`] for it is alive, so extending the path is a
//! scoped operation that cannot leak past the resolution it was meant for.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use crate::context::ExecutionContext;
use crate::types::{Error, InvokeError};

/// The working-directory namespace, where the bundled handlers live.
pub const DEFAULT_ROOT: &str = ".";

/// A user handler: one event in, one JSON-shaped result out.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn invoke(&self, event: Value, ctx: &ExecutionContext) -> Result<Value, Error>;
}

/// Adapts a plain async fn into a registrable [`Handler`], the way lambda
/// runtimes wrap handler functions with `service_fn`.
pub fn handler_fn<F, Fut>(f: F) -> Arc<dyn Handler>
where
    F: Fn(Value, ExecutionContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, Error>> + Send + 'static,
{
    Arc::new(HandlerFn { f })
}

struct HandlerFn<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(Value, ExecutionContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, Error>> + Send + 'static,
{
    async fn invoke(&self, event: Value, ctx: &ExecutionContext) -> Result<Value, Error> {
        (self.f)(event, ctx.clone()).await
    }
}

/// symbol name -> handler
type Module = HashMap<String, Arc<dyn Handler>>;

pub struct HandlerRegistry {
    /// Registered modules per root. Registration alone does not make a root
    /// searchable; it must also be on the search path.
    roots: HashMap<String, HashMap<String, Module>>,
    /// Roots consulted by `resolve`, in order.
    search_path: Mutex<Vec<String>>,
}

impl HandlerRegistry {
    /// An empty registry with an empty search path.
    pub fn new() -> Self {
        Self {
            roots: HashMap::new(),
            search_path: Mutex::new(Vec::new()),
        }
    }

    /// A registry pre-populated with the bundled example handlers.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        crate::handlers::register_builtin(&mut registry);
        registry
    }

    /// Binds a handler under the default search root.
    pub fn register(&mut self, module: &str, symbol: &str, handler: Arc<dyn Handler>) {
        self.register_in(DEFAULT_ROOT, module, symbol, handler);
    }

    /// Binds a handler under a named search root.
    pub fn register_in(&mut self, root: &str, module: &str, symbol: &str, handler: Arc<dyn Handler>) {
        self.roots
            .entry(root.to_owned())
            .or_default()
            .entry(normalize_module_path(module))
            .or_default()
            .insert(symbol.to_owned(), handler);
    }

    /// Makes a root searchable until the returned guard is dropped.
    pub fn push_search_root(&self, root: &str) -> SearchRootGuard<'_> {
        self.search_path
            .lock()
            .expect("search path lock poisoned. It's a bug")
            .push(root.to_owned());

        SearchRootGuard {
            registry: self,
            root: root.to_owned(),
        }
    }

    /// Finds the handler bound to `symbol` in `module`, walking the search
    /// path in order. The module path may be slash- or dot-separated.
    pub fn resolve(&self, module: &str, symbol: &str) -> Result<Arc<dyn Handler>, InvokeError> {
        let module_key = normalize_module_path(module);
        let search_path = self
            .search_path
            .lock()
            .expect("search path lock poisoned. It's a bug");

        let mut module_seen = false;
        for root in search_path.iter() {
            let Some(modules) = self.roots.get(root) else {
                continue;
            };
            let Some(symbols) = modules.get(&module_key) else {
                continue;
            };
            module_seen = true;
            if let Some(handler) = symbols.get(symbol) {
                return Ok(Arc::clone(handler));
            }
        }

        // distinguish a missing module from a missing symbol so the caller
        // sees the same failure split the platform produces
        if module_seen {
            Err(InvokeError::SymbolNotFound {
                module: module_key,
                symbol: symbol.to_owned(),
            })
        } else {
            Err(InvokeError::ModuleNotFound { module: module_key })
        }
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Removes its search root when dropped, restoring the path to what it was.
pub struct SearchRootGuard<'a> {
    registry: &'a HandlerRegistry,
    root: String,
}

impl Drop for SearchRootGuard<'_> {
    fn drop(&mut self) {
        let mut search_path = self
            .registry
            .search_path
            .lock()
            .expect("search path lock poisoned. It's a bug");

        // remove the last matching entry so nested pushes unwind in order
        if let Some(idx) = search_path.iter().rposition(|r| r == &self.root) {
            search_path.remove(idx);
        }
    }
}

/// Canonical module key: dot-separated, as the platform addresses modules.
fn normalize_module_path(module: &str) -> String {
    module.replace('/', ".")
}
