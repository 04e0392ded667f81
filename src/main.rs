use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use lambda_local_invoker::registry::HandlerRegistry;
use lambda_local_invoker::invoke;

mod config;

#[tokio::main]
async fn main() {
    init_tracing();
    let config = config::Config::from_args();

    let registry = HandlerRegistry::builtin();

    // keep an explicitly supplied search root alive for the whole run
    let _extra_root = config
        .search_root
        .as_deref()
        .map(|root| registry.push_search_root(root));

    let mut stdin = tokio::io::stdin();
    let mut stdout = std::io::stdout();

    if let Err(e) = invoke(
        &registry,
        &config.handler_path,
        &config.handler_name,
        &mut stdin,
        &mut stdout,
    )
    .await
    {
        error!("{e}");
        std::process::exit(1);
    }
}

/// Initializes the tracing from RUST_LOG env var if present or sets minimal logging:
/// - INFO for the harness
/// - ERROR for everything else
fn init_tracing() {
    // find out the name of the binary to set the default logging filter
    let binary_name = std::env::current_exe()
        .expect("Cannot get the path to the current executable")
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .expect("Cannot get the file name of the current executable")
        // this replace is needed because tracing uses target names with underscores
        .replace('-', "_");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(
                    Directive::from_str(&[&binary_name, "=info"].concat())
                        .expect("Invalid logging filter. It's a bug."),
                )
                .from_env_lossy(),
        )
        // stdout carries the result document; diagnostics must not mix into it
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact()
        .init();
}
