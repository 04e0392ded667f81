use std::env::args;
use tracing::debug;

/// Where to find the handler, taken from the command line.
pub(crate) struct Config {
    /// Slash- or dot-separated module path, e.g. `path/to/module`
    pub handler_path: String,
    /// Symbol name inside that module, e.g. `hello`
    pub handler_name: String,
    /// Additional search root to consult besides the working directory
    pub search_root: Option<String>,
}

impl Config {
    /// Reads the positional params. Prints usage and exits on `--help` or
    /// when the params are missing.
    pub fn from_args() -> Self {
        let mut params = args().skip(1);

        let handler_path = match params.next() {
            Some(v) if v == "--help" => print_help(),
            Some(v) => v,
            None => {
                println!("Missing handler params. Run with --help for usage.");
                std::process::exit(1);
            }
        };

        let handler_name = match params.next() {
            Some(v) => v,
            None => {
                println!("Missing handler name param. Run with --help for usage.");
                std::process::exit(1);
            }
        };

        let search_root = params.next();

        debug!(
            "Handler: {handler_path} / {handler_name}, args: {}",
            args().collect::<Vec<String>>().join(" ")
        );

        Self {
            handler_path,
            handler_name,
            search_root,
        }
    }
}

fn print_help() -> ! {
    println!("Local invocation harness for serverless function handlers.");
    println!();
    println!("Usage: lambda_local_invoker <handler-path> <handler-name> [search-root]");
    println!("  handler-path: module path of the handler, e.g. path/to/module");
    println!("  handler-name: symbol name inside that module, e.g. hello");
    println!("  search-root:  optional extra handler namespace to search");
    println!();
    println!("The event is read from stdin as a single JSON document:");
    println!("  either a bare event value, or {{\"event\": .., \"context\": ..}}");
    println!("The handler result is written to stdout as pretty-printed JSON.");

    std::process::exit(0);
}
