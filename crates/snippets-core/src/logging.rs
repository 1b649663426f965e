//! Logging init: tracing to stderr, verbosity from `RUST_LOG` or `SNIPPETS_ENV`.

use tracing_subscriber::EnvFilter;

/// Default filter: `RUST_LOG` wins when set; otherwise `SNIPPETS_ENV` of
/// "dev" or "local" selects verbose output, anything else standard.
fn default_filter() -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let env = std::env::var("SNIPPETS_ENV").unwrap_or_default();
    let directive = match env.to_ascii_lowercase().as_str() {
        "dev" | "local" => "info,snippets_core=debug,snippets_cli=debug",
        _ => "info",
    };
    EnvFilter::new(directive)
}

/// Initialize structured logging to stderr. Call once, early.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_writer(std::io::stderr)
        .init();
}
