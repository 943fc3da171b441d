use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber. `RUST_LOG` wins over `default_directive`.
/// Output goes to stderr so command output on stdout stays machine-readable.
pub fn init(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    // A second init (tests, embedding apps) keeps the first subscriber.
    let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}
