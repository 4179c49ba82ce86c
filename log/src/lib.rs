use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Builds the event filter. `RUST_LOG` wins over `directive` when set;
/// anything unparsable falls back to INFO.
pub fn filter(directive: &str) -> EnvFilter {
    let directive = std::env::var("RUST_LOG").unwrap_or_else(|_| directive.to_string());
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directive)
}

/// Installs the global subscriber. Events go to stderr through a
/// non-blocking writer so they never interleave with command output on
/// stdout. Buffered events are flushed when the returned guard is dropped,
/// so hold it until the process exits.
#[must_use]
pub fn init(directive: &str) -> WorkerGuard {
    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::registry()
        .with(filter(directive))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .compact(),
        )
        .init();
    guard
}
