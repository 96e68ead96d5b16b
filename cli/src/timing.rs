//! Tracing setup and latency profiling.
//!
//! `#[instrument]`ed commands log their duration when `--timing` is set
//! (`FmtSpan::CLOSE`). Records emitted through `log` by the business crate are
//! forwarded into the same subscriber.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Default level when `RUST_LOG` is not set.
fn default_level(verbose: bool, timing: bool) -> LevelFilter {
    if verbose {
        LevelFilter::DEBUG
    } else if timing {
        // Span close events are logged at INFO
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    }
}

/// Install the global subscriber, writing to stderr so tables on stdout stay clean.
pub fn init_tracing(verbose: bool, timing: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose, timing).into())
        .from_env_lossy();

    let span_events = if timing {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_level(true)
                .with_span_events(span_events)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
