// Purpose: tracing subscriber setup shared by the CLI and integration tests

use anyhow::Result;
use std::sync::Once;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    EnvFilter, Registry,
};

static TEST_INIT: Once = Once::new();

//-----------------------------------------------------------------------------
// Tracing Initialization
//-----------------------------------------------------------------------------

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` takes precedence when set; otherwise `log_level` is used as the
/// filter directive (defaulting to "info"). With `json_output` the fmt layer
/// emits structured JSON lines instead of the human-readable format.
///
/// Returns an error if a global subscriber was already installed.
pub fn init_tracing(log_level: Option<&str>, json_output: bool) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level.unwrap_or("info")))?;

    let subscriber = Registry::default().with(env_filter);

    if json_output {
        let json_layer = fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true);
        tracing::subscriber::set_global_default(subscriber.with(json_layer))?;
    } else {
        let fmt_layer = fmt::layer()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_level(true);
        tracing::subscriber::set_global_default(subscriber.with(fmt_layer))?;
    }

    Ok(())
}

/// Initializes tracing for tests (called once per test run).
///
/// Later calls are no-ops, so every test can call this unconditionally.
pub fn init_test_logging() {
    TEST_INIT.call_once(|| {
        let _ = init_tracing(Some("debug"), false);
    });
}

//-----------------------------------------------------------------------------
// Tests
//-----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_init_default() {
        init_test_logging();
        tracing::info!("loan board tracing initialized");
    }

    #[tokio::test]
    async fn test_tracing_in_async_context() {
        init_test_logging();

        let span = tracing::info_span!("fetch_cycle", loan_count = 2);
        let _enter = span.enter();

        tracing::debug!("emitting inside a span");
        tokio::time::sleep(tokio::time::Duration::from_millis(1)).await;
    }
}
