// src/logging.rs
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Used when `RUST_LOG` is unset. Names every target the library logs under at info.
pub const DEFAULT_FILTER: &str =
    "ai_news_digest=info,pipeline=info,ingest=info,publish=info,config=info,warn";

pub fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber: compact text, or JSON lines when `json` is set.
pub fn init(json: bool) {
    let registry = tracing_subscriber::registry().with(default_filter());
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{Event, Subscriber};
    use tracing_subscriber::layer::{Context, Layer};

    #[derive(Clone, Default)]
    struct Counter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for Counter {
        fn on_event(&self, _event: &Event<'_>, _ctx: Context<'_, S>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn default_filter_lets_run_summaries_through() {
        let counter = Counter::default();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new(DEFAULT_FILTER))
            .with(counter.clone());

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(target: "ingest", "fetched feed");
            tracing::info!(target: "pipeline", "digest run complete");
            tracing::info!(target: "publish", "artifact written");
            tracing::info!(target: "config", "using built-in configuration");
            tracing::info!(target: "ai_news_digest", "digest published");
            // below the default level
            tracing::debug!(target: "scoring", "relevance evaluated");
            tracing::info!(target: "hyper", "connection opened");
            tracing::warn!(target: "hyper", "connection reset");
        });

        assert_eq!(counter.0.load(Ordering::SeqCst), 6);
    }
}
