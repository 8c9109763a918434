//! Observability for ubeers
//!
//! - Structured logging through `tracing`, one typed [`Event`] per
//!   lifecycle step
//! - Monotonic counters in [`MetricsRegistry`]
//!
//! Observability failure must never fail a request.
//!
//! # Usage
//!
//! ```ignore
//! use tracing::info;
//! use ubeers::observability::{Event, MetricsRegistry};
//!
//! info!(event = %Event::SessionOpened, session = %id, "client connected");
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_sessions_opened();
//! ```

mod events;
mod metrics;

pub use events::Event;
pub use metrics::{MetricsRegistry, MetricsSnapshot};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "ubeers=info,tower_http=info";

/// Install the global subscriber.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
