//! # Aggregation Bridge
//!
//! Real-time channel that answers brewery requests with aggregated views.
//! Every request fetches from the resource API and fans out picture
//! lookups; nothing is cached between requests.
//!
//! ## Flow
//!
//! ```text
//! client ──frame──▶ Session ──spawn──▶ Aggregator ──▶ ResourceApi (HTTP)
//!    ▲                 │                    │
//!    └────reply────────┴◀── outbound queue ─┘
//! ```

pub mod aggregator;
pub mod client;
pub mod config;
pub mod errors;
pub mod protocol;
pub mod server;
pub mod session;

pub use aggregator::{Aggregator, BreweryView};
pub use client::{HttpResourceApi, ResourceApi};
pub use config::BridgeConfig;
pub use errors::{BridgeError, BridgeResult, ErrorCode};
pub use protocol::{ClientEvent, Frame, ServerEvent};
pub use server::{bridge_routes, SOCKET_PATH};
pub use session::{BridgeState, Session};
