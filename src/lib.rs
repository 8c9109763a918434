//! ubeers - brewery resource API and real-time aggregation bridge
//!
//! - [`store`]: records, the resource store trait and its in-memory backend
//! - [`pictures`]: picture reference to display URL resolution
//! - [`rest_api`]: HTTP CRUD over the store
//! - [`bridge`]: WebSocket channel serving aggregated brewery views
//! - [`http_server`]: transport shared by both servers
//! - [`observability`]: tracing setup, lifecycle events, counters
//! - [`cli`]: command-line entry point

pub mod bridge;
pub mod cli;
pub mod http_server;
pub mod observability;
pub mod pictures;
pub mod rest_api;
pub mod store;
