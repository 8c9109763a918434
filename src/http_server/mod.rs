//! # HTTP Server Module
//!
//! Transport for the resource API and the bridge: bind addresses, origin
//! policy, tracing, health and metrics endpoints.

pub mod config;
pub mod observability_routes;
pub mod origin;
pub mod server;

pub use config::ServerConfig;
pub use observability_routes::HealthResponse;
pub use origin::{apply_origin_policy, OriginPolicy};
pub use server::{shutdown_signal, ApiServer, BridgeServer};
