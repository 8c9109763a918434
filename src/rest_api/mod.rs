//! # REST Resource API
//!
//! HTTP CRUD endpoints for breweries, pictures, beers and users over a
//! [`ResourceStore`](crate::store::ResourceStore).

mod beer_routes;
mod brewery_routes;
pub mod errors;
pub mod parser;
mod picture_routes;
pub mod response;
pub mod server;
mod user_routes;

pub use errors::{ErrorResponse, RestError, RestResult};
pub use parser::parse_id;
pub use response::{BeerCreatedResponse, DeletedResponse, MessageResponse, UserCreatedResponse};
pub use server::{api_routes, ApiState};
