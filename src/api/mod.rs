//! API Module
//!
//! HTTP handlers and routing for the file cache REST API.
//!
//! # Endpoints
//! - `PUT /set` - Store a key-value pair
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Delete a key
//! - `DELETE /all` - Delete every entry
//! - `GET /keys` - List stored keys
//! - `GET /has/:key` - Check whether a key exists
//! - `GET /info` - Disk usage and capacity
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
