//! MoFA Stage agent REST API contract types and validation
//!
//! This crate defines the request/response shapes, route builders and
//! validation helpers for the `/api/agents` endpoints. These types are
//! shared between the REST client and the in-memory mock client.

pub mod error;
pub mod routes;
pub mod types;
pub mod validation;

pub use error::*;
pub use routes::API_BASE_PATH;
pub use types::*;
