//! # bsa-api
//!
//! JSON handlers for the `/api/assignments` resource.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod routes;

pub use extractors::AppState;
pub use routes::router;
