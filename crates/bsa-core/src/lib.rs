//! # bsa-core
//!
//! Core building blocks shared by every crate of the bus staff assignment
//! service:
//! - Primary key alias
//! - Validation error collection
//! - Configuration types and loading

pub mod config;
pub mod error;
pub mod traits;

pub use config::{AppConfig, ConfigError, ServiceMode};
pub use error::*;
pub use traits::*;
