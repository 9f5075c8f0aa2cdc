//! API request handlers

pub mod assignments;

pub use assignments::*;
