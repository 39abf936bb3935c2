//! Oracle client
//!
//! Typed contracts over the completion service: template selection,
//! suggestions, refinement and clarification. Owns prompt rendering, schema
//! validation and error translation.

mod client;
mod error;
pub mod schema;

pub use client::{MAX_QUESTIONS, Oracle};
pub use error::OracleError;
