//! TripPacker - packing lists from personal templates plus model suggestions
//!
//! A trip description goes through a fixed pipeline: pick relevant templates,
//! merge them into a base list, ask the oracle for what is missing, merge
//! again, and store the result as a new trip. Refinement sends the list back
//! with a free-text request and carries packed flags over to the result.
//!
//! # Modules
//!
//! - [`domain`] - trips, lists, clarification questions, ids
//! - [`templates`] - the built-in template library
//! - [`llm`] - completion client trait, Gemini and canned implementations
//! - [`prompts`] - Handlebars prompt templates
//! - [`oracle`] - typed oracle operations and output validation
//! - [`merge`] - template and suggestion merging, refinement normalization
//! - [`reconcile`] - packed-state carryover, id minting, toggle
//! - [`history`] - persisted trip history
//! - [`packer`] - the operations a front-end drives
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod history;
pub mod llm;
pub mod merge;
pub mod oracle;
pub mod packer;
pub mod prompts;
pub mod reconcile;
pub mod render;
pub mod templates;

// Re-export commonly used types
pub use config::{Config, LlmConfig};
pub use domain::{PackingCategory, PackingItem, PackingList, Provenance, Trip};
pub use history::{HistoryError, TripHistory};
pub use llm::{CannedLlmClient, LlmClient, LlmError, create_client};
pub use oracle::{Oracle, OracleError};
pub use packer::{Generated, Packer, PackerError};
