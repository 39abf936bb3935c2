//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Template selection prompt
pub const SELECT_TEMPLATES: &str = include_str!("../../prompts/select-templates.pmt");

/// Additional-item suggestion prompt
pub const SUGGEST: &str = include_str!("../../prompts/suggest.pmt");

/// Whole-list refinement prompt
pub const REFINE: &str = include_str!("../../prompts/refine.pmt");

/// Clarification questions prompt
pub const CLARIFY: &str = include_str!("../../prompts/clarify.pmt");

/// Names of every embedded prompt
pub const NAMES: &[&str] = &["select-templates", "suggest", "refine", "clarify"];

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "select-templates" => Some(SELECT_TEMPLATES),
        "suggest" => Some(SUGGEST),
        "refine" => Some(REFINE),
        "clarify" => Some(CLARIFY),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
