//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to
//! embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;

/// Values substituted into prompt templates
///
/// Each prompt uses a subset; unused fields render as nothing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PromptContext {
    /// Free-text trip description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Available template names, one per line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_list: Option<String>,

    /// Name of the baseline template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<String>,

    /// Pretty-printed JSON of the list the oracle should work from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_json: Option<String>,

    /// User's refinement request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request: Option<String>,

    /// Upper bound on clarification questions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_questions: Option<usize>,
}

/// Prompt template loader
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `~/.config/trippacker/prompts/`)
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that checks `dir` before the embedded prompts
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let dir_exists = dir.is_dir();
        debug!(?dir, %dir_exists, "PromptLoader::new: called");

        Self {
            hbs: Self::engine(),
            user_dir: if dir_exists { Some(dir.to_path_buf()) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            user_dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        // Prompts are plain text, not HTML
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. `{user_dir}/{name}.pmt`
    /// 2. Embedded fallback
    pub fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");

        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in user override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
            debug!(?path, "PromptLoader::load_template: not found in user override");
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: found in embedded");
            return Ok(content.to_string());
        }

        debug!(%name, "PromptLoader::load_template: not found anywhere");
        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }
}
