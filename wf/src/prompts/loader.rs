//! Prompt Loader
//!
//! Loads stage prompt templates from an optional override directory or falls
//! back to the embedded defaults, and renders them with handlebars.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;

/// The pipeline stage a prompt belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStage {
    /// Stage 1: on/off-topic classification
    Classify,
    /// Stage 3: place-search extraction
    PlaceSearch,
    /// Stage 4: route-info extraction
    RouteExtract,
    /// Re-entrant pass: final response formulation
    Respond,
}

impl PromptStage {
    /// Get the template name for this stage
    pub fn template_name(&self) -> &'static str {
        match self {
            Self::Classify => "classify",
            Self::PlaceSearch => "place-search",
            Self::RouteExtract => "route-extract",
            Self::Respond => "respond",
        }
    }
}

/// Context for rendering stage prompts
///
/// Every stage gets the same three ingredients: the serialized trip state,
/// the windowed conversation history, and the message being processed.
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    /// Durable trip state, serialized as JSON
    pub state: String,
    /// Recent conversation history, role-tagged, oldest first
    pub history: String,
    /// The current message (user text, or a synthetic tool summary)
    pub message: String,
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory from config
    override_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader with an optional override directory
    pub fn new(override_dir: Option<impl AsRef<Path>>) -> Self {
        let override_dir = override_dir.map(|d| d.as_ref().to_path_buf()).filter(|d| d.exists());
        debug!(?override_dir, "PromptLoader::new: called");
        Self {
            hbs: Handlebars::new(),
            override_dir,
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        Self {
            hbs: Handlebars::new(),
            override_dir: None,
        }
    }

    /// Load a template for a stage
    ///
    /// Checks the override directory for `{name}.pmt` first, then falls back
    /// to the embedded default.
    fn load_template(&self, stage: PromptStage) -> Result<String> {
        let name = stage.template_name();
        if let Some(ref dir) = self.override_dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "load_template: using override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt override {}: {}", path.display(), e));
            }
        }

        embedded::get_embedded(name)
            .map(|s| s.to_string())
            .ok_or_else(|| eyre!("Prompt template not found: {}", name))
    }

    /// Render a stage prompt with the given context
    pub fn render(&self, stage: PromptStage, context: &PromptContext) -> Result<String> {
        debug!(stage = ?stage, "render: called");
        let template = self.load_template(stage)?;
        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", stage.template_name(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> PromptContext {
        PromptContext {
            state: r#"{"maxDrivingHoursPerDay": 6.0}"#.to_string(),
            history: "user: hi\n\nassistant: hello".to_string(),
            message: "find restaurants near Paris".to_string(),
        }
    }

    #[test]
    fn test_render_substitutes_all_placeholders() {
        let loader = PromptLoader::embedded_only();
        let prompt = loader.render(PromptStage::Classify, &context()).unwrap();

        assert!(prompt.contains(r#"{"maxDrivingHoursPerDay": 6.0}"#));
        assert!(prompt.contains("user: hi"));
        assert!(prompt.contains("find restaurants near Paris"));
        assert!(!prompt.contains("{{{"));
    }

    #[test]
    fn test_render_does_not_escape_json_state() {
        let loader = PromptLoader::embedded_only();
        let prompt = loader.render(PromptStage::RouteExtract, &context()).unwrap();
        // Triple-stash placeholders must keep quotes intact
        assert!(prompt.contains(r#""maxDrivingHoursPerDay""#));
        assert!(!prompt.contains("&quot;"));
    }

    #[test]
    fn test_override_directory_wins() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("classify.pmt"), "OVERRIDE {{{message}}}").unwrap();

        let loader = PromptLoader::new(Some(temp.path()));
        let prompt = loader.render(PromptStage::Classify, &context()).unwrap();
        assert_eq!(prompt, "OVERRIDE find restaurants near Paris");

        // Stages without an override file still fall back to embedded
        let respond = loader.render(PromptStage::Respond, &context()).unwrap();
        assert!(respond.contains("travel assistant"));
    }

    #[test]
    fn test_missing_override_dir_is_ignored() {
        let loader = PromptLoader::new(Some("/nonexistent/prompt/dir"));
        assert!(loader.render(PromptStage::Classify, &context()).is_ok());
    }
}
