//! Configuration for the content moderation pipeline.

use serde::Deserialize;
use std::collections::HashMap;

/// Thresholds and weights driving automatic moderation decisions.
#[derive(Debug, Clone, Deserialize)]
pub struct ModerationConfig {
    /// Scores strictly above this mark a post as approved
    pub racism_threshold: f64,

    /// Scores strictly below this mark a post as hidden
    pub critical_threshold: f64,

    /// Weight of the current automatic score when blending in reports
    pub auto_weight: f64,

    /// Weight of the racism report ratio when blending
    pub report_weight: f64,

    /// Timeout for external scoring calls in seconds
    pub provider_timeout_seconds: u64,

    /// Keyword fallback table mapping lowercase terms to score weights.
    /// Empty by default; operators populate it via `moderation.toml` or
    /// `PILLORY_MODERATION__RACIST_TERMS__<term>` environment variables.
    #[serde(default)]
    pub racist_terms: HashMap<String, f64>,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            racism_threshold: 0.5,
            critical_threshold: 0.2,
            auto_weight: 0.7,
            report_weight: 0.3,
            provider_timeout_seconds: 5,
            racist_terms: HashMap::new(),
        }
    }
}

impl ModerationConfig {
    /// Load moderation settings layered over the built-in defaults.
    ///
    /// Sources, later ones winning: defaults, an optional `moderation.toml`
    /// in the working directory, then `PILLORY_MODERATION__*` environment
    /// variables.
    ///
    /// # Errors
    ///
    /// Returns an error when a source is present but malformed.
    pub fn load() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let settings = config::Config::builder()
            .set_default("racism_threshold", defaults.racism_threshold)?
            .set_default("critical_threshold", defaults.critical_threshold)?
            .set_default("auto_weight", defaults.auto_weight)?
            .set_default("report_weight", defaults.report_weight)?
            .set_default("provider_timeout_seconds", defaults.provider_timeout_seconds)?
            .add_source(config::File::with_name("moderation").required(false))
            .add_source(
                config::Environment::with_prefix("PILLORY_MODERATION")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize::<Self>()?)
    }
}
