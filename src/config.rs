use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::analyzers::category::{CategoryField, CategoryKey, KeyNormalization};
use crate::record::DEFAULT_ANNOTATION_MARKER;

/// Engine settings.
///
/// Stored as a JSON object on disk; every field is optional:
/// ```json
/// {
///   "annotation_marker": "REND",
///   "category_field": "driver",
///   "normalization": "exact"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub annotation_marker: String,
    pub category_field: CategoryField,
    pub normalization: KeyNormalization,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            annotation_marker: DEFAULT_ANNOTATION_MARKER.to_string(),
            category_field: CategoryField::default(),
            normalization: KeyNormalization::default(),
        }
    }
}

impl EngineConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading config '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("invalid config '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// An empty marker would match every note.
    pub fn validate(&self) -> Result<()> {
        if self.annotation_marker.trim().is_empty() {
            bail!("annotation_marker must not be empty");
        }
        Ok(())
    }

    pub fn category_key(&self) -> CategoryKey {
        CategoryKey::new(self.category_field, self.normalization)
    }
}
