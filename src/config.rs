//! YAML configuration for diagram rendering.
//!
//! Every key is optional; a missing file section keeps the default.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tables left out of the diagram unless the configuration says otherwise
pub const DEFAULT_EXCLUDED_TABLES: &[&str] = &["spatial_ref_sys"];

/// Layout engine hint written into the diagram header
pub const DEFAULT_LAYOUT: &str = "elk";

/// Info string of the opening code fence
pub const DEFAULT_FENCE: &str = "mermaid";

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ErdConfig {
    /// Bare table names to leave out of the diagram
    pub exclude: AHashSet<String>,
    /// Layout hint for the downstream renderer
    pub layout: String,
    /// Code fence language
    pub fence: String,
    /// Append field notes as attribute comments
    pub notes: bool,
}

impl Default for ErdConfig {
    fn default() -> Self {
        Self {
            exclude: DEFAULT_EXCLUDED_TABLES.iter().map(|t| t.to_string()).collect(),
            layout: DEFAULT_LAYOUT.to_string(),
            fence: DEFAULT_FENCE.to_string(),
            notes: false,
        }
    }
}

impl ErdConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml_ng::from_str(content)?)
    }

    /// Add more excluded tables on top of the configured ones
    pub fn with_excludes<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(tables.into_iter().map(Into::into));
        self
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = layout.into();
        self
    }

    pub fn with_fence(mut self, fence: impl Into<String>) -> Self {
        self.fence = fence.into();
        self
    }

    pub fn with_notes(mut self, notes: bool) -> Self {
        self.notes = notes;
        self
    }

    /// Check a bare table name against the exclusion set (case-sensitive)
    pub fn is_excluded(&self, table_name: &str) -> bool {
        self.exclude.contains(table_name)
    }

    /// Excluded names in sorted order, for logs
    pub fn sorted_excludes(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.exclude.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
