//! Configuration types for the nozzle finder.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of the nozzle grid the strips are matched against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Total number of nozzles on the head (grid size N)
    #[serde(default = "default_nozzle_count")]
    pub nozzle_count: usize,

    /// Maximum deviation, in nozzle steps, between a point and its nearest index
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_nozzle_count() -> usize {
    636
}

fn default_tolerance() -> f64 {
    0.25
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            nozzle_count: default_nozzle_count(),
            tolerance: default_tolerance(),
        }
    }
}

/// Settings for the exported index list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Leading part of the output filename
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Head model tag placed between the date and the machine id
    #[serde(default = "default_model_tag")]
    pub model_tag: String,

    /// Machine identifier suffix (e.g. "04"); export is skipped when absent
    #[serde(default)]
    pub machine: Option<String>,

    /// Added to every index on export (1 for one-based nozzle numbering)
    #[serde(default)]
    pub index_offset: usize,
}

fn default_file_prefix() -> String {
    "flaw_nozzle".to_string()
}

fn default_model_tag() -> String {
    "680k".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_prefix: default_file_prefix(),
            model_tag: default_model_tag(),
            machine: None,
            index_offset: 0,
        }
    }
}

/// Main configuration combining all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

impl PipelineConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_matching_config() {
        let config = MatchingConfig::default();
        assert_eq!(config.nozzle_count, 636);
        assert!((config.tolerance - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_default_pipeline_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.export.file_prefix, "flaw_nozzle");
        assert_eq!(config.export.model_tag, "680k");
        assert!(config.export.machine.is_none());
        assert_eq!(config.export.index_offset, 0);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: PipelineConfig =
            serde_yaml::from_str("matching:\n  tolerance: 0.4\nexport:\n  machine: \"07\"\n")
                .unwrap();
        assert_eq!(config.matching.nozzle_count, 636);
        assert!((config.matching.tolerance - 0.4).abs() < 1e-12);
        assert_eq!(config.export.machine.as_deref(), Some("07"));
        assert_eq!(config.export.model_tag, "680k");
    }

    #[test]
    fn test_yaml_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nozzle.yaml");

        let mut config = PipelineConfig::default();
        config.matching.nozzle_count = 1280;
        config.export.index_offset = 1;
        config.to_yaml(&path).unwrap();

        let loaded = PipelineConfig::from_yaml(&path).unwrap();
        assert_eq!(loaded.matching.nozzle_count, 1280);
        assert_eq!(loaded.export.index_offset, 1);
    }
}
