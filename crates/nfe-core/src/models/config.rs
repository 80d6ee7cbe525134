//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{NfeError, Result};

/// XML namespace of the NFe schema.
pub const NFE_NAMESPACE: &str = "http://www.portalfiscal.inf.br/nfe";

/// Literal prefix of the `infNFe/@Id` attribute.
pub const NFE_KEY_PREFIX: &str = "NFe";

/// Main configuration for the nfe pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NfeConfig {
    /// Invoice extraction configuration.
    pub extraction: ExtractionConfig,

    /// Spreadsheet output configuration.
    pub output: OutputConfig,

    /// Batch processing configuration.
    pub batch: BatchConfig,
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Namespace URI the NFe elements are bound to.
    pub namespace: String,

    /// Prefix stripped from the `Id` attribute to form the invoice key.
    pub key_prefix: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            namespace: NFE_NAMESPACE.to_string(),
            key_prefix: NFE_KEY_PREFIX.to_string(),
        }
    }
}

/// Spreadsheet output configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File name of the exported workbook.
    pub file_name: String,

    /// Name of the single worksheet.
    pub sheet_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: crate::export::DEFAULT_FILE_NAME.to_string(),
            sheet_name: crate::export::DEFAULT_SHEET_NAME.to_string(),
        }
    }
}

/// Batch processing configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Skip documents that fail instead of aborting the run.
    pub continue_on_error: bool,
}

impl NfeConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| NfeError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| NfeError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = NfeConfig::default();
        assert_eq!(config.extraction.namespace, NFE_NAMESPACE);
        assert_eq!(config.extraction.key_prefix, "NFe");
        assert_eq!(config.output.file_name, "notas_fiscais.xlsx");
        assert!(!config.batch.continue_on_error);
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let config: NfeConfig =
            serde_json::from_str(r#"{"batch": {"continue_on_error": true}}"#).unwrap();

        assert!(config.batch.continue_on_error);
        assert_eq!(config.extraction, ExtractionConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = NfeConfig::default();
        config.output.sheet_name = "Lotes".to_string();
        config.save(&path).unwrap();

        assert_eq!(NfeConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(NfeConfig::from_file(&path), Err(NfeError::Config(_))));
    }
}
