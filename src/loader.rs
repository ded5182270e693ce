//! Document loading - format chosen by file extension
//!
//! | Extension      | Parser       |
//! |----------------|--------------|
//! | `.json`        | serde_json   |
//! | `.toml`        | toml         |
//! | `.yaml`/`.yml` | serde_yaml   |
//!
//! Every parser deserializes straight into [`Document`]. Placeholders are
//! NOT resolved here; that happens when the document enters a context.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::document::Document;
use crate::error::{ConfigError, Result};

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
    Yaml,
}

impl FileFormat {
    /// Pick the format from the file name's extension (case-insensitive)
    pub fn from_path(file: &Path) -> Result<Self> {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        if name.ends_with(".json") {
            Ok(FileFormat::Json)
        } else if name.ends_with(".toml") {
            Ok(FileFormat::Toml)
        } else if name.ends_with(".yaml") || name.ends_with(".yml") {
            Ok(FileFormat::Yaml)
        } else {
            Err(ConfigError::FileTypeNotRecognized {
                file: file.display().to_string(),
            })
        }
    }

    /// Parse `text` in this format
    pub fn parse(self, text: &str) -> Result<Document> {
        match self {
            FileFormat::Json => Ok(serde_json::from_str(text)?),
            FileFormat::Toml => Ok(toml::from_str(text)?),
            FileFormat::Yaml => {
                // An empty YAML file is an empty mapping, not null
                if text.trim().is_empty() {
                    return Ok(Document::Object(Default::default()));
                }
                Ok(serde_yaml::from_str(text)?)
            }
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileFormat::Json => "json",
            FileFormat::Toml => "toml",
            FileFormat::Yaml => "yaml",
        })
    }
}

/// Read and parse a configuration file
pub fn load_document(file: &Path) -> Result<Document> {
    let format = FileFormat::from_path(file)?;
    let text = fs::read_to_string(file)?;
    format.parse(&text)
}
