use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{MakerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
    Toml,
}

impl DocumentFormat {
    /// Picks the format from the file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("toml") => Ok(Self::Toml),
            _ => Err(MakerError::InvalidDocument(format!(
                "unsupported document extension: {} (expected .json, .yaml, .yml or .toml)",
                path.display()
            ))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        }
    }

    pub(super) fn parse<T: DeserializeOwned>(self, raw: &str) -> Result<T> {
        match self {
            Self::Json => serde_json::from_str(raw)
                .map_err(|err| MakerError::InvalidDocument(err.to_string())),
            Self::Yaml => parse_yaml(raw),
            Self::Toml => parse_toml(raw),
        }
    }
}

#[cfg(feature = "yaml-documents")]
fn parse_yaml<T: DeserializeOwned>(raw: &str) -> Result<T> {
    serde_norway::from_str(raw).map_err(|err| MakerError::InvalidDocument(err.to_string()))
}

#[cfg(not(feature = "yaml-documents"))]
fn parse_yaml<T: DeserializeOwned>(_raw: &str) -> Result<T> {
    Err(MakerError::Unsupported(
        "yaml documents require the yaml-documents feature".to_string(),
    ))
}

#[cfg(feature = "toml-documents")]
fn parse_toml<T: DeserializeOwned>(raw: &str) -> Result<T> {
    toml::from_str(raw).map_err(|err| MakerError::InvalidDocument(err.to_string()))
}

#[cfg(not(feature = "toml-documents"))]
fn parse_toml<T: DeserializeOwned>(_raw: &str) -> Result<T> {
    Err(MakerError::Unsupported(
        "toml documents require the toml-documents feature".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_selects_format() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("ontology.JSON")).expect("json"),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("dir/ontology.yml")).expect("yml"),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("ontology.toml")).expect("toml"),
            DocumentFormat::Toml
        );
        let err = DocumentFormat::from_path(Path::new("ontology.ts")).expect_err("ts must fail");
        assert!(matches!(err, MakerError::InvalidDocument(_)));
        assert!(DocumentFormat::from_path(Path::new("ontology")).is_err());
    }
}
