use std::path::PathBuf;

use crate::error::Result;
use crate::naming::normalize_namespace;

mod env;

pub const ENV_NAMESPACE: &str = "ONTOMAKER_NAMESPACE";
pub const ENV_OUTPUT_DIR: &str = "ONTOMAKER_OUTPUT_DIR";
pub const ENV_EXPORT_STATIC: &str = "ONTOMAKER_EXPORT_STATIC";
pub const ENV_LOG: &str = "ONTOMAKER_LOG";

const DEFAULT_LOG_FILTER: &str = "info";

/// Compiler settings sourced from the process environment.
///
/// Command-line flags take precedence; see [`CompilerConfig::with_overrides`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    pub namespace: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub export_static: bool,
    pub log_filter: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            output_dir: None,
            export_static: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl CompilerConfig {
    pub fn from_env() -> Result<Self> {
        let namespace = env::read_non_empty_env(ENV_NAMESPACE)
            .map(|raw| normalize_namespace(&raw))
            .transpose()?;
        Ok(Self {
            namespace,
            output_dir: env::read_env_path(ENV_OUTPUT_DIR),
            export_static: env::parse_enabled_default_true(
                std::env::var(ENV_EXPORT_STATIC).ok().as_deref(),
            ),
            log_filter: env::read_non_empty_env(ENV_LOG)
                .or_else(|| env::read_non_empty_env("RUST_LOG"))
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }

    pub fn with_overrides(
        mut self,
        namespace: Option<&str>,
        output_dir: Option<PathBuf>,
        skip_export: bool,
    ) -> Result<Self> {
        if let Some(raw) = namespace {
            self.namespace = Some(normalize_namespace(raw)?);
        }
        if output_dir.is_some() {
            self.output_dir = output_dir;
        }
        if skip_export {
            self.export_static = false;
        }
        Ok(self)
    }

    /// Directory the static export writer should target, if any.
    #[must_use]
    pub fn export_dir(&self) -> Option<&std::path::Path> {
        if self.export_static {
            self.output_dir.as_deref()
        } else {
            None
        }
    }
}
