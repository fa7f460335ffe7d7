//! Configuration system for guardgen.
//!
//! Loads config from:
//! 1. Global: ~/.config/guardgen/config.toml
//! 2. Per-project: .guardgen/config.toml (overrides global)
//! 3. An explicit `--config` file (overrides both)
//!
//! Example config.toml:
//! ```toml
//! [output]
//! runtime_module = "guardz"
//! exported_only = true
//! ```

use anyhow::Context;
use guardgen_core::GenerateOptions;
use guardgen_core::generator::DEFAULT_RUNTIME_MODULE;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Module the runtime helpers and `TypeGuardFn` are imported from.
    pub runtime_module: String,
    /// Whether `--all` skips declarations without `export`.
    pub exported_only: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            runtime_module: DEFAULT_RUNTIME_MODULE.to_string(),
            exported_only: true,
        }
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuardgenConfig {
    pub output: OutputConfig,
}

/// One config file as written; unset keys keep the lower layer's value.
#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    output: OutputFile,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct OutputFile {
    runtime_module: Option<String>,
    exported_only: Option<bool>,
}

impl GuardgenConfig {
    /// Load configuration for a project rooted at `root`.
    ///
    /// Missing global and project files are skipped and invalid ones are
    /// reported and skipped. An explicit file must exist and parse.
    pub fn load(root: &Path, explicit: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            config.apply_optional(&global_path);
        }

        let project_path = root.join(".guardgen").join("config.toml");
        config.apply_optional(&project_path);

        if let Some(path) = explicit {
            let file = Self::load_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?;
            config.apply(file);
        }

        Ok(config)
    }

    /// Options for the core generator.
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            runtime_module: self.output.runtime_module.clone(),
            exported_only: self.output.exported_only,
        }
    }

    /// Get the global config path.
    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("guardgen").join("config.toml"))
    }

    fn apply_optional(&mut self, path: &Path) {
        if !path.is_file() {
            return;
        }
        match Self::load_file(path) {
            Ok(file) => {
                debug!(path = %path.display(), "loaded config");
                self.apply(file);
            }
            Err(e) => warn!(path = %path.display(), "ignoring config: {e:#}"),
        }
    }

    fn load_file(path: &Path) -> anyhow::Result<ConfigFile> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn apply(&mut self, file: ConfigFile) {
        if let Some(module) = file.output.runtime_module {
            self.output.runtime_module = module;
        }
        if let Some(exported_only) = file.output.exported_only {
            self.output.exported_only = exported_only;
        }
    }
}
