//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `GENFORGE__<SECTION>__<KEY>` environment variables
//! 3. Config file (`--config`, or the platform config dir)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use genforge_adapters::EnhancerSettings;
use genforge_core::application::GenerationOptions;

/// Prefix of the environment overrides, e.g. `GENFORGE__ENHANCER__MODEL`.
pub const ENV_PREFIX: &str = "GENFORGE";

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub output: OutputConfig,
    pub generation: GenerationConfig,
    pub enhancer: EnhancerConfig,
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Directory projects are created in when `--output` is not given.
    pub output_root: PathBuf,
    /// Concurrent file writes; `0` picks a value from the CPU count.
    pub write_workers: usize,
    pub post_enhance: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("."),
            write_workers: 0,
            post_enhance: false,
        }
    }
}

impl GenerationConfig {
    pub fn options(&self) -> GenerationOptions {
        let defaults = GenerationOptions::default();
        GenerationOptions {
            write_workers: if self.write_workers == 0 {
                defaults.write_workers
            } else {
                self.write_workers
            },
            post_enhance: self.post_enhance,
        }
    }
}

/// OpenAI-compatible chat completion endpoint used for enhancement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancerConfig {
    pub enabled: bool,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout_secs: u64,
    pub temperature: Option<f32>,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        let settings = EnhancerSettings::default();
        Self {
            enabled: false,
            base_url: settings.base_url,
            api_key: settings.api_key,
            model: settings.model,
            timeout_secs: settings.timeout.as_secs(),
            temperature: settings.temperature,
        }
    }
}

impl EnhancerConfig {
    pub fn settings(&self) -> EnhancerSettings {
        EnhancerSettings {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            temperature: self.temperature,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory of `*.toml` / `*.json` template manifests.
    pub manifest_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration, starting from defaults.
    ///
    /// `config_file` is the path the user passed via `--config`; it must
    /// exist. Without it the default location is used when present.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("failed to serialise default config")?;

        let file = match config_file {
            Some(path) => file_source(path).required(true),
            None => file_source(&Self::config_path()).required(false),
        };

        let loaded = Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read configuration")?;

        let config: Self = loaded
            .try_deserialize()
            .context("invalid configuration")?;
        debug!(?config.generation, enhancer = config.enhancer.enabled, "Configuration loaded");
        Ok(config)
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.genforge.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "genforge", "genforge")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".genforge.toml"))
    }
}

fn file_source(path: &Path) -> File<config::FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Toml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_conservative() {
        let cfg = AppConfig::default();
        assert!(!cfg.enhancer.enabled);
        assert!(!cfg.generation.post_enhance);
        assert_eq!(cfg.generation.output_root, PathBuf::from("."));
        assert!(cfg.templates.manifest_dir.is_none());
    }

    #[test]
    fn file_overrides_defaults() {
        let file = write_config(
            r#"
[enhancer]
enabled = true
model = "qwen2.5-coder"
timeout_secs = 5

[generation]
write_workers = 2
"#,
        );
        let cfg = AppConfig::load(Some(&file.path().to_path_buf())).unwrap();

        assert!(cfg.enhancer.enabled);
        assert_eq!(cfg.enhancer.model, "qwen2.5-coder");
        assert_eq!(cfg.enhancer.settings().timeout, Duration::from_secs(5));
        assert_eq!(cfg.generation.options().write_workers, 2);
        // untouched keys keep their defaults
        assert_eq!(cfg.output.format, "auto");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let file = write_config("[generation]\nwrite_workers = \"many\"\n");
        assert!(AppConfig::load(Some(&file.path().to_path_buf())).is_err());
    }

    #[test]
    fn zero_workers_falls_back_to_cpu_count() {
        let cfg = AppConfig::default();
        assert!(cfg.generation.options().write_workers >= 1);
    }

    #[test]
    fn config_path_is_not_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
