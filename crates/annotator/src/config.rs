//! Configuration file loading for the annotator.
//!
//! Settings live in `annotator.toml` in the working directory. Every
//! field has a default matching the fixed run configuration, so a missing
//! file (or a partial one) still yields a usable config. All values are
//! read once at startup and are read-only afterwards.

use crate::model::SamplingConfig;
use annotate_analysis::{AnalysisOptions, ResourceLimits};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Engine process and search settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EngineConfig {
    /// Path to the Stockfish executable. Defaults to "stockfish"
    /// (assumes it's in PATH).
    #[serde(default = "default_engine_path")]
    pub path: String,
    /// Search threads per analysis.
    #[serde(default = "default_threads")]
    pub threads: u32,
    /// Hash table size in MB.
    #[serde(default = "default_hash_mb")]
    pub hash_mb: u32,
    /// Number of principal variations to request.
    #[serde(default = "default_lines")]
    pub lines: usize,
    /// Time budget per position in milliseconds.
    #[serde(default = "default_time_ms")]
    pub time_ms: u64,
    /// Maximum search depth.
    #[serde(default = "default_depth")]
    pub depth: u32,
}

fn default_engine_path() -> String {
    "stockfish".to_string()
}

fn default_threads() -> u32 {
    12
}

fn default_hash_mb() -> u32 {
    2048
}

fn default_lines() -> usize {
    3
}

fn default_time_ms() -> u64 {
    2000
}

fn default_depth() -> u32 {
    30
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            path: default_engine_path(),
            threads: default_threads(),
            hash_mb: default_hash_mb(),
            lines: default_lines(),
            time_ms: default_time_ms(),
            depth: default_depth(),
        }
    }
}

impl EngineConfig {
    pub fn limits(&self) -> ResourceLimits {
        ResourceLimits {
            threads: self.threads,
            hash_mb: self.hash_mb,
        }
    }

    pub fn options(&self) -> AnalysisOptions {
        AnalysisOptions {
            line_count: self.lines,
            time_budget: Duration::from_millis(self.time_ms),
            depth_cap: self.depth,
        }
    }
}

/// Reasoning model endpoint and sampling settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ModelConfig {
    /// Base URL of the Ollama server.
    #[serde(default = "default_model_url")]
    pub url: String,
    /// Model name to request.
    #[serde(default = "default_model_name")]
    pub name: String,
    /// Sampling knobs sent with every chat request.
    #[serde(default)]
    pub sampling: SamplingConfig,
}

fn default_model_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model_name() -> String {
    "qwen3.5:cloud".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            url: default_model_url(),
            name: default_model_name(),
            sampling: SamplingConfig::default(),
        }
    }
}

/// Main annotator configuration structure.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct AnnotatorConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

impl AnnotatorConfig {
    /// Loads the configuration from `annotator.toml` in the working
    /// directory, falling back to defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be
    /// read, or [`ConfigError::ParseError`] if it contains invalid TOML.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::config_path())
    }

    /// Loads the configuration from an explicit path.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Returns the default configuration file path.
    pub fn config_path() -> PathBuf {
        PathBuf::from("annotator.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fixed_run_configuration() {
        let config = AnnotatorConfig::default();
        assert_eq!(config.engine.path, "stockfish");
        assert_eq!(config.engine.threads, 12);
        assert_eq!(config.engine.hash_mb, 2048);
        assert_eq!(config.engine.lines, 3);
        assert_eq!(config.engine.time_ms, 2000);
        assert_eq!(config.engine.depth, 30);
        assert_eq!(config.model.url, "http://localhost:11434");
        assert_eq!(config.model.name, "qwen3.5:cloud");
    }

    #[test]
    fn parses_partial_toml_with_defaults() {
        let config: AnnotatorConfig = toml::from_str(
            r#"
            [engine]
            path = "/opt/stockfish/stockfish"
            threads = 4

            [model]
            name = "llama3"
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.path, "/opt/stockfish/stockfish");
        assert_eq!(config.engine.threads, 4);
        // Untouched fields fall back to defaults.
        assert_eq!(config.engine.hash_mb, 2048);
        assert_eq!(config.model.name, "llama3");
        assert_eq!(config.model.url, "http://localhost:11434");
    }

    #[test]
    fn engine_config_converts_to_analysis_types() {
        let engine = EngineConfig {
            lines: 5,
            time_ms: 750,
            depth: 18,
            ..EngineConfig::default()
        };
        let options = engine.options();
        assert_eq!(options.line_count, 5);
        assert_eq!(options.time_budget, Duration::from_millis(750));
        assert_eq!(options.depth_cap, 18);

        let limits = engine.limits();
        assert_eq!(limits.threads, 12);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = AnnotatorConfig::load_from("/nonexistent/annotator.toml").unwrap();
        assert_eq!(config.engine.path, "stockfish");
    }

    #[test]
    fn sampling_section_parses() {
        let config: AnnotatorConfig = toml::from_str(
            r#"
            [model.sampling]
            temperature = 0.2
            top_k = 40
            "#,
        )
        .unwrap();
        assert_eq!(config.model.sampling.temperature, 0.2);
        assert_eq!(config.model.sampling.top_k, 40);
        assert_eq!(config.model.sampling.top_p, 0.95);
    }
}
