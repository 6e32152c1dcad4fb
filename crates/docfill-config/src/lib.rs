use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_TITLE_TEMPLATE: &str = "{name} - Resume";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Where credentials come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// Token file or environment variable on a workstation
    #[default]
    Local,
    /// Compute metadata server
    Cloud,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareRole {
    Reader,
    #[default]
    Writer,
    Commenter,
}

/// Who gets access to each generated document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareConfig {
    pub principal: String,
    #[serde(default)]
    pub role: ShareRole,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    /// Pause after every applied batch
    pub batch_delay_ms: u64,
    pub marker_pass_ceiling: usize,
    pub style_chunk_size: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            batch_delay_ms: 500,
            marker_pass_ceiling: 50,
            style_chunk_size: 10,
        }
    }
}

impl PipelineSettings {
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }
}

/// Endpoint overrides, mostly for testing against a fake server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Document copied for every run
    pub template_document_id: String,
    #[serde(default)]
    pub deployment_mode: DeploymentMode,
    /// Bearer token file used in local mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_path: Option<PathBuf>,
    /// Title of generated documents; `{name}` is replaced by the record's name
    #[serde(default = "default_title_template")]
    pub title_template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share: Option<ShareConfig>,
    #[serde(default)]
    pub pipeline: PipelineSettings,
    #[serde(default)]
    pub api: ApiSettings,
}

fn default_title_template() -> String {
    DEFAULT_TITLE_TEMPLATE.to_string()
}

impl Config {
    pub fn new(template_document_id: impl Into<String>) -> Self {
        Self {
            template_document_id: template_document_id.into(),
            deployment_mode: DeploymentMode::default(),
            token_path: None,
            title_template: default_title_template(),
            share: None,
            pipeline: PipelineSettings::default(),
            api: ApiSettings::default(),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the token path
        config.token_path = config
            .token_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/docfill");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
