use codeview_engine::highlight::syntect_highlighter::{DEFAULT_DARK_THEME, DEFAULT_LIGHT_THEME};
use codeview_engine::{ColorScheme, StreamState};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

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

    #[error("Invalid value for '{field}' in config file at {config_path}: {reason}")]
    InvalidValue {
        config_path: PathBuf,
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Host dark-mode signal.
    pub dark_mode: bool,
    /// Syntect theme for highlighted code in light mode.
    pub light_theme: String,
    /// Syntect theme for highlighted code in dark mode.
    pub dark_theme: String,
    /// Sentinel agreed with the content producer; the built-in one if unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor_sentinel: Option<String>,
    /// Characters emitted per tick when replaying a document as a stream.
    pub stream_chunk_size: usize,
    pub stream_tick_ms: u64,
    /// Markdown file opened when none is given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_document: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dark_mode: false,
            light_theme: DEFAULT_LIGHT_THEME.to_string(),
            dark_theme: DEFAULT_DARK_THEME.to_string(),
            cursor_sentinel: None,
            stream_chunk_size: 4,
            stream_tick_ms: 30,
            default_document: None,
        }
    }
}

impl Config {
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

        config.validate(config_path)?;

        // Expand shell variables and tilde in the default document path
        config.default_document = config
            .default_document
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Load the user config, falling back to defaults when there is none.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Ok(Self::load()?.unwrap_or_else(|| {
            log::info!(
                "No config file at {}, using defaults",
                Self::config_path().display()
            );
            Self::default()
        }))
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

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/codeview");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn color_scheme(&self) -> ColorScheme {
        ColorScheme::from_dark_mode(self.dark_mode)
    }

    /// Syntect theme name for the given scheme.
    pub fn syntax_theme(&self, scheme: ColorScheme) -> &str {
        match scheme {
            ColorScheme::Light => &self.light_theme,
            ColorScheme::Dark => &self.dark_theme,
        }
    }

    pub fn stream_state(&self) -> StreamState {
        match &self.cursor_sentinel {
            Some(sentinel) => StreamState::with_sentinel(sentinel.clone()),
            None => StreamState::default(),
        }
    }

    fn validate(&self, config_path: &Path) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, reason: &'static str| ConfigError::InvalidValue {
            config_path: config_path.to_path_buf(),
            field,
            reason,
        };
        if self.cursor_sentinel.as_deref() == Some("") {
            return Err(invalid("cursor_sentinel", "must not be empty"));
        }
        if self.stream_chunk_size == 0 {
            return Err(invalid("stream_chunk_size", "must be at least 1"));
        }
        Ok(())
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
