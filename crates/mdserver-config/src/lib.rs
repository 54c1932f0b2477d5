//! Configuration management for mdserver.
//!
//! Parses `mdserver.toml` with serde and discovers the file in the current
//! directory or its parents. Every setting has a default, so running without
//! a config file is valid.
//!
//! ```toml
//! [server]
//! listen = "127.0.0.1:3000"
//!
//! [paths]
//! posts_dir = "posts"
//! static_dir = "public/static"
//! upload_dir = "public/uploads"
//! ```
//!
//! Relative paths resolve against the directory holding the config file.
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! `server.listen` supports environment variable expansion:
//! `${VAR}` errors if VAR is unset, `${VAR:-default}` falls back to `default`.

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdserver.toml";

/// CLI settings that override configuration file values.
///
/// Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override listen address.
    pub listen: Option<String>,
    /// Override Markdown posts directory.
    pub posts_dir: Option<PathBuf>,
    /// Override static assets directory.
    pub static_dir: Option<PathBuf>,
    /// Override uploads directory.
    pub upload_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Directory configuration (relative strings from TOML).
    paths: PathsConfigRaw,

    /// Resolved directories (set after loading).
    #[serde(skip)]
    pub paths_resolved: PathsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on, as `host:port`.
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:3000".to_owned(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PathsConfigRaw {
    posts_dir: Option<String>,
    static_dir: Option<String>,
    upload_dir: Option<String>,
}

/// Resolved directory configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PathsConfig {
    /// Directory holding Markdown posts (`index.md` is the home page).
    pub posts_dir: PathBuf,
    /// Directory served under `/static/`.
    pub static_dir: PathBuf,
    /// Directory served under `/uploads/`.
    pub upload_dir: PathBuf,
}

impl PathsConfig {
    /// Resolve directories against `base`, falling back to defaults.
    fn resolve(
        base: &Path,
        posts_dir: Option<&str>,
        static_dir: Option<&str>,
        upload_dir: Option<&str>,
    ) -> Self {
        Self {
            posts_dir: base.join(posts_dir.unwrap_or("posts")),
            static_dir: base.join(static_dir.unwrap_or("public/static")),
            upload_dir: base.join(upload_dir.unwrap_or("public/uploads")),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`server.listen`").
        field: String,
        /// Error message (e.g., "${`MDSERVER_PORT`} not set").
        message: String,
    },
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdserver.toml` in current directory and parents.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if `server.listen` is not `host:port`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let listen = &self.server.listen;
        let Some((host, port)) = listen.rsplit_once(':') else {
            return Err(ConfigError::Validation(format!(
                "server.listen must be host:port, got {listen:?}"
            )));
        };
        if host.is_empty() {
            return Err(ConfigError::Validation(
                "server.listen host cannot be empty".to_owned(),
            ));
        }
        if port.parse::<u16>().is_err() {
            return Err(ConfigError::Validation(format!(
                "server.listen has invalid port {port:?}"
            )));
        }
        Ok(())
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(listen) = &settings.listen {
            self.server.listen.clone_from(listen);
        }
        if let Some(posts_dir) = &settings.posts_dir {
            self.paths_resolved.posts_dir.clone_from(posts_dir);
        }
        if let Some(static_dir) = &settings.static_dir {
            self.paths_resolved.static_dir.clone_from(static_dir);
        }
        if let Some(upload_dir) = &settings.upload_dir {
            self.paths_resolved.upload_dir.clone_from(upload_dir);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            paths: PathsConfigRaw::default(),
            paths_resolved: PathsConfig::resolve(base, None, None, None),
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.listen = expand::expand_env(&self.server.listen, "server.listen")?;
        Ok(())
    }

    fn resolve_paths(&mut self, config_dir: &Path) {
        self.paths_resolved = PathsConfig::resolve(
            config_dir,
            self.paths.posts_dir.as_deref(),
            self.paths.static_dir.as_deref(),
            self.paths.upload_dir.as_deref(),
        );
    }
}
