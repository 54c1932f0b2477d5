//! `mdserver serve` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use mdserver_config::{CliSettings, Config};
use mdserver_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover mdserver.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind to as host:port (overrides config).
    #[arg(short, long, env = "MDSERVER_LISTEN")]
    listen: Option<String>,

    /// Markdown posts directory (overrides config).
    #[arg(long)]
    posts_dir: Option<PathBuf>,

    /// Directory served under /static/ (overrides config).
    #[arg(long)]
    static_dir: Option<PathBuf>,

    /// Directory served under /uploads/ (overrides config).
    #[arg(long)]
    upload_dir: Option<PathBuf>,

    /// Enable verbose output (request and render logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = self.cli_settings();
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }
        let paths = &config.paths_resolved;
        for (label, dir) in [
            ("Posts directory", &paths.posts_dir),
            ("Static directory", &paths.static_dir),
            ("Upload directory", &paths.upload_dir),
        ] {
            output.info(&format!("{label}: {}", dir.display()));
            warn_if_missing(&output, dir);
        }
        output.highlight(&format!("Listening on http://{}", config.server.listen));
        tracing::info!(
            listen = %config.server.listen,
            posts_dir = %paths.posts_dir.display(),
            config = ?config.config_path,
            "Configuration loaded"
        );

        run_server(server_config_from_config(&config))
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }

    /// Collect the config overrides given on the command line.
    pub(crate) fn cli_settings(&self) -> CliSettings {
        CliSettings {
            listen: self.listen.clone(),
            posts_dir: self.posts_dir.clone(),
            static_dir: self.static_dir.clone(),
            upload_dir: self.upload_dir.clone(),
        }
    }
}

/// Missing directories are served as 404s, not a startup error.
fn warn_if_missing(output: &Output, dir: &Path) {
    if !dir.is_dir() {
        output.warning(&format!("  (directory does not exist: {})", dir.display()));
    }
}
