use anyhow::Result;
use serde::Deserialize;
use slog::{Logger, error, info};
use std::fs;

/// What a Delete Session Request does before its Response is seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteSessionPolicy {
    // Mark the nodes' bearers as tearing down and remove them on the Response.
    #[default]
    Deferred,
    // Remove the nodes' sessions straight away.
    Eager,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    // Delete Session handling.
    pub delete_session_policy: DeleteSessionPolicy,

    // Correlate pending bearers with Response bearers by position when neither EBI
    // nor F-TEID identifies them.
    pub positional_fallback: bool,

    // Merge the node's own F-TEIDs from a Create Response into bearers that are
    // already confirmed.
    pub refresh_confirmed_tunnels: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            delete_session_policy: DeleteSessionPolicy::Deferred,
            positional_fallback: true,
            refresh_confirmed_tunnels: true,
        }
    }
}

/// Load replay configuration from a TOML file.  Absent keys take their defaults.
pub fn load_config_file(filename: &str, logger: &Logger) -> Result<Config> {
    let path = std::env::current_dir()?;
    let contents = fs::read_to_string(filename).inspect_err(|e| {
        error!(
            logger,
            "Failed to load config file {filename} (current directory {}) with error code {e}",
            path.display()
        )
    })?;
    let config: Config = toml::from_str(&contents)?;
    info!(logger, "Loaded config from {filename}: {:?}", config);
    Ok(config)
}
