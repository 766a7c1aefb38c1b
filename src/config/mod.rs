use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path, time::Duration};

use crate::service::DEFAULT_RESET_DELAY;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_base_url: String,
    #[serde(with = "humantime_serde", default = "default_status_reset_delay")]
    pub status_reset_delay: Duration,
    #[serde(with = "humantime_serde", default)]
    pub request_timeout: Option<Duration>,
}

const fn default_status_reset_delay() -> Duration {
    DEFAULT_RESET_DELAY
}

fn parse(contents: &str) -> Result<Config, Box<dyn std::error::Error>> {
    serde_yaml::from_str(contents).map_err(Into::into)
}

fn load_from_vars<I>(vars: I) -> Result<Config, envy::Error>
where
    I: IntoIterator<Item = (String, String)>,
{
    envy::prefixed("NOTES_").from_iter(vars)
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path =
        env::var("NOTES_FRONTEND_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        return parse(&fs::read_to_string(&config_path)?);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return parse(&fs::read_to_string("config.yaml")?);
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'",
            config_path
        );
        return parse(&fs::read_to_string("config.example.yaml")?);
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, attempting to load configuration from environment variables"
    );
    load_from_vars(env::vars()).map_err(|e| {
        format!(
            "Config file not found and environment variables are incomplete. \
             Tried: '{config_path}', 'config.yaml', 'config.example.yaml', and NOTES_* variables. \
             Error: {e}"
        )
        .into()
    })
}
