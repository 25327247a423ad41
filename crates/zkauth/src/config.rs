//! Configuration loading

use std::path::Path;

use anyhow::Result;
use zkauth_common::config::{Config, EnvProperties, PropertySource};

/// Values given on the command line, applied last
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub login_config: Option<String>,
    pub context: Option<String>,
    pub sasl_client: Option<bool>,
}

impl Overrides {
    pub fn apply(self, config: &mut Config) {
        if let Some(path) = self.login_config {
            config.security.login_config_path = Some(path);
        }
        if let Some(name) = self.context {
            config.zookeeper.login_context_name = name;
        }
        if let Some(enabled) = self.sasl_client {
            config.zookeeper.sasl_client_enabled = enabled;
        }
    }
}

/// Settings file, then environment, then command line
pub fn load(path: Option<&str>, overrides: Overrides) -> Result<Config> {
    load_with(path, &EnvProperties, overrides)
}

pub fn load_with(
    path: Option<&str>,
    props: &dyn PropertySource,
    overrides: Overrides,
) -> Result<Config> {
    let mut config = match path.map(Path::new) {
        Some(path) if path.exists() => Config::load(path)?,
        Some(path) => {
            tracing::warn!(path = %path.display(), "Settings file not found, using defaults");
            Config::default()
        }
        None => Config::default(),
    };

    config.apply_properties(props);
    overrides.apply(&mut config);
    Ok(config)
}
