//! Configuration management for ZkAuth
//!
//! Settings come from two places: an optional TOML/JSON settings file and
//! process-wide properties (see [`PropertySource`]). Properties win over the
//! file so that operators can flip a single switch without editing files.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Property holding the path of the JAAS login configuration file
pub const JAVA_LOGIN_CONFIG_PARAM: &str = "java.security.auth.login.config";
/// Property that disables SASL in the ZooKeeper client when set to anything but `true`
pub const ZK_SASL_CLIENT: &str = "zookeeper.sasl.client";
/// Property naming the login context the ZooKeeper client looks up
pub const ZK_LOGIN_CONTEXT_NAME_KEY: &str = "zookeeper.sasl.clientconfig";

/// Default login context used by the ZooKeeper client
pub const DEFAULT_ZK_LOGIN_CONTEXT_NAME: &str = "Client";

/// Read-only view of process-wide named settings
pub trait PropertySource: Send + Sync {
    /// Look up a property by its dotted name
    fn get(&self, key: &str) -> Option<String>;
}

/// Properties backed by the process environment.
///
/// A dotted key such as `zookeeper.sasl.client` is looked up verbatim first,
/// then as `ZOOKEEPER_SASL_CLIENT`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvProperties;

impl EnvProperties {
    /// Environment variable name for a dotted property key
    pub fn env_key(key: &str) -> String {
        key.chars()
            .map(|c| match c {
                '.' | '-' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect()
    }
}

impl PropertySource for EnvProperties {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key)
            .or_else(|_| std::env::var(Self::env_key(key)))
            .ok()
    }
}

/// In-memory properties, used for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct MapProperties {
    values: HashMap<String, String>,
}

impl MapProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapProperties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl PropertySource for MapProperties {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Properties a JVM derives from the process, then the environment.
///
/// Covers `user.home`, `user.dir`, `user.name` and `file.separator` so that
/// JAAS files written for Java tooling expand the same way.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProperties;

impl PropertySource for SystemProperties {
    fn get(&self, key: &str) -> Option<String> {
        let derived = match key {
            "user.home" => std::env::var("HOME")
                .or_else(|_| std::env::var("USERPROFILE"))
                .ok(),
            "user.dir" => std::env::current_dir()
                .ok()
                .map(|dir| dir.to_string_lossy().into_owned()),
            "user.name" => std::env::var("USER")
                .or_else(|_| std::env::var("USERNAME"))
                .ok(),
            "file.separator" => Some(std::path::MAIN_SEPARATOR.to_string()),
            _ => None,
        };
        derived.or_else(|| EnvProperties.get(key))
    }
}

/// Boolean property semantics: only `true` (any case) is true.
pub fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Settings consulted when deciding whether ZooKeeper needs SASL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZkSaslSettings {
    /// Global kill switch for SASL in the ZooKeeper client
    #[serde(default = "default_sasl_client_enabled")]
    pub sasl_client_enabled: bool,
    /// Login context looked up in the JAAS file
    #[serde(default = "default_login_context_name")]
    pub login_context_name: String,
}

fn default_sasl_client_enabled() -> bool {
    true
}

fn default_login_context_name() -> String {
    DEFAULT_ZK_LOGIN_CONTEXT_NAME.to_string()
}

impl Default for ZkSaslSettings {
    fn default() -> Self {
        Self {
            sasl_client_enabled: default_sasl_client_enabled(),
            login_context_name: default_login_context_name(),
        }
    }
}

impl ZkSaslSettings {
    /// Build settings from properties, falling back to defaults
    pub fn from_properties(props: &dyn PropertySource) -> Self {
        let mut settings = Self::default();
        settings.apply_properties(props);
        settings
    }

    /// Build settings from the process environment
    pub fn from_env() -> Self {
        Self::from_properties(&EnvProperties)
    }

    /// Override fields with any properties that are set
    pub fn apply_properties(&mut self, props: &dyn PropertySource) {
        if let Some(value) = props.get(ZK_SASL_CLIENT) {
            self.sasl_client_enabled = parse_bool(&value);
        }
        if let Some(name) = props.get(ZK_LOGIN_CONTEXT_NAME_KEY) {
            self.login_context_name = name;
        }
    }
}

/// Main configuration structure for ZkAuth
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// ZooKeeper client SASL settings
    #[serde(default)]
    pub zookeeper: ZkSaslSettings,

    /// Security configuration
    #[serde(default)]
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// JAAS login configuration file path
    #[serde(default)]
    pub login_config_path: Option<String>,
}

impl Config {
    /// Load configuration from a TOML/JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;

        let config: Config = if path.as_ref().extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        tracing::debug!(path = %path.as_ref().display(), "Loaded configuration");
        Ok(config)
    }

    /// Override file values with properties that are set
    pub fn apply_properties(&mut self, props: &dyn PropertySource) {
        self.zookeeper.apply_properties(props);
        if let Some(path) = Self::login_config_path_from(props) {
            self.security.login_config_path = Some(path);
        }
    }

    /// JAAS file path from `java.security.auth.login.config`
    pub fn login_config_path_from(props: &dyn PropertySource) -> Option<String> {
        props.get(JAVA_LOGIN_CONFIG_PARAM)
    }
}
