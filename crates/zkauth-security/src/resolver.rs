//! ZooKeeper SASL posture resolution
//!
//! Decides at startup whether the ZooKeeper client must authenticate with
//! SASL, based on the JAAS login configuration and the `zookeeper.sasl.client`
//! kill switch.

use std::fs::File;
use std::path::Path;

use tracing::{debug, error};

use zkauth_common::config::ZkSaslSettings;
use zkauth_common::error::{ConfigurationError, Result};
use zkauth_common::metrics::{self, ResolutionOutcome};

use crate::jaas::{JaasFileParser, LoginConfigParser};

pub use zkauth_common::config::{JAVA_LOGIN_CONFIG_PARAM, ZK_LOGIN_CONTEXT_NAME_KEY, ZK_SASL_CLIENT};

/// Login context used by brokers
pub const LOGIN_CONTEXT_SERVER: &str = "KafkaServer";
/// Login context used by clients
pub const LOGIN_CONTEXT_CLIENT: &str = "KafkaClient";
/// Option key naming the SASL service
pub const SERVICE_NAME: &str = "serviceName";

/// Resolves whether the ZooKeeper connection must use SASL
#[derive(Debug, Clone)]
pub struct SecurityModeResolver<P = JaasFileParser> {
    settings: ZkSaslSettings,
    parser: P,
}

impl SecurityModeResolver<JaasFileParser> {
    /// Resolver using the standard JAAS parser
    pub fn new(settings: ZkSaslSettings) -> Self {
        Self::with_parser(settings, JaasFileParser::new())
    }
}

impl<P: LoginConfigParser> SecurityModeResolver<P> {
    pub fn with_parser(settings: ZkSaslSettings, parser: P) -> Self {
        Self { settings, parser }
    }

    pub fn settings(&self) -> &ZkSaslSettings {
        &self.settings
    }

    /// Returns `true` when the JAAS file at `login_config_path` defines the
    /// configured login context with at least one module.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::Unreadable`] if the path is not a readable file
    /// - [`ConfigurationError::Parse`] if the document cannot be parsed
    /// - [`ConfigurationError::InconsistentSasl`] if the document enables SASL
    ///   but `zookeeper.sasl.client` disables it
    pub fn resolve(&self, login_config_path: Option<&str>) -> Result<bool> {
        let Some(path) = login_config_path.filter(|p| !p.is_empty()) else {
            debug!("No JAAS login configuration, ZooKeeper SASL disabled");
            metrics::record_resolution(ResolutionOutcome::Disabled);
            return Ok(false);
        };
        let path = Path::new(path);

        if !is_readable_file(path) {
            metrics::record_resolution(ResolutionOutcome::Unreadable);
            return Err(ConfigurationError::Unreadable(path.to_path_buf()).into());
        }

        let login_config = self.parser.parse(path).map_err(|source| {
            metrics::record_resolution(ResolutionOutcome::ParseError);
            ConfigurationError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let context = self.settings.login_context_name.as_str();
        let enabled = login_config.entries(context).is_some();

        if enabled && !self.settings.sasl_client_enabled {
            error!(
                login_config = %path.display(),
                context,
                "JAAS file is present, but system property {} is set to false, which disables SASL in the ZooKeeper client",
                ZK_SASL_CLIENT
            );
            metrics::record_resolution(ResolutionOutcome::Inconsistent);
            return Err(ConfigurationError::InconsistentSasl.into());
        }

        debug!(
            login_config = %path.display(),
            context,
            enabled,
            "Resolved ZooKeeper SASL posture"
        );
        metrics::record_resolution(if enabled {
            ResolutionOutcome::Enabled
        } else {
            ResolutionOutcome::Disabled
        });
        Ok(enabled)
    }
}

/// Resolve with the standard JAAS parser.
///
/// See [`SecurityModeResolver::resolve`].
pub fn is_zk_security_enabled(
    login_config_path: Option<&str>,
    settings: &ZkSaslSettings,
) -> Result<bool> {
    SecurityModeResolver::new(settings.clone()).resolve(login_config_path)
}

fn is_readable_file(path: &Path) -> bool {
    File::open(path)
        .and_then(|file| file.metadata())
        .is_ok_and(|meta| meta.is_file())
}
