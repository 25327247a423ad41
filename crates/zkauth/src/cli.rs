//! CLI handlers

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use zkauth_common::config::{Config, SystemProperties};
use zkauth_security::{JaasFileParser, LoginConfigParser, SecurityModeResolver};

/// Resolve the ZooKeeper SASL posture.
///
/// Option values are kept verbatim: only context presence matters here, so the
/// answer matches `is_zk_security_enabled` for the same file.
pub fn check(config: &Config) -> Result<bool> {
    let resolver = SecurityModeResolver::new(config.zookeeper.clone());
    let enabled = resolver
        .resolve(config.security.login_config_path.as_deref())
        .context("Unable to determine ZooKeeper SASL posture")?;

    info!(
        context = %config.zookeeper.login_context_name,
        enabled,
        "ZooKeeper SASL posture resolved"
    );
    Ok(enabled)
}

/// Parse a JAAS file, expanding `${...}` like a JVM would
pub fn read_contexts(path: &str) -> Result<zkauth_security::LoginConfiguration> {
    JaasFileParser::new()
        .with_properties(Arc::new(SystemProperties))
        .parse(Path::new(path))
        .with_context(|| format!("Failed to parse {path}"))
}

/// Print each login context and its modules
pub fn list_contexts(path: &str) -> Result<()> {
    let login_config = read_contexts(path)?;

    for (name, entries) in login_config.contexts() {
        println!("{name} ({} modules)", entries.len());
        for entry in entries {
            let keys: Vec<&str> = entry.options.keys().map(String::as_str).collect();
            println!("  {} {} [{}]", entry.login_module, entry.flag, keys.join(", "));
        }
    }
    Ok(())
}
