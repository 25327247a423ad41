//! ZkAuth Common - Shared utilities and types
//!
//! This crate provides functionality shared by the ZkAuth crates:
//! - Error types and handling
//! - Configuration management and property sources
//! - Metrics helpers

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod metrics;

pub use config::{Config, PropertySource, SystemProperties, ZkSaslSettings};
pub use error::{ConfigurationError, Error, LoginConfigError, Result};
