//! ZkAuth Security Layer
//!
//! Provides:
//! - JAAS login configuration parsing
//! - ZooKeeper SASL posture resolution

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod jaas;

mod resolver;

pub use jaas::{ControlFlag, JaasFileParser, LoginConfigParser, LoginConfiguration, LoginModuleEntry};
pub use resolver::{
    is_zk_security_enabled, SecurityModeResolver, JAVA_LOGIN_CONFIG_PARAM, LOGIN_CONTEXT_CLIENT,
    LOGIN_CONTEXT_SERVER, SERVICE_NAME, ZK_LOGIN_CONTEXT_NAME_KEY, ZK_SASL_CLIENT,
};
