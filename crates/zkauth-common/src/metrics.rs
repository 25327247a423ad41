//! Metrics for ZkAuth
//!
//! Counters are emitted through the `metrics` facade; installing an exporter
//! is left to the embedding process.
#![allow(clippy::cast_precision_loss)]

use metrics::{counter, histogram};

/// Outcome of a SASL posture resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    Disabled,
    Enabled,
    Unreadable,
    ParseError,
    Inconsistent,
}

impl ResolutionOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Enabled => "enabled",
            Self::Unreadable => "unreadable",
            Self::ParseError => "parse_error",
            Self::Inconsistent => "inconsistent",
        }
    }
}

/// Record one resolution
pub fn record_resolution(outcome: ResolutionOutcome) {
    counter!("zkauth_sasl_resolutions_total", "outcome" => outcome.as_str()).increment(1);
}

/// Record a parsed login configuration document
pub fn record_login_config_parsed(contexts: usize) {
    counter!("zkauth_login_configs_parsed_total").increment(1);
    histogram!("zkauth_login_config_contexts").record(contexts as f64);
}
