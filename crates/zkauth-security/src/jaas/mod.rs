//! JAAS login configuration documents
//!
//! A document maps login context names to ordered lists of login module
//! entries. [`LoginConfigParser`] is the seam the resolver depends on;
//! [`JaasFileParser`] is the standard implementation.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use zkauth_common::error::LoginConfigError;

mod parser;

pub use parser::JaasFileParser;

/// Parses a login configuration file into a [`LoginConfiguration`]
pub trait LoginConfigParser: Send + Sync {
    /// Read and parse the document at `path`
    fn parse(&self, path: &Path) -> Result<LoginConfiguration, LoginConfigError>;
}

/// Login module control flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlag {
    Required,
    Requisite,
    Sufficient,
    Optional,
}

impl ControlFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Requisite => "requisite",
            Self::Sufficient => "sufficient",
            Self::Optional => "optional",
        }
    }
}

impl fmt::Display for ControlFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlFlag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "required" => Ok(Self::Required),
            "requisite" => Ok(Self::Requisite),
            "sufficient" => Ok(Self::Sufficient),
            "optional" => Ok(Self::Optional),
            other => Err(format!("Invalid control flag: {other}")),
        }
    }
}

/// One login module directive inside a context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginModuleEntry {
    /// Fully qualified login module identifier
    pub login_module: String,
    pub flag: ControlFlag,
    pub options: BTreeMap<String, String>,
}

impl LoginModuleEntry {
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }
}

/// A parsed login configuration document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginConfiguration {
    contexts: Vec<(String, Vec<LoginModuleEntry>)>,
}

impl LoginConfiguration {
    /// Build a document from contexts, rejecting duplicate names
    pub fn from_contexts<I>(contexts: I) -> Result<Self, LoginConfigError>
    where
        I: IntoIterator<Item = (String, Vec<LoginModuleEntry>)>,
    {
        let mut config = Self::default();
        for (name, entries) in contexts {
            config.insert(name, entries)?;
        }
        Ok(config)
    }

    pub(crate) fn insert(
        &mut self,
        name: String,
        entries: Vec<LoginModuleEntry>,
    ) -> Result<(), LoginConfigError> {
        if self.contexts.iter().any(|(existing, _)| *existing == name) {
            return Err(LoginConfigError::DuplicateContext(name));
        }
        self.contexts.push((name, entries));
        Ok(())
    }

    /// Entries for a context.
    ///
    /// Returns `None` when the context is absent or declares no modules.
    pub fn entries(&self, name: &str) -> Option<&[LoginModuleEntry]> {
        self.contexts
            .iter()
            .find(|(context, _)| context == name)
            .map(|(_, entries)| entries.as_slice())
            .filter(|entries| !entries.is_empty())
    }

    /// Context names in document order
    pub fn context_names(&self) -> impl Iterator<Item = &str> {
        self.contexts.iter().map(|(name, _)| name.as_str())
    }

    /// All contexts in document order, including empty ones
    pub fn contexts(&self) -> impl Iterator<Item = (&str, &[LoginModuleEntry])> {
        self.contexts
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}
