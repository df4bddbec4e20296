//! Registry configuration loaded from environment variables.

use std::env;

use anyhow::{Result, bail};

/// Registry configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Reject blocks that fail validation at registration time
    /// (CONTENT_BLOCKS_STRICT, default: false).
    pub strict: bool,
}

impl RegistryConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let strict = match lookup("CONTENT_BLOCKS_STRICT") {
            Some(value) => parse_bool(&value)?,
            None => false,
        };

        Ok(Self { strict })
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "" | "0" | "false" | "no" => Ok(false),
        other => bail!("CONTENT_BLOCKS_STRICT must be a boolean, got '{other}'"),
    }
}
