//! Snapshot of the process environment.

use std::collections::HashMap;

/// Environment variables captured once at startup.
///
/// Passed explicitly to anything that consults the environment so tests can
/// supply their own values instead of mutating the process environment.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    vars: HashMap<String, String>,
}

impl EnvConfig {
    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    /// Look up a variable; empty values read as unset
    pub fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).filter(|v| !v.is_empty()).cloned()
    }

    /// Set a variable on this snapshot
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Whether the process runs inside a GitHub Actions job
    pub fn is_github_actions(&self) -> bool {
        self.get("GITHUB_ACTIONS").as_deref() == Some("true")
    }
}

impl FromIterator<(String, String)> for EnvConfig {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}
