//! Step outputs.
//!
//! Release and pull request results are flattened into the key/value naming
//! that downstream workflow steps consume. Releases outside the repository
//! root are namespaced as `<path>--<key>`.

pub mod command;

use crate::config::EnvConfig;
use crate::error::Result;
use crate::plan::{CreatedRelease, PullRequest, ROOT_PATH};
use serde_json::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Ordered output keys and their values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputMap {
    entries: Vec<(String, Value)>,
}

impl OutputMap {
    /// Empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing an earlier value in place
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Raw value of `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Value of `key` as it will be written
    pub fn encoded(&self, key: &str) -> Option<String> {
        self.get(key).map(encode_value)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no key is set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Write every entry to `sink` in insertion order
    pub fn write_to(&self, sink: &mut dyn OutputSink) -> Result<()> {
        for (key, value) in &self.entries {
            sink.set_output(key, &encode_value(value))?;
        }
        Ok(())
    }
}

/// Render an output value: strings verbatim, null as empty, structures as JSON
pub fn encode_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Output key for a serialized release field
fn output_key(field: &str) -> &str {
    match field {
        "tagName" => "tag_name",
        "uploadUrl" => "upload_url",
        "notes" => "body",
        "url" => "html_url",
        other => other,
    }
}

/// Flatten created releases into `outputs`.
///
/// Always sets `releases_created` and `paths_released`, even when nothing was
/// released.
pub fn flatten_releases(releases: &[Option<CreatedRelease>], outputs: &mut OutputMap) -> Result<()> {
    let mut paths: Vec<String> = Vec::new();

    for release in releases.iter().flatten() {
        let path = if release.path.is_empty() {
            ROOT_PATH
        } else {
            release.path.as_str()
        };
        let prefix = if path == ROOT_PATH {
            String::new()
        } else {
            format!("{}--", path)
        };

        outputs.set(format!("{}release_created", prefix), Value::Bool(true));
        if let Value::Object(fields) = serde_json::to_value(release)? {
            for (field, value) in fields {
                outputs.set(format!("{}{}", prefix, output_key(&field)), value);
            }
        }

        if !paths.iter().any(|p| p == path) {
            paths.push(path.to_string());
        }
    }

    outputs.set("releases_created", Value::Bool(!paths.is_empty()));
    outputs.set(
        "paths_released",
        Value::Array(paths.into_iter().map(Value::String).collect()),
    );
    Ok(())
}

/// Flatten release pull requests into `outputs`
pub fn flatten_pull_requests(prs: &[Option<PullRequest>], outputs: &mut OutputMap) -> Result<()> {
    let created: Vec<&PullRequest> = prs.iter().flatten().collect();

    outputs.set("prs_created", Value::Bool(!created.is_empty()));
    if let Some(first) = created.first() {
        outputs.set("pr", serde_json::to_value(first)?);
        outputs.set("prs", serde_json::to_value(&created)?);
    }
    Ok(())
}

/// Destination of step outputs
pub trait OutputSink {
    /// Record one output
    fn set_output(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Writes outputs to the `GITHUB_OUTPUT` file, or as `set-output` commands
/// when the runner provides no file.
#[derive(Debug, Clone)]
pub struct GitHubOutputFile {
    path: Option<PathBuf>,
}

impl GitHubOutputFile {
    /// Sink writing to `path`, or to stdout commands when `None`
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Sink for the file named by `GITHUB_OUTPUT`
    pub fn from_env(env: &EnvConfig) -> Self {
        Self::new(env.get("GITHUB_OUTPUT").map(PathBuf::from))
    }
}

impl OutputSink for GitHubOutputFile {
    fn set_output(&mut self, key: &str, value: &str) -> Result<()> {
        let Some(path) = &self.path else {
            println!("{}", command::workflow_command("set-output", &[("name", key)], value));
            return Ok(());
        };

        let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        write!(file, "{}<<{}\n{}\n{}\n", key, delimiter, value, delimiter)?;
        Ok(())
    }
}
