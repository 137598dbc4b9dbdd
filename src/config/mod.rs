//! Action input normalization.
//!
//! Turns the raw string inputs of one job step into an immutable
//! [`ActionConfig`]. Empty strings collapse to "not set" so that an explicit
//! `false` can be told apart from an input that was never supplied.

mod env;

pub use env::EnvConfig;

use crate::cli::Args;
use crate::error::ConfigError;

/// Default manifest-mode config file
pub const DEFAULT_CONFIG_FILE: &str = "release-please-config.json";
/// Default manifest-mode versions file
pub const DEFAULT_MANIFEST_FILE: &str = ".release-please-manifest.json";
/// Default REST API base URL
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
/// Default GraphQL API base URL
pub const DEFAULT_GITHUB_GRAPHQL_URL: &str = "https://api.github.com";
/// Default host for changelog links
pub const DEFAULT_CHANGELOG_HOST: &str = "https://github.com";

/// Tri-state boolean input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Toggle {
    /// Input absent or empty
    #[default]
    Unset,
    /// Explicit `false`
    Off,
    /// Explicit `true`
    On,
}

impl Toggle {
    /// Whether the input was supplied at all
    pub fn is_set(self) -> bool {
        self != Toggle::Unset
    }

    /// Whether the input was explicitly `true`
    pub fn is_on(self) -> bool {
        self == Toggle::On
    }

    /// `None` when unset, otherwise the explicit value
    pub fn as_option(self) -> Option<bool> {
        match self {
            Toggle::Unset => None,
            Toggle::Off => Some(false),
            Toggle::On => Some(true),
        }
    }
}

/// Normalized action inputs for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionConfig {
    /// API token
    pub token: String,
    /// Repository coordinates in owner/repo form
    pub repo_url: String,
    /// Release strategy; `Some` selects single-package mode
    pub release_type: Option<String>,
    /// Package path for single-package mode
    pub path: Option<String>,
    /// Branch override
    pub target_branch: Option<String>,
    /// Manifest-mode config file
    pub config_file: String,
    /// Manifest-mode versions file
    pub manifest_file: String,
    /// REST API base URL
    pub github_api_url: String,
    /// GraphQL API base URL (without `/graphql`)
    pub github_graphql_url: String,
    /// Proxy in host:port form
    pub proxy_server: Option<String>,
    /// Tag instead of creating platform releases
    pub skip_github_release: Toggle,
    /// Do not touch release pull requests
    pub skip_github_pull_request: Toggle,
    /// Do not add autorelease labels
    pub skip_labeling: Toggle,
    /// Open pull requests from a fork
    pub fork: Toggle,
    /// Prefix tags with the component name
    pub include_component_in_tag: Toggle,
    /// Host used for changelog links
    pub changelog_host: String,
}

impl ActionConfig {
    /// Normalize raw inputs, consulting `env` for repository coordinates
    pub fn from_inputs(args: &Args, env: &EnvConfig) -> Result<Self, ConfigError> {
        let token = optional_input(&args.token).ok_or_else(|| ConfigError::MissingInput {
            input: "token".to_string(),
        })?;

        let github_graphql_url = optional_input(&args.github_graphql_url)
            .map(|url| url.strip_suffix("/graphql").unwrap_or(&url).to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_GITHUB_GRAPHQL_URL.to_string());

        Ok(Self {
            token,
            repo_url: optional_input(&args.repo_url)
                .or_else(|| env.get("GITHUB_REPOSITORY"))
                .unwrap_or_default(),
            release_type: optional_input(&args.release_type),
            path: optional_input(&args.path),
            target_branch: optional_input(&args.target_branch),
            config_file: optional_input(&args.config_file)
                .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string()),
            manifest_file: optional_input(&args.manifest_file)
                .unwrap_or_else(|| DEFAULT_MANIFEST_FILE.to_string()),
            github_api_url: optional_input(&args.github_api_url)
                .unwrap_or_else(|| DEFAULT_GITHUB_API_URL.to_string()),
            github_graphql_url,
            proxy_server: optional_input(&args.proxy_server),
            skip_github_release: optional_toggle("skip-github-release", &args.skip_github_release)?,
            skip_github_pull_request: optional_toggle(
                "skip-github-pull-request",
                &args.skip_github_pull_request,
            )?,
            skip_labeling: optional_toggle("skip-labeling", &args.skip_labeling)?,
            fork: optional_toggle("fork", &args.fork)?,
            include_component_in_tag: optional_toggle(
                "include-component-in-tag",
                &args.include_component_in_tag,
            )?,
            changelog_host: optional_input(&args.changelog_host)
                .unwrap_or_else(|| DEFAULT_CHANGELOG_HOST.to_string()),
        })
    }
}

/// Trimmed input value, `None` when absent or empty
pub fn optional_input(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Boolean input following the YAML 1.2 core schema spellings
pub fn optional_toggle(name: &str, value: &Option<String>) -> Result<Toggle, ConfigError> {
    match optional_input(value).as_deref() {
        None => Ok(Toggle::Unset),
        Some("true" | "True" | "TRUE") => Ok(Toggle::On),
        Some("false" | "False" | "FALSE") => Ok(Toggle::Off),
        Some(_) => Err(ConfigError::InvalidBoolean {
            input: name.to_string(),
        }),
    }
}
