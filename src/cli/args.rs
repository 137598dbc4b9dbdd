//! Command line argument parsing.
//!
//! Every flag mirrors an action input. Inside a workflow the runner exports
//! inputs as `INPUT_<NAME>` variables, so each flag also reads that variable.
//! Values stay raw strings here; typing happens in [`crate::config`].

use crate::config::EnvConfig;
use clap::Parser;

/// Publish releases, tags and release pull requests from a CI job
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "kodegen_release_action",
    version,
    about = "Publish releases, tags and release pull requests from a CI job",
    long_about = "Compute pending releases for a repository and publish them as GitHub
releases (or bare tags with --skip-github-release true), then open or update
release pull requests. Results are written to GITHUB_OUTPUT.

Usage:
  kodegen_release_action --token $GITHUB_TOKEN --release-type rust
  kodegen_release_action --token $GITHUB_TOKEN --repo-url cyrup-ai/kodegen --skip-github-release true"
)]
pub struct Args {
    /// Token used to authenticate against the GitHub API (required)
    #[arg(long, env = "INPUT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository in owner/repo form (default: GITHUB_REPOSITORY)
    #[arg(long = "repo-url", env = "INPUT_REPO-URL")]
    pub repo_url: Option<String>,

    /// Release strategy; selects single-package mode when set
    #[arg(long = "release-type", env = "INPUT_RELEASE-TYPE")]
    pub release_type: Option<String>,

    /// Path of the package within the repository (single-package mode)
    #[arg(long, env = "INPUT_PATH")]
    pub path: Option<String>,

    /// Branch to release from (default: repository default branch)
    #[arg(long = "target-branch", env = "INPUT_TARGET-BRANCH")]
    pub target_branch: Option<String>,

    /// Manifest-mode config file
    #[arg(long = "config-file", env = "INPUT_CONFIG-FILE")]
    pub config_file: Option<String>,

    /// Manifest-mode versions file
    #[arg(long = "manifest-file", env = "INPUT_MANIFEST-FILE")]
    pub manifest_file: Option<String>,

    /// REST API base URL
    #[arg(long = "github-api-url", env = "INPUT_GITHUB-API-URL")]
    pub github_api_url: Option<String>,

    /// GraphQL API base URL; a trailing /graphql is stripped
    #[arg(long = "github-graphql-url", env = "INPUT_GITHUB-GRAPHQL-URL")]
    pub github_graphql_url: Option<String>,

    /// HTTP proxy in host:port form
    #[arg(long = "proxy-server", env = "INPUT_PROXY-SERVER")]
    pub proxy_server: Option<String>,

    /// Create bare tags instead of GitHub releases (true/false)
    #[arg(long = "skip-github-release", env = "INPUT_SKIP-GITHUB-RELEASE")]
    pub skip_github_release: Option<String>,

    /// Do not open or update release pull requests (true/false)
    #[arg(long = "skip-github-pull-request", env = "INPUT_SKIP-GITHUB-PULL-REQUEST")]
    pub skip_github_pull_request: Option<String>,

    /// Do not add autorelease labels (true/false)
    #[arg(long = "skip-labeling", env = "INPUT_SKIP-LABELING")]
    pub skip_labeling: Option<String>,

    /// Open pull requests from a fork (true/false)
    #[arg(long, env = "INPUT_FORK")]
    pub fork: Option<String>,

    /// Prefix tags with the component name (true/false)
    #[arg(long = "include-component-in-tag", env = "INPUT_INCLUDE-COMPONENT-IN-TAG")]
    pub include_component_in_tag: Option<String>,

    /// Host used for links in generated changelogs
    #[arg(long = "changelog-host", env = "INPUT_CHANGELOG-HOST")]
    pub changelog_host: Option<String>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Runtime configuration shared by every step of a run
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl RuntimeConfig {
    /// Create runtime configuration for the given environment.
    ///
    /// Annotations are enabled inside GitHub Actions; `RUNNER_DEBUG=1`
    /// enables debug lines.
    pub fn new(env: &EnvConfig) -> Self {
        Self {
            output: super::OutputManager::new(
                env.is_github_actions(),
                env.get("RUNNER_DEBUG").as_deref() == Some("1"),
            ),
        }
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.info(message);
    }

    /// Print debug message
    pub fn debug_println(&self, message: &str) {
        let _ = self.output.debug(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print indented text
    pub fn indent(&self, message: &str) {
        let _ = self.output.indent(message);
    }
}
