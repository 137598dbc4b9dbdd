//! Release command execution.
//!
//! One run publishes pending releases (or their bare tags), writes the
//! release outputs, then opens or updates release pull requests and writes
//! their outputs.

use crate::cli::{Args, RuntimeConfig};
use crate::config::{ActionConfig, EnvConfig};
use crate::error::Result;
use crate::outputs::{GitHubOutputFile, OutputMap, OutputSink, flatten_pull_requests, flatten_releases};
use crate::plan::{ReleasePlan, load_plan};
use crate::tags::{TagHost, create_missing_tags};

/// Which publication steps run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Steps {
    /// Create bare tags instead of platform releases
    pub skip_github_release: bool,
    /// Leave release pull requests alone
    pub skip_github_pull_request: bool,
}

impl From<&ActionConfig> for Steps {
    fn from(config: &ActionConfig) -> Self {
        Self {
            skip_github_release: config.skip_github_release.is_on(),
            skip_github_pull_request: config.skip_github_pull_request.is_on(),
        }
    }
}

/// Execute release command
pub(super) async fn execute_release(
    args: &Args,
    config: &RuntimeConfig,
    env: &EnvConfig,
) -> Result<i32> {
    let action = ActionConfig::from_inputs(args, env)?;

    let github = crate::github::connect(&action).await?;
    config.debug_println(&format!(
        "Connected to {}/{} ({})",
        github.owner(),
        github.repo(),
        github.api_base()
    ));

    let plan = load_plan(&action, &github, env).await?;
    let mut sink = GitHubOutputFile::from_env(env);

    run_action(
        &plan,
        &github,
        github.owner(),
        github.repo(),
        Steps::from(&action),
        config,
        &mut sink,
    )
    .await?;

    Ok(0)
}

/// Publish releases and pull requests for `plan`, writing outputs to `sink`.
///
/// Release outputs are written before pull requests are attempted, so a
/// pull request failure leaves them in place.
pub async fn run_action(
    plan: &dyn ReleasePlan,
    host: &dyn TagHost,
    owner: &str,
    repo: &str,
    steps: Steps,
    config: &RuntimeConfig,
    sink: &mut dyn OutputSink,
) -> Result<()> {
    let releases = if steps.skip_github_release {
        config.println("Creating tags for pending releases");
        create_missing_tags(plan, host, owner, repo, config).await?
    } else {
        config.println("Creating releases");
        plan.create_releases().await?
    };

    for release in releases.iter().flatten() {
        config.indent(&format!("{} ({})", release.tag_name, release.path));
    }

    let mut outputs = OutputMap::new();
    flatten_releases(&releases, &mut outputs)?;
    outputs.write_to(sink)?;

    if steps.skip_github_pull_request {
        config.debug_println("Skipping release pull requests");
        return Ok(());
    }

    config.println("Updating release pull requests");
    let prs = plan.create_pull_requests().await?;
    for pr in prs.iter().flatten() {
        config.indent(&format!("#{} {}", pr.number, pr.title));
    }

    let mut outputs = OutputMap::new();
    flatten_pull_requests(&prs, &mut outputs)?;
    outputs.write_to(sink)?;

    Ok(())
}
