//! Invocation of the external `release-please release-pr` command.

use super::PlanStrategy;
use crate::config::{ActionConfig, EnvConfig};
use crate::error::{PlanError, Result};
use anyhow::Context;
use std::fmt;

/// Program run when `RELEASE_PLEASE_BIN` is not set
const DEFAULT_PROGRAM: &str = "release-please";

/// Command line that opens or updates release pull requests
#[derive(Clone)]
pub struct ReleasePrCommand {
    program: String,
    token: String,
    args: Vec<String>,
}

impl fmt::Debug for ReleasePrCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleasePrCommand")
            .field("program", &self.program)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl ReleasePrCommand {
    /// Build the command line mirroring the plan strategy
    pub fn new(config: &ActionConfig, strategy: &PlanStrategy, branch: &str, env: &EnvConfig) -> Self {
        let mut args: Vec<String> = vec![
            "release-pr".to_string(),
            format!("--repo-url={}", config.repo_url),
            format!("--target-branch={}", branch),
            format!("--api-url={}", config.github_api_url),
            format!("--graphql-url={}", config.github_graphql_url),
        ];

        let flag = |name: &str, value: Option<bool>| value.map(|v| format!("--{}={}", name, v));

        match strategy {
            PlanStrategy::FixedType(fixed) => {
                args.push(format!("--release-type={}", fixed.release_type));
                args.push(format!("--path={}", fixed.path));
                args.push(format!("--changelog-host={}", fixed.changelog_host));
                args.extend(flag("include-component-in-tag", fixed.include_component_in_tag));
                args.extend(flag("fork", fixed.fork));
                args.extend(flag("skip-labeling", fixed.skip_labeling));
            }
            PlanStrategy::ManifestFile(manifest) => {
                args.push(format!("--config-file={}", manifest.config_file));
                args.push(format!("--manifest-file={}", manifest.manifest_file));
                if let Some(overrides) = manifest.overrides {
                    args.extend(flag("fork", overrides.fork));
                    args.extend(flag("skip-labeling", overrides.skip_labeling));
                }
            }
        }

        Self {
            program: env
                .get("RELEASE_PLEASE_BIN")
                .unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
            token: config.token.clone(),
            args,
        }
    }

    /// Program that will be executed
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments, without the token
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Run the command to completion
    pub async fn run(&self) -> Result<()> {
        log::info!("Running {} {}", self.program, self.args.join(" "));

        let output = tokio::process::Command::new(&self.program)
            .args(&self.args)
            // release-please reads the token only from this flag, it has no
            // environment fallback; keep it out of `args` and the log line
            .arg(format!("--token={}", self.token))
            .output()
            .await
            .with_context(|| format!("Failed to start {}", self.program))?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            log::info!("{}", line);
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(PlanError::ExecutionFailed {
                command: format!("{} release-pr", self.program),
                reason: if stderr.is_empty() {
                    output.status.to_string()
                } else {
                    stderr
                },
            }
            .into());
        }

        Ok(())
    }
}
