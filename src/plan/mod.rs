//! Release plans.
//!
//! A release plan knows which paths of the repository have a release pending
//! and can publish those releases or the pull requests that propose them.
//! Commit parsing, version arithmetic and changelog rendering live behind the
//! [`ReleasePlan`] trait; this crate only consumes its results.

mod body;
mod github;
mod release_pr;
mod tag;

pub use body::{ReleaseSection, parse_release_sections};
pub use github::{GitHubReleasePlan, PackageSpec};
pub use release_pr::ReleasePrCommand;
pub use tag::TagName;

use crate::config::{ActionConfig, EnvConfig};
use crate::error::Result;
use crate::github::{GitHubClient, ReleaseInfo};
use async_trait::async_trait;
use serde::Serialize;

/// Path denoting the repository root
pub const ROOT_PATH: &str = ".";

/// Label carried by release pull requests awaiting publication
pub const PENDING_LABEL: &str = "autorelease: pending";

/// Label carried by release pull requests once published
pub const TAGGED_LABEL: &str = "autorelease: tagged";

/// Pull request a release was proposed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    /// Pull request number
    pub number: u64,
    /// Pull request title
    pub title: String,
}

/// A release the plan believes should happen, not yet published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntendedRelease {
    /// Package path, `.` for the repository root
    pub path: String,
    /// Tag the release is published under
    pub tag: TagName,
    /// Commit the release points at
    pub sha: String,
    /// Release notes, absent when the body had none
    pub notes: Option<String>,
    /// Release pull request that proposed it
    pub pull_request: PullRequestRef,
}

impl IntendedRelease {
    /// Display name of the release
    pub fn name(&self) -> String {
        match self.tag.component() {
            Some(component) => format!("{} v{}", component, self.tag.version()),
            None => format!("v{}", self.tag.version()),
        }
    }
}

/// Result of publishing a release or creating its bare tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedRelease {
    /// Platform release id, 0 when only a tag was created
    pub id: u64,
    /// Release title, absent for tag-only records
    pub name: Option<String>,
    /// Tag name, e.g. `core-v1.2.0`
    pub tag_name: String,
    /// Tagged commit
    pub sha: String,
    /// Release notes, empty when there are none
    pub notes: String,
    /// Web page of the release
    pub url: Option<String>,
    /// Whether the release is a draft
    pub draft: Option<bool>,
    /// Asset upload URL template
    pub upload_url: Option<String>,
    /// Package path, `.` for the repository root
    pub path: String,
    /// Full version string
    pub version: String,
    /// Major version component
    pub major: u64,
    /// Minor version component
    pub minor: u64,
    /// Patch version component
    pub patch: u64,
    /// Release pull request number, 0 when unknown
    pub pr_number: u64,
}

impl CreatedRelease {
    /// Record for a release that only received a tag
    pub fn tag_only(release: &IntendedRelease, pr_number: u64) -> Self {
        let version = release.tag.version();
        Self {
            id: 0,
            name: None,
            tag_name: release.tag.to_string(),
            sha: release.sha.clone(),
            notes: release.notes.clone().unwrap_or_default(),
            url: None,
            draft: None,
            upload_url: None,
            path: release.path.clone(),
            version: version.to_string(),
            major: version.major,
            minor: version.minor,
            patch: version.patch,
            pr_number,
        }
    }

    /// Record for a published platform release
    pub fn published(release: &IntendedRelease, info: &ReleaseInfo) -> Self {
        Self {
            id: info.id,
            name: Some(release.name()),
            tag_name: info.tag_name.clone(),
            url: Some(info.html_url.clone()),
            draft: Some(info.draft),
            upload_url: info.upload_url.clone(),
            ..Self::tag_only(release, release.pull_request.number)
        }
    }
}

/// Release pull request opened or updated by the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    /// Source branch
    pub head_branch_name: String,
    /// Target branch
    pub base_branch_name: String,
    /// Pull request number
    pub number: u64,
    /// Title
    pub title: String,
    /// Description
    pub body: String,
    /// Attached labels
    pub labels: Vec<String>,
    /// Paths touched by the pull request
    pub files: Vec<String>,
}

/// Operations of the release-automation backend
#[async_trait]
pub trait ReleasePlan: Send + Sync {
    /// Releases that should happen, one slot per package path.
    ///
    /// Absent slots are paths with nothing to release. No side effects.
    async fn build_releases(&self) -> Result<Vec<Option<IntendedRelease>>>;

    /// Publish pending releases as platform releases
    async fn create_releases(&self) -> Result<Vec<Option<CreatedRelease>>>;

    /// Open or update release pull requests
    async fn create_pull_requests(&self) -> Result<Vec<Option<PullRequest>>>;
}

/// Settings for a single-package plan with a fixed release type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedTypeConfig {
    /// Release strategy name, e.g. `rust` or `node`
    pub release_type: String,
    /// Package path, `.` for the repository root
    pub path: String,
    /// Prefix tags with the component name
    pub include_component_in_tag: Option<bool>,
    /// Base URL used for links in changelogs
    pub changelog_host: String,
    /// Open release pull requests from a fork
    pub fork: Option<bool>,
    /// Leave release pull request labels untouched
    pub skip_labeling: Option<bool>,
}

/// Explicitly supplied inputs that override manifest config values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManifestOverrides {
    /// Open release pull requests from a fork
    pub fork: Option<bool>,
    /// Leave release pull request labels untouched
    pub skip_labeling: Option<bool>,
}

/// Settings for a plan driven by config and manifest files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestFileConfig {
    /// Path of the release config file in the repository
    pub config_file: String,
    /// Path of the version manifest in the repository
    pub manifest_file: String,
    /// Inputs that win over the config file, when any were given
    pub overrides: Option<ManifestOverrides>,
}

/// How the release plan is constructed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStrategy {
    /// One package with a release type given as input
    FixedType(FixedTypeConfig),
    /// Packages declared in the config and manifest files
    ManifestFile(ManifestFileConfig),
}

impl PlanStrategy {
    /// Select the strategy for the given inputs
    pub fn from_config(config: &ActionConfig) -> Self {
        match &config.release_type {
            Some(release_type) => PlanStrategy::FixedType(FixedTypeConfig {
                release_type: release_type.clone(),
                path: config.path.clone().unwrap_or_else(|| ROOT_PATH.to_string()),
                include_component_in_tag: config.include_component_in_tag.as_option(),
                changelog_host: config.changelog_host.clone(),
                fork: config.fork.as_option(),
                skip_labeling: config.skip_labeling.as_option(),
            }),
            None => {
                // Unset toggles must not clobber values declared in the config file
                let overrides = (config.fork.is_set() || config.skip_labeling.is_set()).then(|| {
                    ManifestOverrides {
                        fork: config.fork.as_option(),
                        skip_labeling: config.skip_labeling.as_option(),
                    }
                });
                PlanStrategy::ManifestFile(ManifestFileConfig {
                    config_file: config.config_file.clone(),
                    manifest_file: config.manifest_file.clone(),
                    overrides,
                })
            }
        }
    }
}

/// Build the release plan for this invocation
pub async fn load_plan<'a>(
    config: &ActionConfig,
    github: &'a GitHubClient,
    env: &EnvConfig,
) -> Result<GitHubReleasePlan<'a>> {
    let strategy = PlanStrategy::from_config(config);
    let branch = config
        .target_branch
        .clone()
        .unwrap_or_else(|| github.default_branch().to_string());

    log::debug!("Loading release plan for branch {}: {:?}", branch, strategy);
    let release_pr = ReleasePrCommand::new(config, &strategy, &branch, env);
    GitHubReleasePlan::load(github, &strategy, branch, release_pr).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use semver::Version;

    fn config(args: Args) -> ActionConfig {
        let args = Args {
            token: Some("secret".to_string()),
            ..args
        };
        ActionConfig::from_inputs(&args, &EnvConfig::default()).expect("valid inputs")
    }

    fn intended() -> IntendedRelease {
        IntendedRelease {
            path: "packages/core".to_string(),
            tag: TagName::new(Some("core".to_string()), Version::new(1, 4, 2)),
            sha: "abc123".to_string(),
            notes: None,
            pull_request: PullRequestRef {
                number: 42,
                title: "chore: release main".to_string(),
            },
        }
    }

    #[test]
    fn test_fixed_type_selected_when_release_type_set() {
        let strategy = PlanStrategy::from_config(&config(Args {
            release_type: Some("rust".to_string()),
            skip_labeling: Some("true".to_string()),
            ..Args::default()
        }));

        assert_eq!(
            strategy,
            PlanStrategy::FixedType(FixedTypeConfig {
                release_type: "rust".to_string(),
                path: ".".to_string(),
                include_component_in_tag: None,
                changelog_host: "https://github.com".to_string(),
                fork: None,
                skip_labeling: Some(true),
            })
        );
    }

    #[test]
    fn test_manifest_without_overrides() {
        let strategy = PlanStrategy::from_config(&config(Args::default()));
        assert_eq!(
            strategy,
            PlanStrategy::ManifestFile(ManifestFileConfig {
                config_file: "release-please-config.json".to_string(),
                manifest_file: ".release-please-manifest.json".to_string(),
                overrides: None,
            })
        );
    }

    #[test]
    fn test_manifest_overrides_only_when_explicit() {
        let strategy = PlanStrategy::from_config(&config(Args {
            fork: Some("false".to_string()),
            ..Args::default()
        }));
        let PlanStrategy::ManifestFile(manifest) = strategy else {
            panic!("expected manifest strategy");
        };
        assert_eq!(
            manifest.overrides,
            Some(ManifestOverrides {
                fork: Some(false),
                skip_labeling: None,
            })
        );
    }

    #[test]
    fn test_tag_only_record() {
        let release = intended();
        let created = CreatedRelease::tag_only(&release, 42);

        assert_eq!(created.id, 0);
        assert_eq!(created.tag_name, "core-v1.4.2");
        assert_eq!(created.notes, "");
        assert_eq!(created.url, None);
        assert_eq!(created.version, "1.4.2");
        assert_eq!((created.major, created.minor, created.patch), (1, 4, 2));
        assert_eq!(created.pr_number, 42);
    }

    #[test]
    fn test_published_record() {
        let release = intended();
        let info = ReleaseInfo {
            id: 7,
            tag_name: "core-v1.4.2".to_string(),
            html_url: "https://github.com/cyrup-ai/kodegen/releases/tag/core-v1.4.2".to_string(),
            upload_url: Some("https://uploads.github.com/x".to_string()),
            draft: false,
        };
        let created = CreatedRelease::published(&release, &info);

        assert_eq!(created.id, 7);
        assert_eq!(created.name.as_deref(), Some("core v1.4.2"));
        assert_eq!(created.url.as_deref(), Some(info.html_url.as_str()));
        assert_eq!(created.pr_number, 42);
        assert_eq!(created.path, "packages/core");
    }
}
