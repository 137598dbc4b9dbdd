//! Release plan backed by release pull requests on GitHub.
//!
//! Pending releases are announced by merged pull requests labelled
//! `autorelease: pending`. Their bodies name the component and version of
//! every release; the merge commit is what gets released.

use super::release_pr::ReleasePrCommand;
use super::{
    CreatedRelease, IntendedRelease, PENDING_LABEL, PlanStrategy, PullRequest, PullRequestRef,
    ROOT_PATH, ReleasePlan, TAGGED_LABEL, TagName, parse_release_sections,
};
use crate::error::{HostError, PlanError, Result};
use crate::github::{GitHubClient, NewRelease, PullRequestInfo};
use async_trait::async_trait;
use semver::Version;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A releasable package of the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSpec {
    /// Path within the repository, `.` for the root
    pub path: String,
    /// Component name used in release PR bodies and tags
    pub component: Option<String>,
    /// Prefix tags with the component name
    pub include_component_in_tag: bool,
}

impl PackageSpec {
    fn tag_component(&self) -> Option<String> {
        self.component
            .clone()
            .filter(|_| self.include_component_in_tag)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ManifestConfig {
    #[serde(default)]
    packages: BTreeMap<String, PackageConfig>,
    include_component_in_tag: Option<bool>,
    skip_labeling: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct PackageConfig {
    component: Option<String>,
    package_name: Option<String>,
    include_component_in_tag: Option<bool>,
}

/// Release plan reading and publishing release pull requests on GitHub
#[derive(Debug)]
pub struct GitHubReleasePlan<'a> {
    github: &'a GitHubClient,
    branch: String,
    packages: Vec<PackageSpec>,
    skip_labeling: bool,
    release_pr: ReleasePrCommand,
}

impl<'a> GitHubReleasePlan<'a> {
    /// Plan over an explicit package list
    pub fn new(
        github: &'a GitHubClient,
        branch: String,
        packages: Vec<PackageSpec>,
        skip_labeling: bool,
        release_pr: ReleasePrCommand,
    ) -> Self {
        Self {
            github,
            branch,
            packages,
            skip_labeling,
            release_pr,
        }
    }

    /// Construct the plan for `strategy`, reading manifest files from `branch`
    pub async fn load(
        github: &'a GitHubClient,
        strategy: &PlanStrategy,
        branch: String,
        release_pr: ReleasePrCommand,
    ) -> Result<Self> {
        match strategy {
            PlanStrategy::FixedType(fixed) => {
                let package = PackageSpec {
                    path: fixed.path.clone(),
                    component: Some(default_component(&fixed.path, github.repo())),
                    include_component_in_tag: fixed.include_component_in_tag.unwrap_or(false),
                };
                let skip_labeling = fixed.skip_labeling.unwrap_or(false);
                Ok(Self::new(github, branch, vec![package], skip_labeling, release_pr))
            }
            PlanStrategy::ManifestFile(manifest) => {
                let config: ManifestConfig =
                    read_json(github, &manifest.config_file, &branch).await?;
                let versions: BTreeMap<String, String> =
                    read_json(github, &manifest.manifest_file, &branch).await?;

                for (path, version) in &versions {
                    log::debug!("Manifest version of {}: {}", path, version);
                }

                let packages = manifest_packages(&config, &versions);
                let skip_labeling = manifest
                    .overrides
                    .and_then(|o| o.skip_labeling)
                    .or(config.skip_labeling)
                    .unwrap_or(false);
                Ok(Self::new(github, branch, packages, skip_labeling, release_pr))
            }
        }
    }

    /// Packages covered by this plan
    pub fn packages(&self) -> &[PackageSpec] {
        &self.packages
    }

    fn package_index(&self, component: Option<&str>) -> Option<usize> {
        if self.packages.len() == 1 {
            return Some(0);
        }
        match component {
            Some(component) => self
                .packages
                .iter()
                .position(|p| p.component.as_deref() == Some(component)),
            None => self.packages.iter().position(|p| p.path == ROOT_PATH),
        }
    }

    /// Releases announced by one merged release pull request
    fn releases_from_pull(
        &self,
        pr: &PullRequestInfo,
    ) -> std::result::Result<Vec<(usize, IntendedRelease)>, PlanError> {
        let Some(sha) = pr.merge_commit_sha.as_deref() else {
            log::warn!("Pull request #{} has no merge commit, skipping", pr.number);
            return Ok(Vec::new());
        };

        let sections = parse_release_sections(pr.body.as_deref().unwrap_or_default());
        if sections.is_empty() {
            return Err(PlanError::UnparseableBody { number: pr.number });
        }

        let mut releases = Vec::with_capacity(sections.len());
        for section in sections {
            let Some(index) = self.package_index(section.component.as_deref()) else {
                log::warn!(
                    "Pull request #{} names unknown component {:?}, skipping",
                    pr.number,
                    section.component
                );
                continue;
            };

            let version =
                Version::parse(&section.version).map_err(|source| PlanError::InvalidVersion {
                    number: pr.number,
                    version: section.version.clone(),
                    source,
                })?;

            let package = &self.packages[index];
            releases.push((
                index,
                IntendedRelease {
                    path: package.path.clone(),
                    tag: TagName::new(package.tag_component(), version),
                    sha: sha.to_string(),
                    notes: Some(section.notes).filter(|n| !n.is_empty()),
                    pull_request: PullRequestRef {
                        number: pr.number,
                        title: pr.title.clone(),
                    },
                },
            ));
        }
        Ok(releases)
    }

    /// Swap the pending label for the tagged label
    async fn mark_tagged(&self, number: u64) -> Result<()> {
        match self.github.remove_label(number, PENDING_LABEL).await {
            Ok(()) | Err(HostError::NotFound { .. }) => {}
            Err(e) => log::warn!("Failed to remove '{}' from #{}: {}", PENDING_LABEL, number, e),
        }
        self.github.add_labels(number, &[TAGGED_LABEL]).await?;
        Ok(())
    }

    /// Create the platform release for one entry.
    ///
    /// Returns the record to report and whether the release now exists on the
    /// platform. A release that already existed is not reported again; any
    /// other failure only empties this entry's slot.
    async fn publish(&self, release: &IntendedRelease) -> (Option<CreatedRelease>, bool) {
        let tag_name = release.tag.to_string();
        let name = release.name();
        let result = self
            .github
            .create_release(&NewRelease {
                tag_name: &tag_name,
                target_commitish: &release.sha,
                name: &name,
                body: release.notes.as_deref().unwrap_or_default(),
                draft: false,
                prerelease: !release.tag.version().pre.is_empty(),
            })
            .await;

        match result {
            Ok(info) => {
                log::info!("Created release {} ({})", tag_name, info.html_url);
                (Some(CreatedRelease::published(release, &info)), true)
            }
            Err(HostError::AlreadyExists { .. }) => {
                log::warn!("Release {} already exists, skipping", tag_name);
                (None, true)
            }
            Err(e) => {
                log::error!("Failed to create release {}: {}", tag_name, e);
                (None, false)
            }
        }
    }
}

#[async_trait]
impl ReleasePlan for GitHubReleasePlan<'_> {
    async fn build_releases(&self) -> Result<Vec<Option<IntendedRelease>>> {
        let mut pulls = self
            .github
            .merged_pull_requests_with_label(&self.branch, PENDING_LABEL)
            .await?;
        log::debug!("Found {} merged release pull request(s)", pulls.len());

        // RFC 3339 UTC timestamps order lexicographically
        pulls.sort_by(|a, b| b.merged_at.cmp(&a.merged_at));

        let mut slots: Vec<Option<IntendedRelease>> = vec![None; self.packages.len()];
        for pr in &pulls {
            let releases = match self.releases_from_pull(pr) {
                Ok(releases) => releases,
                Err(PlanError::UnparseableBody { number }) => {
                    log::warn!("Could not find a release in the body of #{}, skipping", number);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            // Most recently merged first; an older pull never replaces a newer release
            for (index, release) in releases {
                if slots[index].is_none() {
                    slots[index] = Some(release);
                }
            }
        }
        Ok(slots)
    }

    async fn create_releases(&self) -> Result<Vec<Option<CreatedRelease>>> {
        let candidates = self.build_releases().await?;
        let mut created = Vec::with_capacity(candidates.len());
        let mut tagged_pulls: Vec<u64> = Vec::new();

        for candidate in candidates {
            let Some(release) = candidate else {
                created.push(None);
                continue;
            };

            let (result, published) = self.publish(&release).await;
            if published && !tagged_pulls.contains(&release.pull_request.number) {
                tagged_pulls.push(release.pull_request.number);
            }
            created.push(result);
        }

        if !self.skip_labeling {
            for number in tagged_pulls {
                if let Err(e) = self.mark_tagged(number).await {
                    log::warn!("Failed to label #{} as '{}': {}", number, TAGGED_LABEL, e);
                }
            }
        }

        Ok(created)
    }

    async fn create_pull_requests(&self) -> Result<Vec<Option<PullRequest>>> {
        self.release_pr.run().await?;

        let head_prefix = format!("release-please--branches--{}", self.branch);
        let open = self
            .github
            .open_pull_requests_with_label(PENDING_LABEL)
            .await?;

        Ok(open
            .into_iter()
            .filter(|pr| pr.base.name == self.branch && pr.head.name.starts_with(&head_prefix))
            .map(|pr| {
                Some(PullRequest {
                    head_branch_name: pr.head.name,
                    base_branch_name: pr.base.name,
                    number: pr.number,
                    title: pr.title,
                    body: pr.body.unwrap_or_default(),
                    labels: pr.labels.into_iter().map(|l| l.name).collect(),
                    files: Vec::new(),
                })
            })
            .collect())
    }
}

/// Component of a package without explicit configuration
fn default_component(path: &str, repo: &str) -> String {
    if path == ROOT_PATH {
        return repo.to_string();
    }
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(path)
        .to_string()
}

/// Packages declared in the config file, or every manifest path when none are
fn manifest_packages(config: &ManifestConfig, versions: &BTreeMap<String, String>) -> Vec<PackageSpec> {
    let default_package = PackageConfig::default();
    let paths: Vec<&String> = if config.packages.is_empty() {
        versions.keys().collect()
    } else {
        config.packages.keys().collect()
    };

    paths
        .into_iter()
        .map(|path| {
            let package = config.packages.get(path).unwrap_or(&default_package);
            let component = package
                .component
                .clone()
                .or_else(|| package.package_name.clone())
                .or_else(|| (path != ROOT_PATH).then(|| default_component(path, "")));

            PackageSpec {
                path: path.clone(),
                component,
                include_component_in_tag: package
                    .include_component_in_tag
                    .or(config.include_component_in_tag)
                    .unwrap_or(true),
            }
        })
        .collect()
}

async fn read_json<T: serde::de::DeserializeOwned>(
    github: &GitHubClient,
    path: &str,
    branch: &str,
) -> Result<T> {
    let unreadable = |reason: String| PlanError::FileUnreadable {
        path: PathBuf::from(path),
        git_ref: branch.to_string(),
        reason,
    };

    let text = github
        .file_contents(path, branch)
        .await
        .map_err(|e| unreadable(e.to_string()))?;
    Ok(serde_json::from_str(&text).map_err(|e| unreadable(e.to_string()))?)
}
