//! Tag reconciliation.
//!
//! When platform releases are skipped, every intended release is published as
//! a bare `refs/tags/<tag>` reference instead. Tags already present on the
//! remote are left alone, so a rerun creates nothing new. Each entry is
//! handled on its own: a failure for one tag never drops its siblings.

mod host;

pub use host::TagHost;

use crate::cli::RuntimeConfig;
use crate::error::{HostError, Result};
use crate::plan::{CreatedRelease, IntendedRelease, ReleasePlan};
use futures::TryStreamExt;

/// Create the tags of every intended release that has none yet.
///
/// Returns one slot per slot of the plan. A slot is empty when nothing was
/// pending for that path, when its tag already existed, or when the remote
/// tags could not be read. A rejected creation still yields a record, with
/// `pr_number` 0.
pub async fn create_missing_tags(
    plan: &dyn ReleasePlan,
    host: &dyn TagHost,
    owner: &str,
    repo: &str,
    config: &RuntimeConfig,
) -> Result<Vec<Option<CreatedRelease>>> {
    let intended = plan.build_releases().await?;
    config.debug_println(&format!("{} release slot(s) to reconcile", intended.len()));

    let mut results = Vec::with_capacity(intended.len());
    for entry in &intended {
        let created = match entry {
            Some(release) => reconcile(release, host, owner, repo, config).await,
            None => None,
        };
        results.push(created);
    }

    Ok(results)
}

async fn reconcile(
    release: &IntendedRelease,
    host: &dyn TagHost,
    owner: &str,
    repo: &str,
    config: &RuntimeConfig,
) -> Option<CreatedRelease> {
    let tag_name = release.tag.to_string();

    match tag_exists(host, &tag_name).await {
        Ok(true) => {
            config.println(&format!("Tag {} already exists, skipping", tag_name));
            None
        }
        Ok(false) => {
            match host
                .create_tag_reference(owner, repo, &tag_name, &release.sha)
                .await
            {
                Ok(created) => {
                    config.success_println(&format!(
                        "Created tag {} at {}",
                        tag_name, created.object.sha
                    ));
                    Some(CreatedRelease::tag_only(release, release.pull_request.number))
                }
                Err(e) => {
                    config.warning_println(&format!("Failed to create tag {}: {}", tag_name, e));
                    Some(CreatedRelease::tag_only(release, 0))
                }
            }
        }
        Err(e) => {
            config.error_println(&format!("Failed to reconcile tag {}: {}", tag_name, e));
            None
        }
    }
}

/// Scan the remote tags for `tag_name`, stopping at the first match
async fn tag_exists(host: &dyn TagHost, tag_name: &str) -> std::result::Result<bool, HostError> {
    let mut tags = host.tags();
    while let Some(tag) = tags.try_next().await? {
        if tag.name == tag_name {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeHost, FakePlan, intended};

    fn config() -> RuntimeConfig {
        RuntimeConfig::default()
    }

    #[tokio::test]
    async fn test_existing_tag_is_skipped() {
        let plan = FakePlan::with_releases(vec![Some(intended(".", None, "1.0.0", 3))]);
        let host = FakeHost::with_tags(&["v0.9.0", "v1.0.0"]);

        let results = create_missing_tags(&plan, &host, "o", "r", &config())
            .await
            .expect("reconcile");

        assert_eq!(results, vec![None]);
        assert!(host.created().is_empty());
    }

    #[tokio::test]
    async fn test_missing_tags_are_created_once_each() {
        let plan = FakePlan::with_releases(vec![
            Some(intended("a", Some("a"), "1.0.0", 4)),
            None,
            Some(intended("b", Some("b"), "1.2.3", 4)),
        ]);
        let host = FakeHost::with_tags(&["a-v0.1.0"]);

        let results = create_missing_tags(&plan, &host, "o", "r", &config())
            .await
            .expect("reconcile");

        assert_eq!(results.len(), 3);
        assert!(results[1].is_none());

        let a = results[0].as_ref().expect("a created");
        assert_eq!(a.tag_name, "a-v1.0.0");
        assert_eq!(a.id, 0);
        assert_eq!(a.pr_number, 4);
        assert_eq!(a.notes, "Release 1.0.0");

        let b = results[2].as_ref().expect("b created");
        assert_eq!((b.major, b.minor, b.patch), (1, 2, 3));
        assert_eq!(b.version, "1.2.3");
        assert_eq!(b.path, "b");

        let created = host.created();
        assert_eq!(created.len(), 2);
        assert_eq!(created[0], ("a-v1.0.0".to_string(), format!("{:040x}", 4)));
        assert_eq!(created[1].0, "b-v1.2.3");
    }

    #[tokio::test]
    async fn test_second_run_creates_nothing() {
        let plan = FakePlan::with_releases(vec![
            Some(intended("a", Some("a"), "1.0.0", 4)),
            Some(intended("b", Some("b"), "1.2.0", 4)),
        ]);
        let host = FakeHost::with_tags(&[]);

        let first = create_missing_tags(&plan, &host, "o", "r", &config())
            .await
            .expect("first run");
        assert_eq!(first.iter().flatten().count(), 2);

        let second = create_missing_tags(&plan, &host, "o", "r", &config())
            .await
            .expect("second run");
        assert_eq!(second, vec![None, None]);
        assert_eq!(host.created().len(), 2);
    }

    #[tokio::test]
    async fn test_rejected_creation_is_isolated() {
        let plan = FakePlan::with_releases(vec![
            Some(intended("a", Some("a"), "1.0.0", 8)),
            Some(intended("b", Some("b"), "2.0.0", 8)),
            Some(intended("c", Some("c"), "3.0.0", 8)),
        ]);
        let host = FakeHost::with_tags(&[]).rejecting("b-v2.0.0");

        let results = create_missing_tags(&plan, &host, "o", "r", &config())
            .await
            .expect("reconcile");

        assert_eq!(results.iter().flatten().count(), 3);
        assert_eq!(results[0].as_ref().map(|r| r.pr_number), Some(8));
        assert_eq!(results[2].as_ref().map(|r| r.pr_number), Some(8));

        // A rejected tag keeps its record but loses the pull request number
        let rejected = results[1].as_ref().expect("best-effort record");
        assert_eq!(rejected.tag_name, "b-v2.0.0");
        assert_eq!(rejected.version, "2.0.0");
        assert_eq!(rejected.sha, format!("{:040x}", 8));
        assert_eq!(rejected.pr_number, 0);

        assert_eq!(host.created().len(), 2);
    }

    #[tokio::test]
    async fn test_enumeration_failure_empties_slot() {
        let plan = FakePlan::with_releases(vec![
            Some(intended(".", None, "1.0.0", 1)),
            Some(intended("b", Some("b"), "1.0.0", 1)),
        ]);
        let host = FakeHost::with_tags(&[]).broken();

        let results = create_missing_tags(&plan, &host, "o", "r", &config())
            .await
            .expect("reconcile");

        assert_eq!(results, vec![None, None]);
        assert!(host.created().is_empty());
    }

    #[tokio::test]
    async fn test_scan_stops_at_match() {
        let plan = FakePlan::with_releases(vec![Some(intended(".", None, "1.0.0", 1))]);
        let host = FakeHost::with_tags(&["v2.0.0", "v1.0.0", "v0.3.0", "v0.2.0", "v0.1.0"]);

        create_missing_tags(&plan, &host, "o", "r", &config())
            .await
            .expect("reconcile");

        assert_eq!(host.scanned(), 2);
    }

    #[tokio::test]
    async fn test_plan_failure_propagates() {
        struct FailingPlan;

        #[async_trait::async_trait]
        impl ReleasePlan for FailingPlan {
            async fn build_releases(&self) -> Result<Vec<Option<IntendedRelease>>> {
                Err(HostError::Unauthorized {
                    endpoint: "/pulls".to_string(),
                }
                .into())
            }
            async fn create_releases(&self) -> Result<Vec<Option<CreatedRelease>>> {
                Ok(Vec::new())
            }
            async fn create_pull_requests(
                &self,
            ) -> Result<Vec<Option<crate::plan::PullRequest>>> {
                Ok(Vec::new())
            }
        }

        let host = FakeHost::with_tags(&[]);
        let result = create_missing_tags(&FailingPlan, &host, "o", "r", &config()).await;
        assert!(result.is_err());
    }
}
