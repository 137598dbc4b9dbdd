//! In-memory doubles for the host, plan and output sink.

use crate::error::{HostError, Result};
use crate::github::{RefCreated, RefObject, RemoteTag, TagCommit};
use crate::outputs::OutputSink;
use crate::plan::{
    CreatedRelease, IntendedRelease, PullRequest, PullRequestRef, ReleasePlan, TagName,
};
use crate::tags::TagHost;
use async_trait::async_trait;
use futures::future;
use futures::stream::{self, BoxStream, StreamExt};
use semver::Version;
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Intended release of `path` at `version`, proposed in pull request `pr`
pub fn intended(path: &str, component: Option<&str>, version: &str, pr: u64) -> IntendedRelease {
    IntendedRelease {
        path: path.to_string(),
        tag: TagName::new(
            component.map(str::to_string),
            Version::parse(version).expect("valid version"),
        ),
        sha: format!("{:040x}", pr),
        notes: Some(format!("Release {}", version)),
        pull_request: PullRequestRef {
            number: pr,
            title: format!("chore: release {}", version),
        },
    }
}

/// Remote with a mutable tag list
#[derive(Debug, Default)]
pub struct FakeHost {
    tags: Mutex<Vec<String>>,
    rejected: HashSet<String>,
    broken: bool,
    scanned: AtomicUsize,
    created: Mutex<Vec<(String, String)>>,
}

impl FakeHost {
    pub fn with_tags(tags: &[&str]) -> Self {
        Self {
            tags: Mutex::new(tags.iter().map(|t| t.to_string()).collect()),
            ..Self::default()
        }
    }

    /// Reject reference creation for `tag`
    pub fn rejecting(mut self, tag: &str) -> Self {
        self.rejected.insert(tag.to_string());
        self
    }

    /// Fail every tag enumeration
    pub fn broken(mut self) -> Self {
        self.broken = true;
        self
    }

    /// Tags pulled from enumerations so far
    pub fn scanned(&self) -> usize {
        self.scanned.load(Ordering::SeqCst)
    }

    /// `(tag, sha)` of every reference created
    pub fn created(&self) -> Vec<(String, String)> {
        self.created.lock().expect("lock").clone()
    }
}

#[async_trait]
impl TagHost for FakeHost {
    fn tags(&self) -> BoxStream<'_, std::result::Result<RemoteTag, HostError>> {
        if self.broken {
            return stream::once(future::ready(Err(HostError::RateLimited {
                endpoint: "/tags".to_string(),
            })))
            .boxed();
        }

        let snapshot = self.tags.lock().expect("lock").clone();
        let scanned = &self.scanned;
        stream::iter(snapshot)
            .map(move |name| {
                scanned.fetch_add(1, Ordering::SeqCst);
                Ok(RemoteTag {
                    name,
                    commit: TagCommit {
                        sha: "0".repeat(40),
                    },
                })
            })
            .boxed()
    }

    async fn create_tag_reference(
        &self,
        _owner: &str,
        _repo: &str,
        tag_name: &str,
        sha: &str,
    ) -> std::result::Result<RefCreated, HostError> {
        if self.rejected.contains(tag_name) {
            return Err(HostError::Api {
                status: 422,
                endpoint: "/git/refs".to_string(),
                message: "Reference already exists".to_string(),
            });
        }

        self.tags.lock().expect("lock").push(tag_name.to_string());
        self.created
            .lock()
            .expect("lock")
            .push((tag_name.to_string(), sha.to_string()));
        Ok(RefCreated {
            git_ref: format!("refs/tags/{}", tag_name),
            object: RefObject {
                sha: sha.to_string(),
            },
        })
    }
}

/// Plan returning canned results and recording which operations ran
#[derive(Debug, Default)]
pub struct FakePlan {
    pub releases: Vec<Option<IntendedRelease>>,
    pub published: Vec<Option<CreatedRelease>>,
    pub pull_requests: Vec<Option<PullRequest>>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakePlan {
    pub fn with_releases(releases: Vec<Option<IntendedRelease>>) -> Self {
        Self {
            releases,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().expect("lock").clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().expect("lock").push(call);
    }
}

#[async_trait]
impl ReleasePlan for FakePlan {
    async fn build_releases(&self) -> Result<Vec<Option<IntendedRelease>>> {
        self.record("build_releases");
        Ok(self.releases.clone())
    }

    async fn create_releases(&self) -> Result<Vec<Option<CreatedRelease>>> {
        self.record("create_releases");
        Ok(self.published.clone())
    }

    async fn create_pull_requests(&self) -> Result<Vec<Option<PullRequest>>> {
        self.record("create_pull_requests");
        Ok(self.pull_requests.clone())
    }
}

/// Sink collecting outputs in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub outputs: Vec<(String, String)>,
}

impl MemorySink {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.outputs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl OutputSink for MemorySink {
    fn set_output(&mut self, key: &str, value: &str) -> Result<()> {
        self.outputs.push((key.to_string(), value.to_string()));
        Ok(())
    }
}
