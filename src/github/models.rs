//! Wire types for the GitHub REST API.

use serde::{Deserialize, Serialize};

/// Repository metadata from `GET /repos/{owner}/{repo}`
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryInfo {
    /// `owner/repo`
    pub full_name: String,
    /// Branch new pull requests target by default
    pub default_branch: String,
}

/// Commit pointer nested in a tag record
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagCommit {
    /// Commit the tag points at
    pub sha: String,
}

/// Tag record from `GET /repos/{owner}/{repo}/tags`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteTag {
    /// Tag name without the `refs/tags/` prefix
    pub name: String,
    /// Tagged commit
    pub commit: TagCommit,
}

/// Request body for `POST /repos/{owner}/{repo}/git/refs`
#[derive(Debug, Clone, Serialize)]
pub struct NewReference<'a> {
    /// Fully qualified reference to create, e.g. `refs/tags/v1.0.0`
    #[serde(rename = "ref")]
    pub git_ref: String,
    /// Commit the reference points at
    pub sha: &'a str,
}

/// Object a reference points at
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefObject {
    /// Object id
    pub sha: String,
}

/// Reference returned after creation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RefCreated {
    /// Fully qualified reference, e.g. `refs/tags/v1.0.0`
    #[serde(rename = "ref")]
    pub git_ref: String,
    /// Object the reference points at
    pub object: RefObject,
}

/// Request body for `POST /repos/{owner}/{repo}/releases`
#[derive(Debug, Clone, Serialize)]
pub struct NewRelease<'a> {
    /// Tag to create or reuse
    pub tag_name: &'a str,
    /// Commit the tag is created at when it does not exist yet
    pub target_commitish: &'a str,
    /// Release title
    pub name: &'a str,
    /// Release notes
    pub body: &'a str,
    /// Leave the release unpublished
    pub draft: bool,
    /// Mark the release as a pre-release
    pub prerelease: bool,
}

/// Release returned after creation
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseInfo {
    /// Platform release id
    pub id: u64,
    /// Tag the release is attached to
    pub tag_name: String,
    /// Web page of the release
    pub html_url: String,
    /// Asset upload URL template
    pub upload_url: Option<String>,
    /// Whether the release is a draft
    #[serde(default)]
    pub draft: bool,
}

/// Label attached to an issue or pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Label text
    pub name: String,
}

/// Branch reference on a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
    /// Branch name
    #[serde(rename = "ref")]
    pub name: String,
}

/// Pull request from `GET /repos/{owner}/{repo}/pulls`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequestInfo {
    /// Pull request number
    pub number: u64,
    /// Title
    pub title: String,
    /// Description, absent when empty
    pub body: Option<String>,
    /// RFC 3339 merge timestamp, absent for unmerged pull requests
    pub merged_at: Option<String>,
    /// Commit created by the merge
    pub merge_commit_sha: Option<String>,
    /// Attached labels
    #[serde(default)]
    pub labels: Vec<Label>,
    /// Source branch
    pub head: BranchRef,
    /// Target branch
    pub base: BranchRef,
}

impl PullRequestInfo {
    /// Whether the pull request carries `label`
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.name == label)
    }
}

/// File from `GET /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Clone, Deserialize)]
pub struct ContentFile {
    /// Encoded file content
    pub content: String,
    /// Content encoding, `base64` for regular files
    pub encoding: String,
}

/// Error body returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    /// Human readable error
    pub message: String,
    /// Validation details; objects with a `code` or plain strings
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

impl ApiMessage {
    /// Whether a validation error reports an existing resource
    pub fn is_already_exists(&self) -> bool {
        self.errors
            .iter()
            .any(|e| e.get("code").and_then(|c| c.as_str()) == Some("already_exists"))
    }
}
