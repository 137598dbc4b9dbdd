//! GitHub integration: connection options, REST client and wire types

mod client;
mod models;
mod options;

pub use client::GitHubClient;
pub use models::{
    BranchRef, ContentFile, Label, NewRelease, PullRequestInfo, RefCreated, RefObject,
    ReleaseInfo, RemoteTag, RepositoryInfo, TagCommit,
};
pub use options::{ConnectionOptions, ProxyOption, parse_repo};

use crate::config::ActionConfig;
use crate::error::Result;

/// Build connection options from the normalized inputs and connect
pub async fn connect(config: &ActionConfig) -> Result<GitHubClient> {
    let options = ConnectionOptions::from_config(config)?;
    Ok(GitHubClient::connect(options).await?)
}
