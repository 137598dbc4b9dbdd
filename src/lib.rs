//! # Kodegen Release Action
//!
//! Publishes pending releases from a CI job.
//!
//! A run normalizes the action inputs, connects to GitHub, loads the release
//! plan for the target branch and then either publishes platform releases or,
//! with `skip-github-release`, creates only the missing tags. Release pull
//! requests are opened or updated afterwards. Every result is flattened into
//! step outputs.
//!
//! ## Features
//!
//! - **Idempotent tagging**: tags already on the remote are never recreated
//! - **Per-tag isolation**: one failed tag never hides its siblings' results
//! - **Stable outputs**: path-namespaced keys compatible with existing workflows
//!
//! ## Usage
//!
//! ```bash
//! kodegen_release_action --token $GITHUB_TOKEN --release-type rust
//! kodegen_release_action --token $GITHUB_TOKEN --skip-github-release true
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod outputs;
pub mod plan;
pub mod tags;

#[cfg(test)]
mod testing;

pub use cli::{Args, RuntimeConfig};
pub use config::{ActionConfig, EnvConfig, Toggle};
pub use error::{ConfigError, HostError, PlanError, ReleaseError, Result};
pub use github::GitHubClient;
pub use outputs::{OutputMap, OutputSink};
pub use plan::{CreatedRelease, IntendedRelease, PlanStrategy, ReleasePlan};
pub use tags::{TagHost, create_missing_tags};
