//! Connection options for the GitHub client.

use crate::config::ActionConfig;
use crate::error::ConfigError;

/// HTTP proxy descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyOption {
    /// Proxy host name or address
    pub host: String,
    /// Proxy port
    pub port: u16,
}

impl ProxyOption {
    /// Parse a `host:port` string
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidProxy {
            value: value.to_string(),
        };

        let (host, port) = value.rsplit_once(':').ok_or_else(invalid)?;
        if host.is_empty() {
            return Err(invalid());
        }
        let port = port.parse::<u16>().map_err(|_| invalid())?;

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    /// Proxy URL understood by reqwest
    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Everything needed to open a repository on the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    /// Proxy all requests go through
    pub proxy: Option<ProxyOption>,
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// REST API base URL
    pub api_url: String,
    /// GraphQL endpoint
    pub graphql_url: String,
    /// Access token
    pub token: String,
    /// Branch override; resolved from the repository when `None`
    pub default_branch: Option<String>,
}

impl ConnectionOptions {
    /// Assemble connection options from normalized inputs
    pub fn from_config(config: &ActionConfig) -> Result<Self, ConfigError> {
        let (owner, repo) = parse_repo(&config.repo_url)?;
        let proxy = config
            .proxy_server
            .as_deref()
            .map(ProxyOption::parse)
            .transpose()?;

        Ok(Self {
            proxy,
            owner,
            repo,
            api_url: config.github_api_url.clone(),
            graphql_url: config.github_graphql_url.clone(),
            token: config.token.clone(),
            default_branch: config.target_branch.clone(),
        })
    }
}

/// Split `owner/repo` into its parts
pub fn parse_repo(value: &str) -> Result<(String, String), ConfigError> {
    let parts: Vec<&str> = value.split('/').collect();
    match parts.as_slice() {
        [owner, repo] if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(ConfigError::InvalidRepository {
            value: value.to_string(),
        }),
    }
}
