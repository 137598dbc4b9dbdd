//! GitHub REST API client.
//!
//! Provides an authenticated HTTP client bound to one repository, with lazy
//! pagination over `Link` headers.

use super::models::{
    ApiMessage, ContentFile, Label, NewReference, NewRelease, PullRequestInfo, RefCreated,
    ReleaseInfo, RemoteTag, RepositoryInfo,
};
use super::options::ConnectionOptions;
use crate::error::HostError;
use crate::tags::TagHost;
use async_trait::async_trait;
use base64::Engine;
use futures::future;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Items requested per page
const PER_PAGE: &str = "100";

/// Upper bound on closed pull requests scanned for merged release PRs
const MAX_SCANNED_PULLS: usize = 400;

/// GitHub client bound to one repository
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    options: ConnectionOptions,
    default_branch: String,
}

impl GitHubClient {
    /// Connect to the repository described by `options`.
    ///
    /// Resolves the default branch from the repository unless the options
    /// carry an override. Rejected credentials and unknown repositories
    /// surface as [`HostError::Unauthorized`] / [`HostError::NotFound`].
    pub async fn connect(options: ConnectionOptions) -> Result<Self, HostError> {
        let client = Self::build_http_client(&options)?;
        let mut github = Self {
            client,
            options,
            default_branch: String::new(),
        };

        github.default_branch = match github.options.default_branch.clone() {
            Some(branch) => branch,
            None => github.repository().await?.default_branch,
        };

        log::debug!(
            "Connected to {}/{} (branch {})",
            github.options.owner,
            github.options.repo,
            github.default_branch
        );
        Ok(github)
    }

    fn build_http_client(options: &ConnectionOptions) -> Result<Client, HostError> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", options.token)).map_err(|_| {
            HostError::Unauthorized {
                endpoint: options.api_url.clone(),
            }
        })?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static("2022-11-28"));

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));

        if let Some(proxy) = &options.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy.url())?);
        }

        Ok(builder.build()?)
    }

    /// Repository owner
    pub fn owner(&self) -> &str {
        &self.options.owner
    }

    /// Repository name
    pub fn repo(&self) -> &str {
        &self.options.repo
    }

    /// Branch releases are computed against
    pub fn default_branch(&self) -> &str {
        &self.default_branch
    }

    /// GraphQL base URL handed to the release-pr command
    pub fn graphql_url(&self) -> &str {
        &self.options.graphql_url
    }

    /// REST base URL
    pub fn api_base(&self) -> &str {
        &self.options.api_url
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.options.api_url.trim_end_matches('/'), endpoint)
    }

    fn repo_path(&self, suffix: &str) -> String {
        format!("/repos/{}/{}{}", self.options.owner, self.options.repo, suffix)
    }

    /// Map a non-success response to a typed error
    async fn error_for(response: Response, endpoint: &str) -> HostError {
        let status = response.status();
        let endpoint = endpoint.to_string();

        let quota_exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            == Some("0");

        match status {
            StatusCode::UNAUTHORIZED => return HostError::Unauthorized { endpoint },
            StatusCode::NOT_FOUND => return HostError::NotFound { endpoint },
            StatusCode::TOO_MANY_REQUESTS => return HostError::RateLimited { endpoint },
            StatusCode::FORBIDDEN if quota_exhausted => {
                return HostError::RateLimited { endpoint };
            }
            _ => {}
        }

        let body = response.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<ApiMessage>(&body).ok();

        if status == StatusCode::UNPROCESSABLE_ENTITY
            && let Some(api) = parsed.as_ref().filter(|m| m.is_already_exists())
        {
            return HostError::AlreadyExists {
                endpoint,
                message: api.message.clone(),
            };
        }

        let message = parsed.map(|m| m.message).unwrap_or(body);

        HostError::Api {
            status: status.as_u16(),
            endpoint,
            message,
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        response: Response,
        endpoint: &str,
    ) -> Result<T, HostError> {
        if !response.status().is_success() {
            return Err(Self::error_for(response, endpoint).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| HostError::InvalidResponse {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, HostError> {
        log::debug!("GET {}", endpoint);
        let response = self
            .client
            .get(self.api_url(endpoint))
            .query(query)
            .send()
            .await?;
        Self::handle_response(response, endpoint).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, HostError> {
        log::debug!("POST {}", endpoint);
        let response = self
            .client
            .post(self.api_url(endpoint))
            .json(body)
            .send()
            .await?;
        Self::handle_response(response, endpoint).await
    }

    /// Fetch one page and the URL of the next one
    async fn get_page<T: DeserializeOwned>(
        &self,
        url: &str,
        endpoint: &str,
    ) -> Result<(Vec<T>, Option<String>), HostError> {
        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let next = next_link(response.headers());
        let items = Self::handle_response::<Vec<T>>(response, endpoint).await?;
        Ok((items, next))
    }

    /// Lazily walk every page of a list endpoint
    fn paginate<T>(
        &self,
        endpoint: String,
        query: Vec<(&'static str, String)>,
    ) -> BoxStream<'_, Result<T, HostError>>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let base = self.api_url(&endpoint);
        let params = query
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .chain([("per_page", PER_PAGE)]);

        let first = match Url::parse_with_params(&base, params) {
            Ok(url) => url.to_string(),
            Err(e) => {
                let err = HostError::InvalidUrl {
                    url: base,
                    reason: e.to_string(),
                };
                return stream::once(future::ready(Err(err))).boxed();
            }
        };

        stream::try_unfold(Some(first), move |next: Option<String>| {
            let endpoint = endpoint.clone();
            async move {
                let Some(url) = next else {
                    return Ok::<_, HostError>(None);
                };
                let (items, next) = self.get_page::<T>(&url, &endpoint).await?;
                let page = stream::iter(items.into_iter().map(Ok::<T, HostError>));
                Ok(Some((page, next)))
            }
        })
        .try_flatten()
        .boxed()
    }

    /// Repository metadata
    pub async fn repository(&self) -> Result<RepositoryInfo, HostError> {
        self.get_json(&self.repo_path(""), &[]).await
    }

    /// Create a platform release
    pub async fn create_release(&self, release: &NewRelease<'_>) -> Result<ReleaseInfo, HostError> {
        self.post_json(&self.repo_path("/releases"), release).await
    }

    /// Merged pull requests into `base` carrying `label`.
    ///
    /// Scans closed pull requests by most recent update, so the result is not
    /// in merge order.
    pub async fn merged_pull_requests_with_label(
        &self,
        base: &str,
        label: &str,
    ) -> Result<Vec<PullRequestInfo>, HostError> {
        let query = vec![
            ("state", "closed".to_string()),
            ("base", base.to_string()),
            ("sort", "updated".to_string()),
            ("direction", "desc".to_string()),
        ];

        self.paginate::<PullRequestInfo>(self.repo_path("/pulls"), query)
            .take(MAX_SCANNED_PULLS)
            .try_filter(|pr| future::ready(pr.merged_at.is_some() && pr.has_label(label)))
            .try_collect()
            .await
    }

    /// Open pull requests carrying `label`
    pub async fn open_pull_requests_with_label(
        &self,
        label: &str,
    ) -> Result<Vec<PullRequestInfo>, HostError> {
        let query = vec![("state", "open".to_string())];

        self.paginate::<PullRequestInfo>(self.repo_path("/pulls"), query)
            .try_filter(|pr| future::ready(pr.has_label(label)))
            .try_collect()
            .await
    }

    /// Text content of a repository file at `git_ref`
    pub async fn file_contents(&self, path: &str, git_ref: &str) -> Result<String, HostError> {
        let endpoint = self.repo_path(&format!("/contents/{}", path.trim_start_matches('/')));
        let file: ContentFile = self.get_json(&endpoint, &[("ref", git_ref)]).await?;

        let invalid = |reason: String| HostError::InvalidResponse {
            endpoint: endpoint.clone(),
            reason,
        };

        if file.encoding != "base64" {
            return Err(invalid(format!("unsupported encoding '{}'", file.encoding)));
        }

        let compact: String = file.content.split_whitespace().collect();
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(compact)
            .map_err(|e| invalid(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| invalid(e.to_string()))
    }

    /// Add labels to an issue or pull request
    pub async fn add_labels(&self, number: u64, labels: &[&str]) -> Result<Vec<Label>, HostError> {
        #[derive(Serialize)]
        struct Body<'a> {
            labels: &'a [&'a str],
        }

        let endpoint = self.repo_path(&format!("/issues/{}/labels", number));
        self.post_json(&endpoint, &Body { labels }).await
    }

    /// Remove one label from an issue or pull request
    pub async fn remove_label(&self, number: u64, label: &str) -> Result<(), HostError> {
        let endpoint = self.repo_path(&format!("/issues/{}/labels", number));
        let base = self.api_url(&endpoint);

        let mut url = Url::parse(&base).map_err(|e| HostError::InvalidUrl {
            url: base.clone(),
            reason: e.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|()| HostError::InvalidUrl {
                url: base.clone(),
                reason: "URL cannot be a base".to_string(),
            })?
            .push(label);

        log::debug!("DELETE {}", url);
        let response = self.client.delete(url).send().await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_for(response, &endpoint).await)
        }
    }
}

#[async_trait]
impl TagHost for GitHubClient {
    fn tags(&self) -> BoxStream<'_, Result<RemoteTag, HostError>> {
        self.paginate(self.repo_path("/tags"), Vec::new())
    }

    async fn create_tag_reference(
        &self,
        owner: &str,
        repo: &str,
        tag_name: &str,
        sha: &str,
    ) -> Result<RefCreated, HostError> {
        let endpoint = format!("/repos/{}/{}/git/refs", owner, repo);
        let body = NewReference {
            git_ref: format!("refs/tags/{}", tag_name),
            sha,
        };
        self.post_json(&endpoint, &body).await
    }
}

/// URL of the `rel="next"` entry in a `Link` header
fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::LINK)?
        .to_str()
        .ok()?
        .split(',')
        .find(|part| part.contains("rel=\"next\""))
        .and_then(|part| {
            let start = part.find('<')? + 1;
            let end = part.find('>')?;
            part.get(start..end).map(str::to_string)
        })
}
