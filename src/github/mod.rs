//! GitHub access: raw content, the contents API, and the rate-limit probe.
//!
//! Everything is a one-shot GET with a fixed timeout: no retry, no backoff,
//! no response cache. Higher layers (marketplace browsing, prompt import)
//! express their fallback sequences against the [`Fetch`] trait so the
//! ordering is testable without a network.

use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::core::WorkbenchError;

/// A normalized `owner/repo` reference.
///
/// Accepts bare `owner/repo`, `https://github.com/owner/repo[.git]`, and
/// deep links such as blob URLs; everything after the repo segment is
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim().trim_end_matches('/');
        let path = trimmed
            .strip_prefix("https://github.com/")
            .or_else(|| trimmed.strip_prefix("http://github.com/"))
            .or_else(|| trimmed.strip_prefix("github.com/"))
            .unwrap_or(trimmed);

        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let owner = segments.next();
        let repo = segments.next();
        match (owner, repo) {
            (Some(owner), Some(repo)) if !owner.contains(':') => Ok(Self {
                owner: owner.to_string(),
                repo: repo.trim_end_matches(".git").to_string(),
            }),
            _ => Err(WorkbenchError::ConfigError {
                message: format!("'{input}' is not a GitHub repository (expected owner/repo)"),
            }
            .into()),
        }
    }

    /// Raw-content URL for a file on a branch.
    pub fn raw_url(&self, branch: &str, path: &str) -> String {
        format!(
            "https://raw.githubusercontent.com/{}/{}/{branch}/{path}",
            self.owner, self.repo
        )
    }

    /// Contents-API URL for a path (empty for the repo root).
    pub fn contents_url(&self, path: &str) -> String {
        format!(
            "https://api.github.com/repos/{}/{}/contents/{path}",
            self.owner, self.repo
        )
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Minimal GET surface the fallback strategies are written against.
pub trait Fetch {
    /// Fetch a URL as text. HTTP error statuses are errors.
    fn get_text(&self, url: &str) -> impl Future<Output = Result<String>> + Send;

    /// Fetch a URL and decode the JSON body.
    fn get_json(&self, url: &str) -> impl Future<Output = Result<Value>> + Send;
}

/// Rate-limit snapshot from `GET /rate_limit`.
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}

/// reqwest-backed GitHub client.
pub struct GitHubClient {
    http: reqwest::Client,
    token: Option<String>,
}

impl GitHubClient {
    /// Build a client with the given bearer token and per-request timeout.
    pub fn new(token: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("claude-workbench")
            .build()
            .map_err(|e| WorkbenchError::NetworkError {
                operation: "client setup".to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self {
            http,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    fn request(&self, url: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .http
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response> {
        let response =
            self.request(url)
                .send()
                .await
                .map_err(|e| WorkbenchError::NetworkError {
                    operation: url.to_string(),
                    reason: e.to_string(),
                })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let truncated: String = body.chars().take(200).collect();
            return Err(WorkbenchError::GitHubApiError {
                status: status.as_u16(),
                url: url.to_string(),
                body: truncated,
            }
            .into());
        }
        Ok(response)
    }

    /// Current rate-limit for the core API family.
    pub async fn rate_limit(&self) -> Result<RateLimit> {
        let value = self.get_json("https://api.github.com/rate_limit").await?;
        let core = value
            .pointer("/resources/core")
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("unexpected rate_limit response shape"))?;
        Ok(serde_json::from_value(core)?)
    }
}

impl Fetch for GitHubClient {
    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.send(url).await?;
        response.text().await.map_err(|e| {
            WorkbenchError::NetworkError {
                operation: url.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self.send(url).await?;
        response.json().await.map_err(|e| {
            WorkbenchError::NetworkError {
                operation: url.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_common_forms() {
        for input in [
            "acme/tools",
            "https://github.com/acme/tools",
            "https://github.com/acme/tools/",
            "https://github.com/acme/tools.git",
            "https://github.com/acme/tools/blob/main/promptInfo.json",
            "github.com/acme/tools",
        ] {
            let repo = RepoRef::parse(input).unwrap();
            assert_eq!(repo.to_string(), "acme/tools", "input: {input}");
        }
    }

    #[test]
    fn parse_rejects_non_repos() {
        assert!(RepoRef::parse("just-a-name").is_err());
        assert!(RepoRef::parse("").is_err());
        assert!(RepoRef::parse("https://gitlab.com").is_err());
    }

    #[test]
    fn url_builders() {
        let repo = RepoRef::parse("acme/tools").unwrap();
        assert_eq!(
            repo.raw_url("main", "marketplace.json"),
            "https://raw.githubusercontent.com/acme/tools/main/marketplace.json"
        );
        assert_eq!(
            repo.contents_url("plugins"),
            "https://api.github.com/repos/acme/tools/contents/plugins"
        );
    }
}
