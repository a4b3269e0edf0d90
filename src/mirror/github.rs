//! [`RemoteStore`] backed by the GitHub repository contents API.

use super::{RemoteFile, RemoteStore};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub struct GitHubStore {
    client: Client,
    api_base: String,
    owner: String,
    repo: String,
    token: String,
}

#[derive(Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Serialize)]
struct PutRequest<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
    branch: &'a str,
}

impl GitHubStore {
    pub fn new(api_base: &str, owner: &str, repo: &str, token: &str) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("clockbot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            token: token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_base,
            self.owner,
            self.repo,
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl RemoteStore for GitHubStore {
    async fn fetch(&self, path: &str, branch: &str) -> AppResult<Option<RemoteFile>> {
        let resp = self
            .client
            .get(self.url(path))
            .query(&[("ref", branch)])
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(AppError::Remote(format!("GET {path}: {}", resp.status())));
        }

        let body: ContentsResponse = resp.json().await?;
        let content = match (body.content, body.encoding.as_deref()) {
            (Some(raw), Some("base64") | None) => decode_content(&raw)?,
            (Some(raw), Some(_)) => raw,
            (None, _) => String::new(),
        };

        Ok(Some(RemoteFile {
            sha: body.sha,
            content,
        }))
    }

    async fn put(
        &self,
        path: &str,
        content: &str,
        sha: Option<&str>,
        branch: &str,
        message: &str,
    ) -> AppResult<()> {
        let body = PutRequest {
            message,
            content: STANDARD.encode(content),
            sha,
            branch,
        };

        let resp = self
            .client
            .put(self.url(path))
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .json(&body)
            .send()
            .await?;

        match resp.status() {
            s if s.is_success() => Ok(()),
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => Err(AppError::Remote(
                format!("PUT {path}: version tag mismatch ({})", resp.status()),
            )),
            s => Err(AppError::Remote(format!("PUT {path}: {s}"))),
        }
    }
}

/// GitHub wraps base64 payloads at 60 columns.
fn decode_content(raw: &str) -> AppResult<String> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| AppError::Remote(format!("invalid base64 content: {e}")))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
