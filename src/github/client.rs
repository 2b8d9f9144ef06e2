//! GitHub REST API client

use serde_json::json;
use tracing::{info, instrument};

use super::RepoPath;
use crate::error::{GitHubError, Result};
use crate::http::{self, HttpRequest, HttpResponse};
use crate::process::ProcessRunner;

pub const API_BASE: &str = "https://api.github.com";

/// Settings for a newly created repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    pub private: bool,
    pub description: String,
    pub topics: Vec<String>,
    pub has_issues: bool,
    pub has_wiki: bool,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            private: true,
            description: "Repository copied using githelper".to_string(),
            topics: Vec::new(),
            has_issues: true,
            has_wiki: true,
        }
    }
}

pub struct GitHubClient<'a> {
    runner: &'a dyn ProcessRunner,
    token: String,
    api_base: String,
}

impl<'a> GitHubClient<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, token: impl Into<String>) -> Self {
        Self {
            runner,
            token: token.into(),
            api_base: API_BASE.to_string(),
        }
    }

    /// Create `dest`, under the organization when `is_org`, else for the authenticated user.
    /// Topics are applied afterwards when there are any.
    #[instrument(skip_all, fields(repo = %dest, is_org))]
    pub fn create_repository(
        &self,
        dest: &RepoPath,
        is_org: bool,
        config: &RepoConfig,
    ) -> Result<()> {
        let path = if is_org {
            format!("/orgs/{}/repos", dest.owner)
        } else {
            "/user/repos".to_string()
        };

        let body = json!({
            "name": dest.name,
            "private": config.private,
            "description": config.description,
            "has_issues": config.has_issues,
            "has_wiki": config.has_wiki,
        });

        let response = self.send("POST", &path, &body)?;
        match response.status {
            401 => return Err(GitHubError::Unauthorized.into()),
            422 => return Err(GitHubError::RepoExists.into()),
            _ => check(&response)?,
        }
        info!("repository created");

        if !config.topics.is_empty() {
            self.set_topics(dest, &config.topics)?;
        }
        Ok(())
    }

    /// Replace all topics of `repo`
    #[instrument(skip_all, fields(repo = %repo))]
    pub fn set_topics(&self, repo: &RepoPath, topics: &[String]) -> Result<()> {
        let path = format!("/repos/{}/{}/topics", repo.owner, repo.name);
        let response = self.send("PUT", &path, &json!({ "names": topics }))?;
        if response.status == 401 {
            return Err(GitHubError::Unauthorized.into());
        }
        check(&response)
    }

    fn send(
        &self,
        method: &'static str,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse> {
        let request = HttpRequest::new(method, format!("{}{}", self.api_base, path))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header("User-Agent", crate::APP_NAME)
            .json(body);
        http::send(self.runner, &request)
    }
}

fn check(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        Ok(())
    } else {
        Err(GitHubError::Api {
            status: response.status,
            message: response.error_message(),
        }
        .into())
    }
}
