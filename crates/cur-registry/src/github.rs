//! GitHub releases client (`/repos/{owner}/{repo}/releases/latest`).

use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION};

use crate::http::{check_response, parse_json};
use crate::{LatestRelease, RegistryClient, error::RegistryError};

#[derive(serde::Deserialize)]
struct GithubRelease {
    tag_name: String,
    published_at: Option<DateTime<Utc>>,
}

impl RegistryClient {
    /// Latest published release of `owner/repo`.
    ///
    /// A repository without releases is [`RegistryError::NotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the HTTP request fails, the API returns
    /// a non-success status, or the response cannot be parsed.
    pub async fn latest_github(&self, repo: &str) -> Result<LatestRelease, RegistryError> {
        let Some((owner, name)) = repo.split_once('/') else {
            return Err(RegistryError::Parse(format!(
                "github dependency '{repo}' is not owner/repo"
            )));
        };
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            self.endpoints.github_url,
            urlencoding::encode(owner),
            urlencoding::encode(name)
        );

        let mut request = self
            .http
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json");
        if !self.endpoints.github_token.is_empty() {
            request = request.header(
                AUTHORIZATION,
                format!("Bearer {}", self.endpoints.github_token),
            );
        }

        let resp = check_response(request.send().await?, repo).await?;
        parse_release(&resp.text().await?)
    }
}

fn parse_release(body: &str) -> Result<LatestRelease, RegistryError> {
    let data: GithubRelease = parse_json(body, "GitHub")?;
    Ok(LatestRelease {
        version: data.tag_name,
        release_date: data.published_at,
    })
}
