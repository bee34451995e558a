//! crates.io registry client.

use chrono::{DateTime, Utc};

use crate::http::{check_response, parse_json};
use crate::{LatestRelease, RegistryClient, error::RegistryError};

#[derive(serde::Deserialize)]
struct CrateResponse {
    #[serde(rename = "crate")]
    krate: CrateInfo,
    #[serde(default)]
    versions: Vec<CrateVersion>,
}

#[derive(serde::Deserialize)]
struct CrateInfo {
    max_version: String,
    max_stable_version: Option<String>,
}

#[derive(serde::Deserialize)]
struct CrateVersion {
    num: String,
    created_at: DateTime<Utc>,
}

impl RegistryClient {
    /// Latest stable release of a crate (falls back to the max version).
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the HTTP request fails, the registry
    /// returns a non-success status, or the response cannot be parsed.
    pub async fn latest_crates_io(&self, name: &str) -> Result<LatestRelease, RegistryError> {
        let url = format!(
            "{}/api/v1/crates/{}",
            self.endpoints.crates_url,
            urlencoding::encode(name)
        );
        let resp = check_response(self.http.get(&url).send().await?, name).await?;
        parse_crate(&resp.text().await?)
    }
}

fn parse_crate(body: &str) -> Result<LatestRelease, RegistryError> {
    let data: CrateResponse = parse_json(body, "crates.io")?;
    let version = data.krate.max_stable_version.unwrap_or(data.krate.max_version);
    let release_date = data
        .versions
        .iter()
        .find(|v| v.num == version)
        .map(|v| v.created_at);
    Ok(LatestRelease {
        version,
        release_date,
    })
}
