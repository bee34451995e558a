//! npm registry client.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::http::{check_response, parse_json};
use crate::{LatestRelease, RegistryClient, error::RegistryError};

#[derive(serde::Deserialize)]
struct NpmPackument {
    #[serde(rename = "dist-tags")]
    dist_tags: NpmDistTags,
    #[serde(default)]
    time: HashMap<String, String>,
}

#[derive(serde::Deserialize)]
struct NpmDistTags {
    latest: String,
}

impl RegistryClient {
    /// Latest (`dist-tags.latest`) release of an npm package.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the HTTP request fails, the registry
    /// returns a non-success status, or the response cannot be parsed.
    pub async fn latest_npm(&self, name: &str) -> Result<LatestRelease, RegistryError> {
        // Scoped packages keep the `@` but escape the slash.
        let url = format!(
            "{}/{}",
            self.endpoints.npm_url,
            name.replace('/', "%2F")
        );
        let resp = check_response(self.http.get(&url).send().await?, name).await?;
        parse_packument(&resp.text().await?)
    }
}

fn parse_packument(body: &str) -> Result<LatestRelease, RegistryError> {
    let data: NpmPackument = parse_json(body, "npm")?;
    let version = data.dist_tags.latest;
    let release_date = data
        .time
        .get(&version)
        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
        .map(|t| t.with_timezone(&Utc));
    Ok(LatestRelease {
        version,
        release_date,
    })
}
