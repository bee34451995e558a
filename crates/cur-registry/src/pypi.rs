//! `PyPI` registry client.
//!
//! Looks up `{pypi_url}/pypi/{name}/json`. The release date is the first
//! upload of the latest version's files.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::http::{check_response, parse_json};
use crate::{LatestRelease, RegistryClient, error::RegistryError};

#[derive(serde::Deserialize)]
struct PyPiResponse {
    info: PyPiInfo,
    #[serde(default)]
    releases: HashMap<String, Vec<PyPiFile>>,
}

#[derive(serde::Deserialize)]
struct PyPiInfo {
    version: String,
}

#[derive(serde::Deserialize)]
struct PyPiFile {
    upload_time_iso_8601: Option<DateTime<Utc>>,
    upload_time: Option<String>,
}

impl PyPiFile {
    fn uploaded_at(&self) -> Option<DateTime<Utc>> {
        self.upload_time_iso_8601.or_else(|| {
            self.upload_time
                .as_deref()
                .and_then(|t| NaiveDateTime::parse_from_str(t, "%Y-%m-%dT%H:%M:%S").ok())
                .map(|t| t.and_utc())
        })
    }
}

impl RegistryClient {
    /// Latest release of a `PyPI` project.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the HTTP request fails, the registry
    /// returns a non-success status, or the response cannot be parsed.
    pub async fn latest_pypi(&self, name: &str) -> Result<LatestRelease, RegistryError> {
        let url = format!(
            "{}/pypi/{}/json",
            self.endpoints.pypi_url,
            urlencoding::encode(name)
        );
        let resp = check_response(self.http.get(&url).send().await?, name).await?;
        parse_pypi(&resp.text().await?)
    }
}

fn parse_pypi(body: &str) -> Result<LatestRelease, RegistryError> {
    let data: PyPiResponse = parse_json(body, "PyPI")?;
    let release_date = data
        .releases
        .get(&data.info.version)
        .and_then(|files| files.iter().filter_map(PyPiFile::uploaded_at).min());
    Ok(LatestRelease {
        version: data.info.version,
        release_date,
    })
}
