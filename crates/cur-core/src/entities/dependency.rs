use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Ecosystem, Freshness};

/// A tracked dependency as declared in configuration.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DependencySpec {
    pub name: String,
    pub ecosystem: Ecosystem,
    /// Version the corpus was last written against.
    pub baseline: String,
}

/// Result of a successful package lookup.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DependencyRecord {
    pub package_name: String,
    pub ecosystem: Ecosystem,
    pub tracked_baseline_version: String,
    pub latest_observed_version: String,
    pub release_date: Option<DateTime<Utc>>,
    pub freshness: Freshness,
}

impl DependencyRecord {
    #[must_use]
    pub const fn is_outdated(&self) -> bool {
        matches!(self.freshness, Freshness::Behind)
    }
}
