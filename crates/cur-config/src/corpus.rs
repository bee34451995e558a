//! Corpus layout: where the content lives and how it is sectioned.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One top-level corpus section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SectionConfig {
    /// Directory relative to the corpus root.
    pub dir: String,
    /// Display title; the scorer's `suggested_section` must be one of these.
    pub title: String,
}

impl SectionConfig {
    fn new(dir: &str, title: &str) -> Self {
        Self {
            dir: dir.to_string(),
            title: title.to_string(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_sections() -> Vec<SectionConfig> {
    vec![
        SectionConfig::new("01-foundations", "Foundations"),
        SectionConfig::new("02-implementation", "Implementation"),
        SectionConfig::new("03-modern-frameworks", "Modern Frameworks"),
        SectionConfig::new("04-strategy", "Strategy"),
        SectionConfig::new("05-research", "Research"),
        SectionConfig::new("06-labs", "Labs"),
    ]
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec!["**/node_modules/**".to_string(), "**/target/**".to_string()]
}

const fn default_stale_after_years() -> i32 {
    2
}

const fn default_max_headings() -> usize {
    8
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorpusConfig {
    /// Root directory of the content corpus.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    #[serde(default = "default_sections")]
    pub sections: Vec<SectionConfig>,

    /// File extensions scanned for links and headings.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Glob patterns (relative to the root) excluded from scanning.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Years at least this far before the current year flag a file as stale.
    #[serde(default = "default_stale_after_years")]
    pub stale_after_years: i32,

    /// Cap on headings listed per section in the corpus summary.
    #[serde(default = "default_max_headings")]
    pub max_headings: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            sections: default_sections(),
            extensions: default_extensions(),
            exclude: default_exclude(),
            stale_after_years: default_stale_after_years(),
            max_headings: default_max_headings(),
        }
    }
}

impl CorpusConfig {
    /// Section titles, in configured order.
    #[must_use]
    pub fn section_titles(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.title.clone()).collect()
    }
}
