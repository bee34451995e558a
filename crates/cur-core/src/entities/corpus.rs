use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Structural overview of one configured corpus section.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct SectionSummary {
    /// Directory relative to the corpus root (e.g. `01-foundations`).
    pub dir: String,
    /// Display title, also the section label offered to the scorer.
    pub title: String,
    pub exists: bool,
    pub markdown_files: usize,
    pub other_files: usize,
    /// Leading `#` headings of the section's documents, capped.
    pub headings: Vec<String>,
}

/// Compact summary of the corpus, small enough for a single model prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CorpusSummary {
    pub sections: Vec<SectionSummary>,
    pub total_markdown_files: usize,
}

impl CorpusSummary {
    /// Render as plain text for a language-model prompt.
    #[must_use]
    pub fn to_prompt_text(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            if !section.exists {
                out.push_str(&format!("- {} ({}): missing\n", section.title, section.dir));
                continue;
            }
            out.push_str(&format!(
                "- {} ({}): {} documents, {} other files\n",
                section.title, section.dir, section.markdown_files, section.other_files
            ));
            for heading in &section.headings {
                out.push_str(&format!("  - {heading}\n"));
            }
        }
        out.push_str(&format!(
            "Total markdown documents: {}\n",
            self.total_markdown_files
        ));
        out
    }
}

/// A file that mentions years old enough to suggest outdated content.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StaleReference {
    pub source_file: String,
    /// Distinct years, ascending.
    pub years: Vec<i32>,
}
