//! Corpus file walker.
//!
//! Uses the `ignore` crate for gitignore-aware walking with a custom
//! `.curatorignore`, an extension allow-list, and exclude globs. Hidden
//! files are included (`.github/` docs count) but `.git/` and `.curator/`
//! never are.

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use cur_config::CorpusConfig;

use crate::error::CorpusError;

/// Custom ignore file honored in addition to `.gitignore`.
pub const IGNORE_FILENAME: &str = ".curatorignore";

const ALWAYS_SKIPPED_DIRS: [&str; 2] = [".git", ".curator"];

/// A document loaded from the corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusDocument {
    /// Path relative to the corpus root, `/`-separated.
    pub rel_path: String,
    pub abs_path: PathBuf,
    pub text: String,
}

/// Walk the corpus and load every matching document, sorted by path.
///
/// `skip_dir` (typically the report output directory) is excluded when it
/// lies strictly inside the root. Unreadable or non-UTF-8 files are logged
/// and skipped.
///
/// # Errors
///
/// Returns [`CorpusError::RootMissing`] if the root is not a directory and
/// [`CorpusError::Glob`] for an invalid exclude pattern.
pub fn collect_documents(
    config: &CorpusConfig,
    skip_dir: Option<&Path>,
) -> Result<Vec<CorpusDocument>, CorpusError> {
    let root = &config.root;
    if !root.is_dir() {
        return Err(CorpusError::RootMissing(root.clone()));
    }

    let excludes = build_excludes(&config.exclude)?;
    let skip_dir = skip_dir.and_then(|dir| nested_dir(root, dir));
    let extensions: Vec<String> = config
        .extensions
        .iter()
        .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
        .collect();

    let mut documents = Vec::new();
    for path in walk_files(root, skip_dir) {
        let Some(rel_path) = relative_path(root, &path) else {
            continue;
        };
        if !has_extension(&path, &extensions) || excludes.is_match(&rel_path) {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => documents.push(CorpusDocument {
                rel_path,
                abs_path: path,
                text,
            }),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "skipping unreadable document");
            }
        }
    }

    documents.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    tracing::debug!(root = %root.display(), documents = documents.len(), "corpus walked");
    Ok(documents)
}

/// Every regular file under `dir` that survives ignore rules, in walk order.
pub(crate) fn walk_files(dir: &Path, skip_dir: Option<PathBuf>) -> Vec<PathBuf> {
    let mut builder = WalkBuilder::new(dir);
    builder.hidden(false);
    builder.require_git(false);
    builder.add_custom_ignore_filename(IGNORE_FILENAME);
    builder.filter_entry(move |entry| {
        let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
        if !is_dir {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        if ALWAYS_SKIPPED_DIRS.contains(&name.as_ref()) {
            return false;
        }
        skip_dir.as_ref().is_none_or(|skip| {
            entry
                .path()
                .canonicalize()
                .map_or(true, |p| &p != skip)
        })
    });

    builder
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                tracing::warn!(%error, "walk error");
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(ignore::DirEntry::into_path)
        .collect()
}

fn build_excludes(patterns: &[String]) -> Result<GlobSet, CorpusError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| CorpusError::Glob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| CorpusError::Glob {
        pattern: patterns.join(", "),
        source,
    })
}

/// Canonical `dir` if it is strictly inside `root`.
fn nested_dir(root: &Path, dir: &Path) -> Option<PathBuf> {
    let root = root.canonicalize().ok()?;
    let dir = dir.canonicalize().ok()?;
    (dir != root && dir.starts_with(&root)).then_some(dir)
}

pub(crate) fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}

pub(crate) fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|e| extensions.contains(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn create_fixture(dir: &Path) {
        for sub in [
            "01-foundations",
            "02-implementation/code",
            ".git/objects",
            ".curator",
            "drafts",
            "reports",
            "node_modules/pkg",
        ] {
            fs::create_dir_all(dir.join(sub)).unwrap();
        }
        let files = [
            ("README.md", "# Agents\n"),
            ("01-foundations/intro.md", "# Intro\n"),
            ("01-foundations/notes.txt", "notes"),
            ("02-implementation/code/agent.py", "print('hi')"),
            ("02-implementation/tools.MD", "# Tools\n"),
            (".git/objects/HEAD.md", "not a doc"),
            (".curator/config.md", "not a doc"),
            ("drafts/wip.md", "# WIP\n"),
            ("reports/update_report.md", "# Old report\n"),
            ("node_modules/pkg/README.md", "# pkg\n"),
            ("secret.md", "# Secret\n"),
            (".curatorignore", "secret.md\n"),
        ];
        for (path, content) in files {
            fs::write(dir.join(path), content).unwrap();
        }
    }

    fn config(root: &Path) -> CorpusConfig {
        CorpusConfig {
            root: root.to_path_buf(),
            exclude: vec!["drafts/**".into(), "**/node_modules/**".into()],
            ..Default::default()
        }
    }

    fn paths(docs: &[CorpusDocument]) -> Vec<&str> {
        docs.iter().map(|d| d.rel_path.as_str()).collect()
    }

    #[test]
    fn collects_markdown_respecting_filters() {
        let tmp = tempfile::tempdir().unwrap();
        create_fixture(tmp.path());

        let docs = collect_documents(&config(tmp.path()), Some(&tmp.path().join("reports"))).unwrap();
        assert_eq!(
            paths(&docs),
            vec![
                "01-foundations/intro.md",
                "02-implementation/tools.MD",
                "README.md"
            ]
        );
        assert_eq!(docs[0].text, "# Intro\n");
    }

    #[test]
    fn output_dir_equal_to_root_is_not_excluded() {
        let tmp = tempfile::tempdir().unwrap();
        create_fixture(tmp.path());
        let docs = collect_documents(&config(tmp.path()), Some(tmp.path())).unwrap();
        assert!(paths(&docs).contains(&"README.md"));
        assert!(paths(&docs).contains(&"reports/update_report.md"));
    }

    #[test]
    fn extension_list_is_configurable() {
        let tmp = tempfile::tempdir().unwrap();
        create_fixture(tmp.path());
        let mut cfg = config(tmp.path());
        cfg.extensions = vec![".txt".into()];
        let docs = collect_documents(&cfg, None).unwrap();
        assert_eq!(paths(&docs), vec!["01-foundations/notes.txt"]);
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = CorpusConfig {
            root: tmp.path().join("nope"),
            ..Default::default()
        };
        assert!(matches!(
            collect_documents(&cfg, None),
            Err(CorpusError::RootMissing(_))
        ));
    }

    #[test]
    fn invalid_glob_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cfg = config(tmp.path());
        cfg.exclude = vec!["[unclosed".into()];
        assert!(matches!(
            collect_documents(&cfg, None),
            Err(CorpusError::Glob { .. })
        ));
    }
}
