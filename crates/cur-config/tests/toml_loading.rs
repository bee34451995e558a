//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed file and env var manipulation.

use cur_config::{CuratorConfig, ScholarlySource};
use cur_core::enums::Ecosystem;
use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

#[test]
fn loads_every_section_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[general]
top_k = 5
output_dir = "reports"
run_deadline_secs = 120

[llm]
scoring_model = "gpt-4.1-mini"

[discovery]
sources = ["arxiv", "semantic_scholar"]
results_per_prompt = 2

[[discovery.prompts]]
query = "agent memory architectures"
rationale = "Memory chapter is thin"

[limits]
link_concurrency = 8

[links]
timeout_secs = 3

[corpus]
root = "kb"
extensions = ["md", "markdown"]

[[dependencies]]
name = "langchain"
ecosystem = "pypi"
baseline = "0.2.0"

[[dependencies]]
name = "langchain-ai/langgraph"
ecosystem = "github"
baseline = "0.1.0"
"#,
        )?;

        let config: CuratorConfig = Figment::from(Serialized::defaults(CuratorConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.general.top_k, 5);
        assert_eq!(config.general.output_dir, PathBuf::from("reports"));
        assert_eq!(config.general.run_deadline_secs, 120);
        assert_eq!(config.llm.scoring_model, "gpt-4.1-mini");
        assert_eq!(config.llm.suggestion_model, "gpt-4o");
        assert_eq!(
            config.discovery.sources,
            vec![ScholarlySource::Arxiv, ScholarlySource::SemanticScholar]
        );
        assert_eq!(config.discovery.prompts.len(), 1);
        assert_eq!(
            config.discovery.prompts[0].rationale.as_deref(),
            Some("Memory chapter is thin")
        );
        assert_eq!(config.limits.link_concurrency, 8);
        assert_eq!(config.limits.scoring_concurrency, 4);
        assert_eq!(config.links.timeout_secs, 3);
        assert_eq!(config.corpus.root, PathBuf::from("kb"));
        assert_eq!(config.corpus.sections.len(), 6);
        assert_eq!(config.dependencies.len(), 2);
        assert_eq!(config.dependencies[1].ecosystem, Ecosystem::Github);
        assert!(config.validate().is_ok());
        Ok(())
    });
}

#[test]
fn explicit_file_is_loaded() {
    Jail::expect_with(|jail| {
        jail.create_file("custom.toml", "[general]\ntop_k = 3\n")?;
        let config = CuratorConfig::load(Some(Path::new("custom.toml"))).expect("config loads");
        assert_eq!(config.general.top_k, 3);
        Ok(())
    });
}

#[test]
fn explicit_file_beats_project_file() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".curator"))
            .expect("create project config dir");
        jail.create_file(
            ".curator/config.toml",
            "[general]\ntop_k = 7\nrun_deadline_secs = 30\n",
        )?;
        jail.create_file("custom.toml", "[general]\ntop_k = 3\n")?;

        let config = CuratorConfig::load(Some(Path::new("custom.toml"))).expect("config loads");
        assert_eq!(config.general.top_k, 3);
        assert_eq!(config.general.run_deadline_secs, 30);
        Ok(())
    });
}

#[test]
fn missing_explicit_file_is_an_error() {
    Jail::expect_with(|_jail| {
        let err = CuratorConfig::load(Some(Path::new("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("nope.toml"));
        Ok(())
    });
}

#[test]
fn invalid_values_fail_validation() {
    Jail::expect_with(|jail| {
        jail.create_file("bad.toml", "[limits]\nregistry_concurrency = 0\n")?;
        let err = CuratorConfig::load(Some(Path::new("bad.toml"))).unwrap_err();
        assert!(err.to_string().contains("limits.registry_concurrency"));
        Ok(())
    });
}

#[test]
fn unknown_ecosystem_is_a_parse_error() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "bad.toml",
            "[[dependencies]]\nname = \"x\"\necosystem = \"cpan\"\nbaseline = \"1\"\n",
        )?;
        assert!(CuratorConfig::load(Some(Path::new("bad.toml"))).is_err());
        Ok(())
    });
}

#[test]
fn shipped_example_config_is_valid() {
    let example = include_str!("../../../config/curator.example.toml");
    let config: CuratorConfig = Figment::from(Serialized::defaults(CuratorConfig::default()))
        .merge(Toml::string(example))
        .extract()
        .unwrap();

    config.validate().unwrap();
    assert_eq!(config.dependencies.len(), 6);
    assert_eq!(config.dependencies[5].ecosystem, Ecosystem::Github);
    assert_eq!(config.corpus.section_titles().len(), 6);
}
