use cur_config::{CuratorConfig, ENV_PREFIX, OPENAI_API_KEY_ENV};

/// Emit warnings for configuration that will silently degrade a run.
pub fn warn_unconfigured(config: &CuratorConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &CuratorConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();
    let mut warnings = Vec::new();

    if !config.llm.is_configured() {
        if has_env_prefix(&env_keys, &format!("{ENV_PREFIX}LLM")) {
            warnings.push(format!(
                "LLM config appears default while {ENV_PREFIX}LLM* env vars exist. Use double underscores (example: {ENV_PREFIX}LLM__API_KEY)."
            ));
        } else {
            warnings.push(format!(
                "No language model API key (set llm.api_key or {OPENAI_API_KEY_ENV}); papers will not be scored and no suggestions will be made."
            ));
        }
    }

    if config.dependencies.is_empty() {
        warnings.push("No [[dependencies]] configured; dependency freshness will be empty.".to_string());
    }

    if !config.corpus.root.is_dir() {
        warnings.push(format!(
            "Corpus root {} is not a directory; link checks will fail.",
            config.corpus.root.display()
        ));
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
