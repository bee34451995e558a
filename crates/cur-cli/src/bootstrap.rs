use anyhow::Context;
use cur_config::CuratorConfig;

use crate::cli::{ConfigArgs, RunArgs};

/// Load `.env`, then the layered configuration, then apply CLI overrides.
pub fn load_config(args: &ConfigArgs) -> anyhow::Result<CuratorConfig> {
    load_dotenv()?;

    let mut config = CuratorConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(corpus) = &args.corpus {
        config.corpus.root.clone_from(corpus);
    }
    Ok(config)
}

/// [`load_config`] plus the run-only overrides, revalidated.
pub fn load_run_config(args: &RunArgs) -> anyhow::Result<CuratorConfig> {
    let mut config = load_config(&args.config)?;
    apply_run_overrides(&mut config, args);
    config.validate().context("invalid command-line override")?;
    Ok(config)
}

fn apply_run_overrides(config: &mut CuratorConfig, args: &RunArgs) {
    if let Some(top_k) = args.top_k {
        config.general.top_k = top_k;
    }
    if let Some(limit) = args.concurrency {
        config.limits = cur_config::LimitsConfig::uniform(limit);
    }
    if let Some(secs) = args.deadline_secs {
        config.general.run_deadline_secs = secs;
    }
    if let Some(output) = &args.output {
        config.general.output_dir.clone_from(output);
    }
}

fn load_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let env_path = cwd.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ConfigArgs;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn run_overrides_replace_config_values() {
        let mut config = CuratorConfig::default();
        let args = RunArgs {
            config: ConfigArgs::default(),
            top_k: Some(3),
            concurrency: Some(1),
            deadline_secs: Some(30),
            output: Some(PathBuf::from("reports")),
        };
        apply_run_overrides(&mut config, &args);

        assert_eq!(config.general.top_k, 3);
        assert_eq!(config.limits, cur_config::LimitsConfig::uniform(1));
        assert_eq!(config.general.run_deadline_secs, 30);
        assert_eq!(config.general.output_dir, PathBuf::from("reports"));
    }

    #[test]
    fn zero_concurrency_fails_validation() {
        let mut config = CuratorConfig::default();
        let args = RunArgs {
            concurrency: Some(0),
            ..Default::default()
        };
        apply_run_overrides(&mut config, &args);
        assert!(config.validate().is_err());
    }
}
