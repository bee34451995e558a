use crate::bootstrap;
use crate::cli::{ConfigArgs, GlobalFlags};
use crate::output::output;

/// Handle `curator config`: the effective configuration, API keys redacted.
pub fn handle(args: &ConfigArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_config(args)?;
    output(&config.redacted(), flags.format)
}
