use cur_discovery::prompts::resolve_prompts;
use serde::Serialize;

use crate::bootstrap;
use crate::cli::{ConfigArgs, GlobalFlags};
use crate::output::output;

#[derive(Debug, Serialize)]
struct PromptsResponse {
    origin: String,
    prompts: Vec<cur_core::entities::SearchPrompt>,
}

/// Handle `curator prompts`.
pub fn handle(args: &ConfigArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_config(args)?;
    let resolved = resolve_prompts(&config.discovery, &config.corpus.root);
    output(
        &PromptsResponse {
            origin: resolved.origin.to_string(),
            prompts: resolved.prompts,
        },
        flags.format,
    )
}
