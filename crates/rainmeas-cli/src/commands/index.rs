//! Registry index command

use rainmeas_core::error::{RainmeasError, RainmeasResult};
use rainmeas_core::types::RegistryIndex;

use super::CommandContext;

/// Print the registry index, falling back to the bundled one when offline
pub async fn execute(json: bool, ctx: &CommandContext) -> RainmeasResult<()> {
    let index = ctx.client.fetch_registry_index().await;

    if json {
        ctx.output.line(&index_json(&index)?);
    } else {
        for line in index_lines(&index) {
            ctx.output.line(&line);
        }
        ctx.output.info(&format!("{} packages", index.len()));
    }

    Ok(())
}

pub fn index_json(index: &RegistryIndex) -> RainmeasResult<String> {
    serde_json::to_string_pretty(index)
        .map_err(|e| RainmeasError::parse(format!("registry index as JSON: {}", e)))
}

/// `name latest [versions]` per package, in registry order
pub fn index_lines(index: &RegistryIndex) -> Vec<String> {
    index
        .iter()
        .map(|(name, entry)| {
            if entry.versions.is_empty() {
                format!("{} {}", name, entry.latest)
            } else {
                format!("{} {} [{}]", name, entry.latest, entry.versions.join(", "))
            }
        })
        .collect()
}
