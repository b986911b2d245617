use hta_harvester::{Harvest, HarvestOptions};

use crate::error::Result;

/// Run the blocking harvester for `input` off the async runtime.
pub async fn execute_harvest(input: &str, options: &HarvestOptions) -> Result<Harvest> {
    let input = input.to_string();
    let options = options.clone();

    let harvest = tokio::task::spawn_blocking(move || {
        hta_harvester::harvest_with_options(&input, &options)
    })
    .await??;

    for warning in &harvest.corpus.warnings {
        tracing::warn!(warning = %warning, "harvest warning");
    }

    Ok(harvest)
}
