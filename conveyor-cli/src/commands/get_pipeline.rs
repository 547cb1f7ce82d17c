//! `conveyor get-pipeline` — print the server's config for a pipeline.

use anyhow::{Context, Result};
use clap::Args;

use conveyor_client::PipelineApi;
use conveyor_core::PipelineName;

use crate::GlobalArgs;

/// Arguments for `conveyor get-pipeline`.
#[derive(Args, Debug)]
pub struct GetPipelineArgs {
    /// Pipeline to print.
    #[arg(long, short = 'p')]
    pub pipeline: String,

    /// Emit JSON instead of YAML.
    #[arg(long)]
    pub json: bool,
}

impl GetPipelineArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let client = global.client()?;
        let pipeline = PipelineName::from(self.pipeline.as_str());
        let fetched = client
            .get_config(&pipeline)
            .context("failed to fetch pipeline config")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&fetched.document)?);
        } else {
            print!("{}", fetched.document.to_yaml()?);
        }
        Ok(())
    }
}
