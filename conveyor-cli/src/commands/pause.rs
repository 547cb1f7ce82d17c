//! `conveyor pause-*` / `unpause-*` for pipelines and jobs.

use anyhow::{Context, Result};
use clap::Args;

use conveyor_core::PipelineName;

use crate::{GlobalArgs, JobFlag};

/// Arguments for `conveyor pause-pipeline` / `unpause-pipeline`.
#[derive(Args, Debug)]
pub struct PipelineArgs {
    /// Pipeline to pause or unpause.
    #[arg(long, short = 'p')]
    pub pipeline: String,
}

impl PipelineArgs {
    pub fn pause(self, global: &GlobalArgs) -> Result<()> {
        let pipeline = PipelineName::from(self.pipeline.as_str());
        global
            .client()?
            .pause_pipeline(&pipeline)
            .with_context(|| format!("failed to pause pipeline '{pipeline}'"))?;
        println!("paused '{pipeline}'");
        Ok(())
    }

    pub fn unpause(self, global: &GlobalArgs) -> Result<()> {
        let pipeline = PipelineName::from(self.pipeline.as_str());
        global
            .client()?
            .unpause_pipeline(&pipeline)
            .with_context(|| format!("failed to unpause pipeline '{pipeline}'"))?;
        println!("unpaused '{pipeline}'");
        Ok(())
    }
}

/// Arguments for `conveyor pause-job` / `unpause-job`.
#[derive(Args, Debug)]
pub struct JobArgs {
    /// Job to pause or unpause.
    #[arg(long, short = 'j', value_name = "PIPELINE/JOB")]
    pub job: JobFlag,
}

impl JobArgs {
    pub fn pause(self, global: &GlobalArgs) -> Result<()> {
        let JobFlag { pipeline, job } = &self.job;
        global
            .client()?
            .pause_job(pipeline, job)
            .with_context(|| format!("failed to pause job '{}'", self.job))?;
        println!("paused '{job}'");
        Ok(())
    }

    pub fn unpause(self, global: &GlobalArgs) -> Result<()> {
        let JobFlag { pipeline, job } = &self.job;
        global
            .client()?
            .unpause_job(pipeline, job)
            .with_context(|| format!("failed to unpause job '{}'", self.job))?;
        println!("unpaused '{job}'");
        Ok(())
    }
}
