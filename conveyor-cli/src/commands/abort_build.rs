//! `conveyor abort-build` — abort one build of a job.

use anyhow::{bail, Context, Result};
use clap::Args;

use crate::{GlobalArgs, JobFlag};

/// Arguments for `conveyor abort-build`.
#[derive(Args, Debug)]
pub struct AbortBuildArgs {
    /// Job whose build to abort.
    #[arg(long, short = 'j', value_name = "PIPELINE/JOB")]
    pub job: JobFlag,

    /// Name of the build to abort.
    #[arg(long, short = 'b')]
    pub build: String,
}

impl AbortBuildArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let client = global.client()?;

        let build = client
            .job_build(&self.job.pipeline, &self.job.job, &self.build)
            .context("failed to get job build")?;
        let Some(build) = build else {
            bail!("job build does not exist");
        };

        client
            .abort_build(build.id)
            .context("failed to abort build")?;
        println!("build successfully aborted");
        Ok(())
    }
}
