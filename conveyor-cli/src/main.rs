//! Conveyor — operator CLI for a CI orchestration server.
//!
//! # Usage
//!
//! ```text
//! conveyor save-target -t <target> --api <url> [--token-type T --token V]
//! conveyor targets
//! conveyor -t <target> set-pipeline -p <pipeline> -c <file> [-v k=v]... [-l vars.yml]... [--non-interactive]
//! conveyor -t <target> get-pipeline -p <pipeline> [--json]
//! conveyor -t <target> checklist -p <pipeline>
//! conveyor -t <target> pause-pipeline|unpause-pipeline -p <pipeline>
//! conveyor -t <target> pause-job|unpause-job -j <pipeline>/<job>
//! conveyor -t <target> abort-build -j <pipeline>/<job> -b <build>
//! ```

mod apply;
mod commands;
mod logging;

use std::fmt;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use commands::{
    abort_build::AbortBuildArgs,
    checklist::ChecklistArgs,
    get_pipeline::GetPipelineArgs,
    pause::{JobArgs, PipelineArgs},
    set_pipeline::SetPipelineArgs,
    targets::SaveTargetArgs,
};
use conveyor_client::Client;
use conveyor_core::{targets, TargetName};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "conveyor",
    version,
    about = "Manage pipelines, jobs and builds on a CI orchestration server",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Saved target to talk to (see `conveyor targets`).
    #[arg(long, short = 't', global = true)]
    pub target: Option<String>,

    /// Disable coloured diff output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log level (error, warn, info, debug, trace). `RUST_LOG` takes precedence.
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,
}

impl GlobalArgs {
    /// Resolve `--target` into an API client. No network call is made.
    pub fn client(&self) -> Result<Client> {
        let name = self
            .target
            .as_deref()
            .context("no target specified; pass -t/--target <name>")?;
        let props = targets::load_target(&TargetName::from(name))
            .with_context(|| format!("failed to resolve target '{name}'"))?;
        tracing::debug!(target_name = name, api = %props.api, "resolved target");
        Ok(Client::from_target(&props))
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Diff a local config against the server and apply it after confirmation.
    SetPipeline(SetPipelineArgs),

    /// Print the server's current config for a pipeline.
    GetPipeline(GetPipelineArgs),

    /// Print a checkman-style checklist of a pipeline's jobs.
    Checklist(ChecklistArgs),

    /// Pause a pipeline.
    PausePipeline(PipelineArgs),

    /// Unpause a pipeline.
    UnpausePipeline(PipelineArgs),

    /// Pause a job.
    PauseJob(JobArgs),

    /// Unpause a job.
    UnpauseJob(JobArgs),

    /// Abort a running build of a job.
    AbortBuild(AbortBuildArgs),

    /// Save (or replace) a named target in ~/.conveyorrc.
    SaveTarget(SaveTargetArgs),

    /// List saved targets.
    Targets,
}

// ---------------------------------------------------------------------------
// `PIPELINE/JOB` argument
// ---------------------------------------------------------------------------

/// A job addressed as `<pipeline>/<job>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFlag {
    pub pipeline: String,
    pub job: String,
}

impl FromStr for JobFlag {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((pipeline, job)) if !pipeline.is_empty() && !job.is_empty() => Ok(Self {
                pipeline: pipeline.to_string(),
                job: job.to_string(),
            }),
            _ => Err(format!("'{s}' is not of the form PIPELINE/JOB")),
        }
    }
}

impl fmt::Display for JobFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.pipeline, self.job)
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    logging::init(&cli.global.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if err.downcast_ref::<apply::Declined>().is_some() {
                eprintln!("{err}");
            } else {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let global = cli.global;
    match cli.command {
        Commands::SetPipeline(args) => args.run(&global),
        Commands::GetPipeline(args) => args.run(&global),
        Commands::Checklist(args) => args.run(&global),
        Commands::PausePipeline(args) => args.pause(&global),
        Commands::UnpausePipeline(args) => args.unpause(&global),
        Commands::PauseJob(args) => args.pause(&global),
        Commands::UnpauseJob(args) => args.unpause(&global),
        Commands::AbortBuild(args) => args.run(&global),
        Commands::SaveTarget(args) => args.run(&global),
        Commands::Targets => commands::targets::list(),
    }
}
