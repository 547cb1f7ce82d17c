//! `conveyor set-pipeline` — fetch, diff, confirm, update.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use conveyor_client::PipelineApi;
use conveyor_core::{LocalConfig, PipelineName, Variables};
use conveyor_diff::{diff, AnsiDecorator, Decorator, DiffRenderer, PlainDecorator};

use crate::apply::{self, ApplyGate, Decision, Declined};
use crate::GlobalArgs;

/// Arguments for `conveyor set-pipeline`.
#[derive(Args, Debug)]
pub struct SetPipelineArgs {
    /// Pipeline to configure.
    #[arg(long, short = 'p')]
    pub pipeline: String,

    /// Local pipeline config file.
    #[arg(long, short = 'c')]
    pub config: PathBuf,

    /// Variable assignment `name=value`; may be repeated.
    #[arg(long = "var", short = 'v', value_name = "NAME=VALUE")]
    pub vars: Vec<String>,

    /// YAML file of variables; may be repeated, later files win.
    #[arg(long = "load-vars-from", short = 'l', value_name = "FILE")]
    pub vars_files: Vec<PathBuf>,

    /// Apply without prompting.
    #[arg(long)]
    pub non_interactive: bool,
}

impl SetPipelineArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let vars = self.variables()?;
        let local = LocalConfig::load(&self.config, &vars)
            .with_context(|| format!("failed to load config {}", self.config.display()))?;

        let client = global.client()?;
        let pipeline = PipelineName::from(self.pipeline.as_str());
        let stdin = io::stdin();
        let mut terminal = Terminal {
            input: stdin.lock(),
            out: io::stdout(),
            err: io::stderr(),
        };

        if use_colour(global.no_color) {
            set_pipeline(&client, AnsiDecorator, &pipeline, &local, self.non_interactive, &mut terminal)
        } else {
            set_pipeline(&client, PlainDecorator, &pipeline, &local, self.non_interactive, &mut terminal)
        }
    }

    /// Vars files first in the order given, then `--var` assignments.
    fn variables(&self) -> Result<Variables> {
        let mut vars = Variables::new();
        for path in &self.vars_files {
            vars.load_file(path)
                .with_context(|| format!("failed to load vars from {}", path.display()))?;
        }
        for assignment in &self.vars {
            vars.assign(assignment)?;
        }
        Ok(vars)
    }
}

/// Colour only when `colored` would emit escape codes (tty, `NO_COLOR`,
/// `CLICOLOR_FORCE`); plain `+`/`-` markers otherwise.
fn use_colour(no_color: bool) -> bool {
    !no_color && colored::control::SHOULD_COLORIZE.should_colorize()
}

/// Standard streams, swappable in tests.
pub struct Terminal<R, W, E> {
    pub input: R,
    pub out: W,
    pub err: E,
}

/// Drive one reconciliation against `api`.
///
/// At most one fetch and one update are issued. Declining returns
/// [`Declined`] without calling the update.
pub fn set_pipeline<A, D, R, W, E>(
    api: &A,
    decorator: D,
    pipeline: &PipelineName,
    local: &LocalConfig,
    non_interactive: bool,
    terminal: &mut Terminal<R, W, E>,
) -> Result<()>
where
    A: PipelineApi,
    D: Decorator,
    R: BufRead,
    W: Write,
    E: Write,
{
    let gate = ApplyGate::new(non_interactive);

    let remote = api
        .get_config(pipeline)
        .context("failed to fetch pipeline config")?;
    let records = diff(&remote.document, &local.document);
    tracing::info!(%pipeline, changes = records.len(), exists = remote.exists, "diff computed");

    if records.is_empty() {
        writeln!(terminal.out, "no changes to apply")?;
    } else {
        let report = DiffRenderer::new(decorator).render(&records)?;
        write!(terminal.out, "{report}")?;
    }

    let decision = gate
        .rendered(records.len())
        .decide(&mut terminal.input, &mut terminal.out)?;
    if decision == Decision::Declined {
        return Err(Declined.into());
    }

    let outcome = api
        .save_config(pipeline, &local.raw, &remote.version)
        .context("failed to update pipeline config")?;
    apply::report_outcome(
        &outcome,
        &api.pipeline_url(pipeline),
        &mut terminal.out,
        &mut terminal.err,
    )?;
    Ok(())
}
