//! Confirmation gate in front of a config update, and reporting of the
//! update outcome.
//!
//! The gate moves `Idle → Rendered → {Confirmed, Declined}`: it can only be
//! asked for a decision once the report has been rendered.

use std::fmt;
use std::io::{self, BufRead, Write};

use conveyor_client::{SaveOutcome, SaveStatus};
use conveyor_core::Warning;

pub const PROMPT: &str = "apply configuration? [yN]: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirmed,
    Declined,
}

/// Returned when the operator declines the prompt. Not a failure of the
/// tool, but the process still exits non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declined;

impl fmt::Display for Declined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bailing out")
    }
}

impl std::error::Error for Declined {}

/// Gate before the diff has been shown.
#[derive(Debug, Clone, Copy)]
pub struct ApplyGate {
    non_interactive: bool,
}

/// Gate after the diff has been shown; the only state that can decide.
#[derive(Debug, Clone, Copy)]
pub struct RenderedGate {
    non_interactive: bool,
    change_count: usize,
}

impl ApplyGate {
    pub fn new(non_interactive: bool) -> Self {
        Self { non_interactive }
    }

    pub fn rendered(self, change_count: usize) -> RenderedGate {
        RenderedGate {
            non_interactive: self.non_interactive,
            change_count,
        }
    }
}

impl RenderedGate {
    /// Confirm without asking when there is nothing to change or the run is
    /// non-interactive; otherwise prompt on `out` and read one line.
    ///
    /// Only `y` / `yes` (any case) confirm. EOF declines.
    pub fn decide<R: BufRead, W: Write>(self, input: &mut R, out: &mut W) -> io::Result<Decision> {
        if self.change_count == 0 || self.non_interactive {
            return Ok(Decision::Confirmed);
        }

        write!(out, "{PROMPT}")?;
        out.flush()?;

        let mut answer = String::new();
        input.read_line(&mut answer)?;
        let decision = match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => Decision::Confirmed,
            _ => Decision::Declined,
        };
        tracing::debug!(?decision, "confirmation answered");
        Ok(decision)
    }
}

/// Print server warnings to `err`, then the success message to `out`.
pub fn report_outcome<W: Write, E: Write>(
    outcome: &SaveOutcome,
    pipeline_url: &str,
    out: &mut W,
    err: &mut E,
) -> io::Result<()> {
    write_warnings(&outcome.warnings, err)?;

    match outcome.status {
        SaveStatus::Created => {
            writeln!(out, "pipeline created!")?;
            writeln!(out, "you can view your pipeline here: {pipeline_url}")?;
            if outcome.paused {
                writeln!(out)?;
                writeln!(out, "the pipeline is currently paused. to unpause, either:")?;
                writeln!(out, "  - run the unpause-pipeline command")?;
                writeln!(out, "  - click play next to the pipeline in the web ui")?;
            }
        }
        SaveStatus::Updated => writeln!(out, "configuration updated")?,
    }
    out.flush()
}

/// Group warnings by type, in first-seen order.
fn write_warnings<E: Write>(warnings: &[Warning], err: &mut E) -> io::Result<()> {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for warning in warnings {
        match groups.iter_mut().find(|(kind, _)| *kind == warning.kind) {
            Some((_, messages)) => messages.push(&warning.message),
            None => groups.push((&warning.kind, vec![&warning.message])),
        }
    }

    for (kind, messages) in groups {
        writeln!(err, "{} WARNING:", kind.to_uppercase())?;
        for message in messages {
            writeln!(err, "  - {message}")?;
        }
        writeln!(err)?;
    }
    err.flush()
}
