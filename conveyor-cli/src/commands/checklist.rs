//! `conveyor checklist` — checkman-style job list for a pipeline.

use std::collections::HashSet;
use std::fmt::Write as _;

use anyhow::{Context, Result};
use clap::Args;

use conveyor_client::PipelineApi;
use conveyor_core::{ConfigDocument, PipelineName};

use crate::GlobalArgs;

/// Arguments for `conveyor checklist`.
#[derive(Args, Debug)]
pub struct ChecklistArgs {
    /// Pipeline to list.
    #[arg(long, short = 'p')]
    pub pipeline: String,
}

impl ChecklistArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let client = global.client()?;
        let pipeline = PipelineName::from(self.pipeline.as_str());
        let fetched = client
            .get_config(&pipeline)
            .context("failed to fetch pipeline config")?;
        print!("{}", checklist(&fetched.document, client.api(), &pipeline));
        Ok(())
    }
}

/// One section per group, then `misc` for jobs in no group.
pub fn checklist(document: &ConfigDocument, api_url: &str, pipeline: &PipelineName) -> String {
    let mut out = String::new();
    let mut grouped = HashSet::new();

    for group in &document.groups {
        grouped.extend(group.jobs.iter().map(String::as_str));
        section(&mut out, &group.name, &group.jobs, api_url, pipeline);
    }

    let misc: Vec<String> = document
        .jobs
        .iter()
        .filter(|job| !grouped.contains(job.name.as_str()))
        .map(|job| job.name.clone())
        .collect();
    section(&mut out, "misc", &misc, api_url, pipeline);

    out
}

fn section(out: &mut String, title: &str, jobs: &[String], api_url: &str, pipeline: &PipelineName) {
    if jobs.is_empty() {
        return;
    }
    let _ = writeln!(out, "#- {title}");
    for job in jobs {
        let _ = writeln!(out, "{job}: conveyor.check {api_url} {pipeline} {job}");
    }
    let _ = writeln!(out);
}
