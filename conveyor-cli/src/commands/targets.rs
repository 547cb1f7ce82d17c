//! `conveyor save-target` and `conveyor targets`.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use tabled::{settings::Style, Table, Tabled};

use conveyor_core::targets::{self, RcFile, TargetToken};
use conveyor_core::TargetName;

use crate::GlobalArgs;

/// Arguments for `conveyor save-target`. The name comes from `-t`.
#[derive(Args, Debug)]
pub struct SaveTargetArgs {
    /// Base URL of the server API.
    #[arg(long)]
    pub api: String,

    /// Authorization scheme sent ahead of the token.
    #[arg(long, default_value = "Bearer")]
    pub token_type: String,

    /// Token value. Omit for unauthenticated targets.
    #[arg(long)]
    pub token: Option<String>,
}

impl SaveTargetArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let name = global
            .target
            .as_deref()
            .context("no target name given; pass -t/--target <name>")?;
        let token = self.token.map(|value| TargetToken {
            kind: self.token_type,
            value,
        });

        let props = targets::save_target(TargetName::from(name), &self.api, token)
            .with_context(|| format!("failed to save target '{name}'"))?;
        println!("target '{name}' saved ({})", props.api);
        Ok(())
    }
}

#[derive(Tabled)]
struct TargetRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "URL")]
    api: String,
    #[tabled(rename = "Auth")]
    auth: String,
    #[tabled(rename = "Saved")]
    saved: String,
}

/// Print saved targets as a table.
pub fn list() -> Result<()> {
    let rc = targets::load().context("failed to load targets")?;
    match render_table(&rc) {
        Some(table) => println!("{table}"),
        None => println!("No targets saved."),
    }
    Ok(())
}

fn render_table(rc: &RcFile) -> Option<String> {
    if rc.targets.is_empty() {
        return None;
    }
    let rows: Vec<TargetRow> = rc
        .targets
        .iter()
        .map(|(name, props)| TargetRow {
            name: name.to_string(),
            api: props.api.clone(),
            auth: props
                .token
                .as_ref()
                .map_or_else(|| "-".to_string(), |t| t.kind.clone()),
            saved: props
                .saved_at
                .map_or_else(|| "-".to_string(), |at| format!("{} ago", format_age(at))),
        })
        .collect();
    Some(Table::new(rows).with(Style::rounded()).to_string())
}

/// Coarsest whole unit of the time since `timestamp`; future times read `0s`.
fn format_age(timestamp: DateTime<Utc>) -> String {
    match Utc::now().signed_duration_since(timestamp) {
        age if age.num_days() > 0 => format!("{}d", age.num_days()),
        age if age.num_hours() > 0 => format!("{}h", age.num_hours()),
        age if age.num_minutes() > 0 => format!("{}m", age.num_minutes()),
        age => format!("{}s", age.num_seconds().max(0)),
    }
}
