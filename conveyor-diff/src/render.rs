//! Human-readable diff report.
//!
//! Colour is injected through [`Decorator`]; the renderer itself only
//! produces strings and never touches a terminal.
//!
//! ```text
//! groups:
//!   group some-group has changed:
//!     name: some-group
//!     jobs:
//!     - job-1
//!     - some-new-job          (green)
//!
//!   group some-other-group has been removed:
//!     name: some-other-group  (red)
//! ```

use colored::Colorize;
use similar::{ChangeTag, TextDiff};

use crate::diff::{Change, ChangeRecord, CollectionKind, Entity};
use crate::error::RenderError;

const INDENT: &str = "  ";

/// Decorates single report lines as additions, removals or context.
pub trait Decorator {
    fn added(&self, line: &str) -> String;
    fn removed(&self, line: &str) -> String;
    fn context(&self, line: &str) -> String;
}

/// Green additions and red removals via `colored`.
///
/// Whether escape codes are emitted follows `colored`'s global control
/// (`NO_COLOR`, `CLICOLOR_FORCE`, tty detection).
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiDecorator;

impl Decorator for AnsiDecorator {
    fn added(&self, line: &str) -> String {
        format!("{INDENT}{}", line.green())
    }

    fn removed(&self, line: &str) -> String {
        format!("{INDENT}{}", line.red())
    }

    fn context(&self, line: &str) -> String {
        format!("{INDENT}{line}")
    }
}

/// `+ ` / `- ` markers for output that is not a terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainDecorator;

impl Decorator for PlainDecorator {
    fn added(&self, line: &str) -> String {
        format!("+ {line}")
    }

    fn removed(&self, line: &str) -> String {
        format!("- {line}")
    }

    fn context(&self, line: &str) -> String {
        format!("{INDENT}{line}")
    }
}

/// Turns change records into report text.
pub struct DiffRenderer<D> {
    decorator: D,
}

impl<D: Decorator> DiffRenderer<D> {
    pub fn new(decorator: D) -> Self {
        Self { decorator }
    }

    /// Render a whole diff run. Records must be grouped by collection, as
    /// produced by [`crate::diff`]. An empty slice renders as an empty string.
    pub fn render(&self, records: &[ChangeRecord]) -> Result<String, RenderError> {
        let mut out = String::new();
        let mut current: Option<CollectionKind> = None;
        for record in records {
            if current != Some(record.collection) {
                if current.is_some() {
                    out.push('\n');
                }
                out.push_str(record.collection.plural());
                out.push_str(":\n");
                current = Some(record.collection);
            }
            for line in self.render_record(record)? {
                out.push_str(INDENT);
                out.push_str(&line);
                out.push('\n');
            }
            out.push('\n');
        }
        Ok(out)
    }

    /// Summary line followed by the decorated entity body.
    pub fn render_record(&self, record: &ChangeRecord) -> Result<Vec<String>, RenderError> {
        let mut lines = vec![format!("{}:", record.summary())];
        match &record.change {
            Change::Added { after } => {
                for line in to_yaml(after)?.lines() {
                    lines.push(self.decorator.added(line));
                }
            }
            Change::Removed { before } => {
                for line in to_yaml(before)?.lines() {
                    lines.push(self.decorator.removed(line));
                }
            }
            Change::Changed { before, after } => {
                let before = to_yaml(before)?;
                let after = to_yaml(after)?;
                let text_diff = TextDiff::from_lines(&before, &after);
                for change in text_diff.iter_all_changes() {
                    let line = change.value().trim_end_matches('\n');
                    lines.push(match change.tag() {
                        ChangeTag::Equal => self.decorator.context(line),
                        ChangeTag::Delete => self.decorator.removed(line),
                        ChangeTag::Insert => self.decorator.added(line),
                    });
                }
            }
        }
        Ok(lines)
    }
}

fn to_yaml(entity: &Entity) -> Result<String, RenderError> {
    Ok(serde_yaml::to_string(entity)?)
}
