//! # conveyor-diff
//!
//! Pure comparison of two pipeline configurations and rendering of the
//! result as a colourised, YAML-shaped report.
//!
//! ```rust
//! use conveyor_core::{ConfigDocument, JobConfig};
//! use conveyor_diff::{diff, DiffRenderer, PlainDecorator};
//!
//! let remote = ConfigDocument::default();
//! let local = ConfigDocument {
//!     jobs: vec![JobConfig { name: "build".into(), ..Default::default() }],
//!     ..Default::default()
//! };
//! let records = diff(&remote, &local);
//! let report = DiffRenderer::new(PlainDecorator).render(&records).unwrap();
//! assert!(report.contains("job build has been added"));
//! ```

pub mod diff;
pub mod error;
pub mod render;

pub use diff::{diff, Change, ChangeKind, ChangeRecord, CollectionKind, Entity};
pub use error::RenderError;
pub use render::{AnsiDecorator, Decorator, DiffRenderer, PlainDecorator};
