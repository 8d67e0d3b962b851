//! `snipweave_core` is the engine behind the [snipweave](https://github.com/snipweave/snipweave) snippet-sync tool. It extracts marker-delimited snippet regions from source files and splices their formatted renderings into placeholder regions inside target documents, idempotently; a companion clear operation strips the injected bodies back out.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source files (via a SourceProvider)
//!   → Snippet Extractor (line state machine, seals start/end regions)
//!   → id-keyed snippet map (last-write-wins, duplicate diagnostics)
//! Target files (gitignore-aware walk of the configured roots)
//!   → Target Splicer (placeholder scan, config overlay, formatter)
//!   → optional file-level dedent → written back by the caller
//! ```
//!
//! ## Modules
//!
//! - [`markers`] — The marker grammar: four configurable marker literals, the closing token, and the code-fence delimiter.
//! - [`config`] — Configuration loading from `snipweave.config.yaml`, per-placeholder inline JSON config, and the overlay producing an [`EffectiveConfig`].
//! - [`project`] — External collaborators: the [`SourceProvider`] boundary, target enumeration, and line-sequence IO.
//!
//! ## Key Types
//!
//! - [`Snippet`] — An extracted code region with its id, file-type tag, and provenance.
//! - [`MarkerSet`] — The lexical forms the scanner looks for.
//! - [`RunContext`] — A project root plus loaded config, passed explicitly into every operation.
//! - [`SyncOutcome`] / [`ClearOutcome`] — Computed file updates, written back via [`write_updates`].
//! - [`WeaveDiagnostic`] — A non-fatal condition surfaced as a warning; runs never abort on these.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use snipweave_core::project::{LocalSourceProvider, load_context};
//! use snipweave_core::{sync_project, write_updates};
//!
//! let ctx = load_context(Path::new(".")).unwrap();
//! let outcome = sync_project(&ctx, &LocalSourceProvider).unwrap();
//! println!(
//! 	"{} placeholder(s) spliced across {} file(s)",
//! 	outcome.spliced_count,
//! 	outcome.updated_files.len()
//! );
//! write_updates(&outcome.updated_files).unwrap();
//! ```

pub use config::*;
pub use engine::*;
pub use error::*;
pub use format::*;
pub use markers::*;
pub use project::*;
pub use snippet::*;

pub mod config;
mod engine;
mod error;
mod format;
pub mod markers;
pub mod project;
mod snippet;

#[cfg(test)]
mod __fixtures;
