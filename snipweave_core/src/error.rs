use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum WeaveError {
	#[error(transparent)]
	#[diagnostic(code(snipweave::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(snipweave::config_parse),
		help("check that the config file is valid YAML with `origins` and `targets` sections")
	)]
	ConfigParse(String),

	#[error("no config file found in `{0}`")]
	#[diagnostic(
		code(snipweave::missing_config),
		help("create a `snipweave.config.yaml` listing snippet origins and target roots")
	)]
	MissingConfig(PathBuf),

	#[error("invalid glob pattern in origin: `{0}`")]
	#[diagnostic(code(snipweave::invalid_glob))]
	InvalidGlob(String),

	#[error("invalid selection pattern: {0}")]
	#[diagnostic(
		code(snipweave::invalid_pattern),
		help("`start_pattern` and `end_pattern` must be valid regular expression fragments")
	)]
	InvalidPattern(String),

	#[error("target root does not exist: `{0}`")]
	#[diagnostic(code(snipweave::missing_target_root))]
	MissingTargetRoot(PathBuf),
}

pub type WeaveResult<T> = Result<T, WeaveError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;

/// The kind of non-fatal condition surfaced while extracting or splicing.
/// These never abort a run; they are reported as warnings once the run
/// completes.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DiagnosticKind {
	/// A marker literal was found but no identifier followed it. The line is
	/// treated as plain text.
	MalformedMarker { marker: String },
	/// The JSON blob after a placeholder id failed to parse. The placeholder
	/// falls back to the run's default configuration.
	InvalidInlineConfig { id: String, reason: String },
	/// A placeholder references a snippet id that was never extracted. The
	/// region is left untouched.
	UnresolvedSnippetReference { id: String },
	/// A `start_pattern`/`end_pattern` pair matched nothing in the snippet
	/// body. The placeholder receives an empty body.
	EmptyPatternMatch { id: String },
	/// Two snippets share the same id. The later extraction wins.
	DuplicateSnippetId { id: String },
	/// A snippet region was still open at end of file and was discarded.
	UnclosedSnippet { id: String },
	/// A snippet start marker appeared while another region was still open.
	/// The earlier region is discarded without being sealed.
	AbandonedSnippet { id: String },
	/// A placeholder start marker appeared inside an open placeholder region.
	/// The outer region is implicitly closed and discarded.
	AbandonedPlaceholder { id: String },
}

/// A non-fatal diagnostic tied to a file and 1-indexed line number.
#[derive(Debug, Clone)]
pub struct WeaveDiagnostic {
	/// The file where the condition was observed.
	pub file: PathBuf,
	/// 1-indexed line number of the offending line.
	pub line: usize,
	/// What went wrong.
	pub kind: DiagnosticKind,
}

impl WeaveDiagnostic {
	/// Human-readable message for this diagnostic.
	pub fn message(&self) -> String {
		match &self.kind {
			DiagnosticKind::MalformedMarker { marker } => {
				format!("marker `{marker}` has no identifier and was skipped")
			}
			DiagnosticKind::InvalidInlineConfig { id, reason } => {
				format!("inline config for placeholder `{id}` is not valid JSON ({reason}); using defaults")
			}
			DiagnosticKind::UnresolvedSnippetReference { id } => {
				format!("placeholder `{id}` has no matching snippet; region left untouched")
			}
			DiagnosticKind::EmptyPatternMatch { id } => {
				format!("pattern selection for placeholder `{id}` matched nothing; body is empty")
			}
			DiagnosticKind::DuplicateSnippetId { id } => {
				format!("duplicate snippet id `{id}`; the later extraction wins")
			}
			DiagnosticKind::UnclosedSnippet { id } => {
				format!("snippet `{id}` has no end marker before end of file and was discarded")
			}
			DiagnosticKind::AbandonedSnippet { id } => {
				format!("snippet `{id}` was abandoned by a new start marker before being sealed")
			}
			DiagnosticKind::AbandonedPlaceholder { id } => {
				format!("placeholder `{id}` was implicitly closed by a nested start marker")
			}
		}
	}
}
