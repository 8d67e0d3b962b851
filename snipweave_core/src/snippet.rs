use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use crate::error::DiagnosticKind;
use crate::error::WeaveDiagnostic;
use crate::markers::MarkerSet;

/// Branch used for source links when an origin carries no explicit ref.
pub const DEFAULT_GIT_BRANCH: &str = "main";

/// Host root joined into every remote source link.
pub const SOURCE_HOST_ROOT: &str = "https://github.com";

/// Provenance of a snippet: which origin its source file came from and the
/// origin-relative path of that file. Local origins leave `owner`/`repo`
/// empty — no source link can be built for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetSource {
	pub owner: String,
	pub repo: String,
	pub ref_name: String,
	pub path: PathBuf,
}

impl SnippetSource {
	/// Provenance for a file resolved from a local glob origin.
	pub fn local(path: impl Into<PathBuf>) -> Self {
		Self {
			owner: String::new(),
			repo: String::new(),
			ref_name: String::new(),
			path: path.into(),
		}
	}

	/// Provenance for a file from a hosted repository.
	pub fn remote(
		owner: impl Into<String>,
		repo: impl Into<String>,
		ref_name: Option<&str>,
		path: impl Into<PathBuf>,
	) -> Self {
		Self {
			owner: owner.into(),
			repo: repo.into(),
			ref_name: ref_name.unwrap_or_default().to_string(),
			path: path.into(),
		}
	}

	/// True when enough provenance exists to build a source link.
	pub fn is_remote(&self) -> bool {
		!self.owner.is_empty() && !self.repo.is_empty()
	}
}

/// An extracted code region: the id from its start marker, a file-type tag
/// derived from the source filename, its provenance, and the raw lines
/// captured strictly between the markers. Immutable once sealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
	pub id: String,
	pub extension: String,
	pub source: SnippetSource,
	pub lines: Vec<String>,
	/// 1-indexed line of the start marker in the source file. Used only for
	/// diagnostics.
	pub start_line: usize,
}

impl Snippet {
	fn open(id: String, source: &SnippetSource, start_line: usize) -> Self {
		Self {
			id,
			extension: file_extension(&source.path),
			source: source.clone(),
			lines: Vec::new(),
			start_line,
		}
	}

	/// The `[<relative-path>](<url>)` source-link line, or `None` when the
	/// snippet came from a local origin.
	pub fn source_link(&self) -> Option<String> {
		if !self.source.is_remote() {
			return None;
		}

		let path = self.display_path();
		let ref_name = if self.source.ref_name.is_empty() {
			DEFAULT_GIT_BRANCH
		} else {
			&self.source.ref_name
		};
		let url = format!(
			"{SOURCE_HOST_ROOT}/{}/{}/blob/{ref_name}/{path}",
			self.source.owner, self.source.repo
		);

		Some(format!("[{path}]({url})"))
	}

	fn display_path(&self) -> String {
		self.source.path.to_string_lossy().replace('\\', "/")
	}
}

/// File-type tag for a source path: the text after the last dot of the file
/// name, or empty when there is none.
pub fn file_extension(path: &Path) -> String {
	path.extension()
		.and_then(|e| e.to_str())
		.unwrap_or_default()
		.to_string()
}

/// The result of extracting one source file.
#[derive(Debug, Default)]
pub struct ExtractOutcome {
	pub snippets: Vec<Snippet>,
	pub diagnostics: Vec<WeaveDiagnostic>,
}

/// Scan a source file's lines for snippet regions.
///
/// The per-line order is fixed: an end marker seals the open region, a line
/// inside an open region is captured, and a start marker opens a new region
/// (abandoning any region still open — nesting is not supported). An end
/// marker with no open region is plain text, and a region still open at end
/// of file is discarded with a diagnostic.
pub fn extract_snippets(
	lines: &[String],
	source: &SnippetSource,
	markers: &MarkerSet,
) -> ExtractOutcome {
	let mut outcome = ExtractOutcome::default();
	let mut current: Option<Snippet> = None;

	for (idx, line) in lines.iter().enumerate() {
		let line_number = idx + 1;

		if markers.is_snippet_end(line) {
			if let Some(snippet) = current.take() {
				tracing::debug!(id = %snippet.id, lines = snippet.lines.len(), "sealed snippet");
				outcome.snippets.push(snippet);
			}
		}

		if let Some(snippet) = current.as_mut() {
			snippet.lines.push(line.clone());
		}

		match markers.parse_snippet_start(line) {
			Some(Ok(id)) => {
				if let Some(open) = current.take() {
					outcome.diagnostics.push(WeaveDiagnostic {
						file: source.path.clone(),
						line: open.start_line,
						kind: DiagnosticKind::AbandonedSnippet { id: open.id },
					});
				}
				current = Some(Snippet::open(id, source, line_number));
			}
			Some(Err(kind)) => {
				outcome.diagnostics.push(WeaveDiagnostic {
					file: source.path.clone(),
					line: line_number,
					kind,
				});
			}
			None => {}
		}
	}

	if let Some(open) = current.take() {
		outcome.diagnostics.push(WeaveDiagnostic {
			file: source.path.clone(),
			line: open.start_line,
			kind: DiagnosticKind::UnclosedSnippet { id: open.id },
		});
	}

	outcome
}

/// Merge extracted snippets into one id-keyed mapping. Duplicate ids are
/// last-write-wins, surfaced as diagnostics rather than silently.
pub fn merge_snippets(
	snippets: impl IntoIterator<Item = Snippet>,
) -> (HashMap<String, Snippet>, Vec<WeaveDiagnostic>) {
	let mut map: HashMap<String, Snippet> = HashMap::new();
	let mut diagnostics = Vec::new();

	for snippet in snippets {
		if map.contains_key(&snippet.id) {
			diagnostics.push(WeaveDiagnostic {
				file: snippet.source.path.clone(),
				line: snippet.start_line,
				kind: DiagnosticKind::DuplicateSnippetId {
					id: snippet.id.clone(),
				},
			});
		}
		map.insert(snippet.id.clone(), snippet);
	}

	(map, diagnostics)
}
