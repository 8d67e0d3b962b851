use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobMatcher;
use ignore::WalkBuilder;

use crate::WeaveError;
use crate::WeaveResult;
use crate::config::Origin;
use crate::config::WeaveConfig;
use crate::error::WeaveDiagnostic;
use crate::markers::MarkerSet;
use crate::snippet::Snippet;
use crate::snippet::SnippetSource;
use crate::snippet::extract_snippets;
use crate::snippet::merge_snippets;

/// Everything one run needs: the project root, the loaded configuration,
/// and the effective marker set. Passed explicitly into every operation —
/// the core reads no ambient globals.
#[derive(Debug, Clone)]
pub struct RunContext {
	pub root: PathBuf,
	pub config: WeaveConfig,
	pub markers: MarkerSet,
}

/// Load the config discovered at `root` and build a [`RunContext`] from it.
pub fn load_context(root: &Path) -> WeaveResult<RunContext> {
	let config = WeaveConfig::load(root)?;
	let markers = config.markers.to_marker_set();

	Ok(RunContext {
		root: root.to_path_buf(),
		config,
		markers,
	})
}

/// One source file delivered by a provider: its provenance and raw lines.
#[derive(Debug)]
pub struct ResolvedSource {
	pub source: SnippetSource,
	pub lines: Vec<String>,
}

/// Delivers source files for an origin. Remote acquisition (archive
/// download, extraction, hosted-API fetch) lives entirely behind this
/// boundary; the engine only ever sees line sequences.
pub trait SourceProvider {
	/// Resolve an origin into its source files.
	fn resolve(&self, origin: &Origin, root: &Path) -> WeaveResult<Vec<ResolvedSource>>;

	/// Remove anything the provider materialized on disk. Called once after
	/// splicing completes.
	fn cleanup(&self, _root: &Path) -> WeaveResult<()> {
		Ok(())
	}
}

/// Resolves `files:` glob origins against the project root. Remote origins
/// resolve to nothing here — a run with only this provider simply leaves
/// their placeholders untouched.
#[derive(Debug, Default)]
pub struct LocalSourceProvider;

impl SourceProvider for LocalSourceProvider {
	fn resolve(&self, origin: &Origin, root: &Path) -> WeaveResult<Vec<ResolvedSource>> {
		let files = match origin {
			Origin::Files(files) => files,
			Origin::Remote(remote) => {
				tracing::warn!(
					owner = %remote.owner,
					repo = %remote.repo,
					"remote origins need a remote-capable source provider; skipping"
				);
				return Ok(Vec::new());
			}
		};

		let matcher = Glob::new(&files.files)
			.map_err(|_| WeaveError::InvalidGlob(files.files.clone()))?
			.compile_matcher();

		let mut sources = Vec::new();
		for path in walk_files(root) {
			let Ok(relative) = path.strip_prefix(root) else {
				continue;
			};
			if !glob_matches(&matcher, relative) {
				continue;
			}

			let lines = read_lines(&path)?;
			let source = match (&files.owner, &files.repo) {
				(Some(owner), Some(repo)) => {
					SnippetSource::remote(owner, repo, files.ref_name.as_deref(), relative)
				}
				_ => SnippetSource::local(relative),
			};
			sources.push(ResolvedSource { source, lines });
		}

		sources.sort_by(|a, b| a.source.path.cmp(&b.source.path));
		Ok(sources)
	}
}

fn glob_matches(matcher: &GlobMatcher, relative: &Path) -> bool {
	// Globs in config use forward slashes regardless of platform.
	let normalized = relative.to_string_lossy().replace('\\', "/");
	matcher.is_match(Path::new(&normalized))
}

/// Resolve every configured origin and merge the extracted snippets into a
/// single id-keyed mapping. Duplicate ids are last-write-wins with a
/// diagnostic; origins that resolve to nothing just contribute nothing.
pub fn collect_snippets(
	ctx: &RunContext,
	provider: &dyn SourceProvider,
) -> WeaveResult<(HashMap<String, Snippet>, Vec<WeaveDiagnostic>)> {
	let mut all = Vec::new();
	let mut diagnostics = Vec::new();

	for origin in &ctx.config.origins {
		for resolved in provider.resolve(origin, &ctx.root)? {
			let outcome = extract_snippets(&resolved.lines, &resolved.source, &ctx.markers);
			tracing::debug!(
				path = %resolved.source.path.display(),
				count = outcome.snippets.len(),
				"extracted source file"
			);
			all.extend(outcome.snippets);
			diagnostics.extend(outcome.diagnostics);
		}
	}

	let (map, duplicates) = merge_snippets(all);
	diagnostics.extend(duplicates);

	Ok((map, diagnostics))
}

/// Enumerate target files under the configured target roots, respecting
/// `.gitignore`. A missing target root is fatal — continuing would silently
/// sync nothing. The result is sorted for deterministic processing order.
pub fn enumerate_targets(ctx: &RunContext) -> WeaveResult<Vec<PathBuf>> {
	let mut targets = Vec::new();

	for target_root in &ctx.config.targets {
		let dir = ctx.root.join(target_root);
		if !dir.is_dir() {
			return Err(WeaveError::MissingTargetRoot(dir));
		}
		targets.extend(walk_files(&dir));
	}

	targets.sort();
	targets.dedup();
	Ok(targets)
}

fn walk_files(root: &Path) -> Vec<PathBuf> {
	WalkBuilder::new(root)
		.build()
		.filter_map(Result::ok)
		.filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
		.map(ignore::DirEntry::into_path)
		.collect()
}

/// Read a file into a line sequence: CRLF-normalized, split on `\n`, with
/// the empty segment from a trailing newline dropped so that
/// [`join_lines`] round-trips.
pub fn read_lines(path: &Path) -> WeaveResult<Vec<String>> {
	let raw = std::fs::read_to_string(path)?;
	let content = normalize_line_endings(&raw);

	let mut lines: Vec<String> = content.split('\n').map(str::to_string).collect();
	if content.ends_with('\n') {
		lines.pop();
	}

	Ok(lines)
}

/// Serialize a line sequence: newline-joined with a single trailing
/// newline.
pub fn join_lines(lines: &[String]) -> String {
	let mut text = lines.join("\n");
	text.push('\n');
	text
}

/// Normalize CRLF line endings to LF.
pub fn normalize_line_endings(content: &str) -> String {
	if content.contains('\r') {
		content.replace("\r\n", "\n").replace('\r', "\n")
	} else {
		content.to_string()
	}
}
