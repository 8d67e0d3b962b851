use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::WeaveError;
use crate::WeaveResult;
use crate::markers::MarkerSet;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["snipweave.config.yaml", ".snipweave.yaml"];

/// A snippet origin: where source files come from.
///
/// Remote origins name a hosted repository:
///
/// ```yaml
/// origins:
///   - owner: temporalio
///     repo: samples-go
///     ref: main
/// ```
///
/// Local origins glob over the project root:
///
/// ```yaml
/// origins:
///   - files: "src/**/*.rs"
/// ```
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
#[non_exhaustive]
pub enum Origin {
	Remote(RemoteOrigin),
	Files(FilesOrigin),
}

/// A hosted-repository origin. Resolving one requires a remote-capable
/// [`SourceProvider`](crate::project::SourceProvider). Unknown keys are
/// rejected so that a `files:` origin carrying `owner`/`repo` never
/// deserializes as this variant.
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RemoteOrigin {
	pub owner: String,
	pub repo: String,
	#[serde(default, rename = "ref")]
	pub ref_name: Option<String>,
}

/// A local glob origin, resolved against the project root. The optional
/// `owner`/`repo`/`ref` fields attach hosted provenance to locally read
/// files, so their snippets still render source links:
///
/// ```yaml
/// origins:
///   - files: "src/**/*.go"
///     owner: temporalio
///     repo: samples-go
///     ref: main
/// ```
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct FilesOrigin {
	pub files: String,
	#[serde(default)]
	pub owner: Option<String>,
	#[serde(default)]
	pub repo: Option<String>,
	#[serde(default, rename = "ref")]
	pub ref_name: Option<String>,
}

/// Run-wide feature defaults. Every field can be overridden per placeholder
/// through the inline JSON config, except `enable_code_dedenting` and
/// `allowed_target_extensions` which apply at the file level.
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
pub struct FeaturesConfig {
	/// Prepend a `[path](url)` source-link line to each rendered snippet.
	#[serde(default = "default_true")]
	pub enable_source_link: bool,
	/// Wrap each rendered snippet in a fenced code block tagged with the
	/// source file's extension.
	#[serde(default = "default_true")]
	pub enable_code_block: bool,
	/// Strip common leading whitespace from each contiguous block of the
	/// whole target file, once, immediately before it is written back.
	#[serde(default)]
	pub enable_code_dedenting: bool,
	/// Target file extensions to process (e.g. `[".md"]`). Empty means all
	/// files under the target roots are eligible.
	#[serde(default)]
	pub allowed_target_extensions: Vec<String>,
}

impl Default for FeaturesConfig {
	fn default() -> Self {
		Self {
			enable_source_link: true,
			enable_code_block: true,
			enable_code_dedenting: false,
			allowed_target_extensions: Vec::new(),
		}
	}
}

fn default_true() -> bool {
	true
}

/// Overrides for the marker vocabulary. Absent fields keep the defaults in
/// [`crate::markers`]. Historical marker spellings (`@@@START`/`<!--START`)
/// are configured here rather than special-cased anywhere in the engine.
#[derive(Debug, Clone, Default, Deserialize, Eq, PartialEq)]
pub struct MarkerOverrides {
	#[serde(default)]
	pub snippet_start: Option<String>,
	#[serde(default)]
	pub snippet_end: Option<String>,
	#[serde(default)]
	pub placeholder_start: Option<String>,
	#[serde(default)]
	pub placeholder_end: Option<String>,
	#[serde(default)]
	pub placeholder_close: Option<String>,
	#[serde(default)]
	pub fence: Option<String>,
}

impl MarkerOverrides {
	/// Build the effective [`MarkerSet`], overlaying configured literals on
	/// the defaults.
	pub fn to_marker_set(&self) -> MarkerSet {
		let defaults = MarkerSet::default();
		MarkerSet {
			snippet_start: self.snippet_start.clone().unwrap_or(defaults.snippet_start),
			snippet_end: self.snippet_end.clone().unwrap_or(defaults.snippet_end),
			placeholder_start: self
				.placeholder_start
				.clone()
				.unwrap_or(defaults.placeholder_start),
			placeholder_end: self
				.placeholder_end
				.clone()
				.unwrap_or(defaults.placeholder_end),
			placeholder_close: self
				.placeholder_close
				.clone()
				.unwrap_or(defaults.placeholder_close),
			fence: self.fence.clone().unwrap_or(defaults.fence),
		}
	}
}

/// Configuration loaded from a `snipweave.config.yaml` file.
///
/// ```yaml
/// origins:
///   - files: "examples/**/*.go"
/// targets:
///   - docs
/// features:
///   enable_source_link: true
///   enable_code_block: true
///   allowed_target_extensions: [".md"]
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct WeaveConfig {
	/// Where snippets come from.
	#[serde(default)]
	pub origins: Vec<Origin>,
	/// Root directories holding target documents, relative to the project
	/// root. Defaults to the project root itself.
	#[serde(default = "default_targets")]
	pub targets: Vec<PathBuf>,
	/// Run-wide feature defaults.
	#[serde(default)]
	pub features: FeaturesConfig,
	/// Marker literal overrides.
	#[serde(default)]
	pub markers: MarkerOverrides,
}

fn default_targets() -> Vec<PathBuf> {
	vec![PathBuf::from(".")]
}

impl WeaveConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	pub fn load(root: &Path) -> WeaveResult<WeaveConfig> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Err(WeaveError::MissingConfig(root.to_path_buf()));
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: WeaveConfig =
			serde_yaml_ng::from_str(&content).map_err(|e| WeaveError::ConfigParse(e.to_string()))?;

		Ok(config)
	}
}

/// The optional JSON object trailing a placeholder id. Every field is
/// optional; unrecognized keys are ignored rather than rejected.
///
/// ```text
/// <!--SNIPSTART hello-sample {"select": ["1", "5-6"], "enable_source_link": false}-->
/// ```
#[derive(Debug, Clone, Default, Deserialize, Eq, PartialEq)]
pub struct InlineConfig {
	#[serde(default)]
	pub enable_source_link: Option<bool>,
	#[serde(default)]
	pub enable_code_block: Option<bool>,
	/// Line-range annotation appended to the opening fence, e.g. `"2-3"`.
	#[serde(default)]
	pub highlights: Option<String>,
	/// Ordered list of 1-based line numbers or inclusive ranges to keep,
	/// e.g. `["1", "5-6"]`.
	#[serde(default)]
	pub select: Option<Vec<String>>,
	#[serde(default)]
	pub start_pattern: Option<String>,
	#[serde(default)]
	pub end_pattern: Option<String>,
}

impl InlineConfig {
	/// Parse the raw JSON blob from a placeholder start line. The blob must
	/// be a JSON object; anything else is a parse error the caller recovers
	/// from by falling back to defaults.
	pub fn parse(raw: &str) -> Result<InlineConfig, serde_json::Error> {
		serde_json::from_str(raw)
	}
}

/// An inclusive 1-based line range selected from a snippet body. A single
/// line number parses as a one-line range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSelection {
	pub start: usize,
	pub end: usize,
}

impl LineSelection {
	/// Parse `"1"` or `"5-6"`. Returns `None` for anything unparseable or a
	/// zero/inverted range.
	pub fn parse(entry: &str) -> Option<LineSelection> {
		let entry = entry.trim();
		let (start, end) = match entry.split_once('-') {
			Some((start, end)) => (start.trim().parse().ok()?, end.trim().parse().ok()?),
			None => {
				let line = entry.parse().ok()?;
				(line, line)
			}
		};

		if start == 0 || end < start {
			return None;
		}

		Some(LineSelection { start, end })
	}
}

/// A compiled-ready regex pair for body sub-selection. Both halves must be
/// supplied for the pair to activate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternPair {
	pub start: String,
	pub end: String,
}

/// The configuration actually applied to one placeholder's rendering,
/// produced fresh per placeholder by [`overlay`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveConfig {
	pub enable_source_link: bool,
	pub enable_code_block: bool,
	pub highlights: Option<String>,
	pub select: Option<Vec<LineSelection>>,
	pub pattern: Option<PatternPair>,
}

/// Overlay a placeholder's inline config onto the run defaults,
/// field by field. A field present in the inline config overrides the
/// default; absent fields inherit it. `highlights` and `select` are
/// inline-only conveniences with no global default, and the regex pair only
/// activates when the placeholder supplies both halves.
pub fn overlay(defaults: &FeaturesConfig, inline: Option<&InlineConfig>) -> EffectiveConfig {
	let Some(inline) = inline else {
		return EffectiveConfig {
			enable_source_link: defaults.enable_source_link,
			enable_code_block: defaults.enable_code_block,
			..EffectiveConfig::default()
		};
	};

	let select = inline.select.as_ref().map(|entries| {
		entries
			.iter()
			.filter_map(|entry| LineSelection::parse(entry))
			.collect()
	});

	let pattern = match (&inline.start_pattern, &inline.end_pattern) {
		(Some(start), Some(end)) => {
			Some(PatternPair {
				start: start.clone(),
				end: end.clone(),
			})
		}
		_ => None,
	};

	EffectiveConfig {
		enable_source_link: inline
			.enable_source_link
			.unwrap_or(defaults.enable_source_link),
		enable_code_block: inline
			.enable_code_block
			.unwrap_or(defaults.enable_code_block),
		highlights: inline.highlights.clone(),
		select,
		pattern,
	}
}

/// Whether a target file passes the extension allow-list. An empty list
/// allows everything. Entries may be spelled with or without the leading
/// dot (`".md"` / `"md"`).
pub fn extension_allowed(path: &Path, allowed: &[String]) -> bool {
	if allowed.is_empty() {
		return true;
	}

	let Some(extension) = path.extension().and_then(|e| e.to_str()) else {
		return false;
	};

	allowed
		.iter()
		.any(|entry| entry.trim_start_matches('.') == extension)
}
