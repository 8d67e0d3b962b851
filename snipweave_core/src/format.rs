use regex::Regex;

use crate::WeaveError;
use crate::WeaveResult;
use crate::config::EffectiveConfig;
use crate::config::LineSelection;
use crate::config::PatternPair;
use crate::error::DiagnosticKind;
use crate::markers::MarkerSet;
use crate::snippet::Snippet;

/// The rendered body for one placeholder, plus any non-fatal conditions hit
/// while selecting content.
#[derive(Debug, Default)]
pub struct RenderOutcome {
	pub lines: Vec<String>,
	pub diagnostics: Vec<DiagnosticKind>,
}

/// Render a snippet into the ordered list of lines that replace a
/// placeholder body.
///
/// Construction order: optional source-link line, optional opening fence
/// (tagged with the snippet extension and highlight annotation), the
/// selected body, optional closing fence. Body selection is mutually
/// exclusive in priority order: explicit line selection, then regex
/// sub-selection, then the full captured body.
pub fn render_snippet(
	snippet: &Snippet,
	config: &EffectiveConfig,
	markers: &MarkerSet,
) -> WeaveResult<RenderOutcome> {
	let mut outcome = RenderOutcome::default();

	if config.enable_source_link {
		if let Some(link) = snippet.source_link() {
			outcome.lines.push(link);
		}
	}

	if config.enable_code_block {
		outcome
			.lines
			.push(markers.open_fence(&snippet.extension, config.highlights.as_deref()));
	}

	if let Some(selections) = &config.select {
		select_lines(snippet, selections, &mut outcome.lines);
	} else if let Some(pattern) = &config.pattern {
		match_pattern(snippet, pattern, &mut outcome)?;
	} else {
		outcome.lines.extend(snippet.lines.iter().cloned());
	}

	if config.enable_code_block {
		outcome.lines.push(markers.close_fence());
	}

	Ok(outcome)
}

/// Append the sliced sub-sequences for an explicit line selection. Entries
/// are 1-based inclusive ranges; an ellipsis comment line precedes any
/// selection that does not begin at the snippet's first line, so that
/// discontinuous selections read as elided code.
fn select_lines(snippet: &Snippet, selections: &[LineSelection], out: &mut Vec<String>) {
	for selection in selections {
		let start = selection.start - 1;
		if start >= snippet.lines.len() {
			continue;
		}
		let end = selection.end.min(snippet.lines.len());

		if start != 0 {
			out.push(ellipsis_comment(&snippet.extension).to_string());
		}
		out.extend(snippet.lines[start..end].iter().cloned());
	}
}

/// Apply a `start_pattern`/`end_pattern` regex across line boundaries and
/// keep the first match. No match yields an empty body with a diagnostic,
/// never an error; an uncompilable pattern is a config mistake and aborts.
fn match_pattern(
	snippet: &Snippet,
	pattern: &PatternPair,
	outcome: &mut RenderOutcome,
) -> WeaveResult<()> {
	let full = format!("(?s)({}.*{})", pattern.start, pattern.end);
	let regex = Regex::new(&full).map_err(|e| WeaveError::InvalidPattern(e.to_string()))?;

	let body = snippet.lines.join("\n");
	match regex.find(&body) {
		Some(found) => {
			outcome
				.lines
				.extend(found.as_str().split('\n').map(str::to_string));
		}
		None => {
			outcome.diagnostics.push(DiagnosticKind::EmptyPatternMatch {
				id: snippet.id.clone(),
			});
		}
	}

	Ok(())
}

/// Comment syntax used for ellipsis lines between discontinuous selections,
/// keyed by the snippet's file extension.
pub fn ellipsis_comment(extension: &str) -> &'static str {
	match extension {
		"py" | "rb" | "sh" | "bash" | "zsh" | "yaml" | "yml" | "toml" | "tf" | "r" | "ex" | "exs" => {
			"# ..."
		}
		"html" | "htm" | "md" | "markdown" | "xml" | "svg" | "vue" => "<!-- ... -->",
		"sql" | "lua" | "hs" | "elm" => "-- ...",
		"lisp" | "clj" | "cljs" | "el" | "scm" => ";; ...",
		"erl" => "% ...",
		_ => "// ...",
	}
}
