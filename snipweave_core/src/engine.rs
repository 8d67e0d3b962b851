use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use crate::WeaveResult;
use crate::config::FeaturesConfig;
use crate::config::InlineConfig;
use crate::config::extension_allowed;
use crate::config::overlay;
use crate::error::DiagnosticKind;
use crate::error::WeaveDiagnostic;
use crate::format::render_snippet;
use crate::markers::MarkerSet;
use crate::project::RunContext;
use crate::project::SourceProvider;
use crate::project::collect_snippets;
use crate::project::enumerate_targets;
use crate::project::join_lines;
use crate::project::read_lines;
use crate::snippet::Snippet;

/// The result of splicing one target file.
#[derive(Debug)]
pub struct SpliceOutcome {
	/// The new line sequence. The input is never mutated; every splice
	/// produces a fresh sequence (head + replacement + tail).
	pub lines: Vec<String>,
	/// Number of placeholder regions that were resolved and replaced.
	pub spliced: usize,
	/// Non-fatal conditions hit during the pass.
	pub diagnostics: Vec<WeaveDiagnostic>,
}

/// A resolved placeholder waiting for its end marker. The original body is
/// buffered so a region that never closes can be restored untouched.
struct PendingSplice {
	id: String,
	start_line: usize,
	rendered: Vec<String>,
	original_body: Vec<String>,
}

/// Scan a target file's lines for placeholder regions and replace each
/// resolvable region's body with the matching snippet's rendering.
///
/// The markers themselves are preserved; only the body between them is
/// replaced, which makes re-running the splice idempotent. A placeholder
/// whose id has no extracted snippet is left byte-for-byte untouched so
/// partial runs against a subset of origins stay safe.
pub fn splice_target(
	lines: &[String],
	snippets: &HashMap<String, Snippet>,
	defaults: &FeaturesConfig,
	markers: &MarkerSet,
	file: &Path,
) -> WeaveResult<SpliceOutcome> {
	let mut out = Vec::with_capacity(lines.len());
	let mut diagnostics = Vec::new();
	let mut spliced = 0;
	let mut pending: Option<PendingSplice> = None;

	for (idx, line) in lines.iter().enumerate() {
		let line_number = idx + 1;

		if let Some(open) = pending.take() {
			if markers.is_placeholder_end(line) {
				out.extend(open.rendered);
				out.push(line.clone());
				spliced += 1;
				continue;
			}
			pending = Some(open);
		}

		match markers.parse_placeholder_start(line) {
			Some(Ok(start)) => {
				if let Some(open) = pending.take() {
					diagnostics.push(WeaveDiagnostic {
						file: file.to_path_buf(),
						line: open.start_line,
						kind: DiagnosticKind::AbandonedPlaceholder { id: open.id },
					});
					out.extend(open.original_body);
				}

				let inline = match parse_inline(&start.id, start.inline_json.as_deref()) {
					Ok(inline) => inline,
					Err(kind) => {
						diagnostics.push(WeaveDiagnostic {
							file: file.to_path_buf(),
							line: line_number,
							kind,
						});
						None
					}
				};

				out.push(line.clone());

				match snippets.get(&start.id) {
					Some(snippet) => {
						let effective = overlay(defaults, inline.as_ref());
						let rendered = render_snippet(snippet, &effective, markers)?;
						diagnostics.extend(rendered.diagnostics.into_iter().map(|kind| {
							WeaveDiagnostic {
								file: file.to_path_buf(),
								line: line_number,
								kind,
							}
						}));
						pending = Some(PendingSplice {
							id: start.id,
							start_line: line_number,
							rendered: rendered.lines,
							original_body: Vec::new(),
						});
					}
					None => {
						diagnostics.push(WeaveDiagnostic {
							file: file.to_path_buf(),
							line: line_number,
							kind: DiagnosticKind::UnresolvedSnippetReference { id: start.id },
						});
					}
				}
			}
			Some(Err(kind)) => {
				diagnostics.push(WeaveDiagnostic {
					file: file.to_path_buf(),
					line: line_number,
					kind,
				});
				out.push(line.clone());
			}
			None => {
				match pending.as_mut() {
					Some(open) => open.original_body.push(line.clone()),
					None => out.push(line.clone()),
				}
			}
		}
	}

	// A region still open at end of file is restored untouched.
	if let Some(open) = pending.take() {
		diagnostics.push(WeaveDiagnostic {
			file: file.to_path_buf(),
			line: open.start_line,
			kind: DiagnosticKind::AbandonedPlaceholder { id: open.id },
		});
		out.extend(open.original_body);
	}

	Ok(SpliceOutcome {
		lines: out,
		spliced,
		diagnostics,
	})
}

/// Parse the inline JSON from a placeholder start line. A parse failure
/// disables inline overrides for that placeholder only.
fn parse_inline(id: &str, raw: Option<&str>) -> Result<Option<InlineConfig>, DiagnosticKind> {
	let Some(raw) = raw else {
		return Ok(None);
	};

	match InlineConfig::parse(raw) {
		Ok(config) => Ok(Some(config)),
		Err(e) => {
			Err(DiagnosticKind::InvalidInlineConfig {
				id: id.to_string(),
				reason: e.to_string(),
			})
		}
	}
}

/// Remove the body between every placeholder start/end pair, keeping the
/// marker lines themselves. Clearing an already-cleared file is a no-op.
pub fn clear_target(lines: &[String], markers: &MarkerSet) -> Vec<String> {
	let mut omit = false;
	let mut out = Vec::with_capacity(lines.len());

	for line in lines {
		if markers.is_placeholder_end(line) {
			omit = false;
		}
		if !omit {
			out.push(line.clone());
		}
		if markers.has_placeholder_start(line) {
			omit = true;
		}
	}

	out
}

/// Strip common leading whitespace per contiguous block of non-blank lines.
/// Applied to a whole target file at most once, immediately before it is
/// serialized.
pub fn dedent_blocks(lines: &[String]) -> Vec<String> {
	let mut out = Vec::with_capacity(lines.len());
	let mut block: Vec<&String> = Vec::new();

	for line in lines {
		if line.trim().is_empty() {
			flush_block(&mut block, &mut out);
			out.push(line.clone());
		} else {
			block.push(line);
		}
	}
	flush_block(&mut block, &mut out);

	out
}

fn flush_block(block: &mut Vec<&String>, out: &mut Vec<String>) {
	if block.is_empty() {
		return;
	}

	let prefix = common_indent(block);
	out.extend(block.drain(..).map(|line| line[prefix..].to_string()));
}

/// Length in bytes of the leading whitespace shared by every line of a
/// block, always a char boundary. Mixed indent styles only dedent as far
/// as the prefixes agree.
fn common_indent(block: &[&String]) -> usize {
	let mut prefix: Option<&str> = None;

	for line in block {
		let indent_len = line.len() - line.trim_start().len();
		let indent = &line[..indent_len];
		prefix = Some(match prefix {
			None => indent,
			Some(current) => {
				let shared = current
					.chars()
					.zip(indent.chars())
					.take_while(|(a, b)| a == b)
					.map(|(c, _)| c.len_utf8())
					.sum();
				&current[..shared]
			}
		});
	}

	prefix.map_or(0, str::len)
}

/// The computed result of a `sync` run: updated file contents keyed by
/// path, ready to be written back by [`write_updates`].
#[derive(Debug)]
pub struct SyncOutcome {
	/// Files whose content changed and their new full text.
	pub updated_files: HashMap<PathBuf, String>,
	/// Number of target files examined.
	pub target_count: usize,
	/// Total placeholder regions replaced across all targets.
	pub spliced_count: usize,
	/// Non-fatal conditions from extraction and splicing.
	pub diagnostics: Vec<WeaveDiagnostic>,
}

/// Run the full sync pipeline: resolve origins, extract snippets, splice
/// every eligible target, and compute the files to rewrite. Nothing is
/// written to disk here.
pub fn sync_project(ctx: &RunContext, provider: &dyn SourceProvider) -> WeaveResult<SyncOutcome> {
	let (snippets, mut diagnostics) = collect_snippets(ctx, provider)?;
	tracing::debug!(snippets = snippets.len(), "extraction complete");

	let targets = enumerate_targets(ctx)?;
	let mut updated_files = HashMap::new();
	let mut spliced_count = 0;

	for target in &targets {
		if !extension_allowed(target, &ctx.config.features.allowed_target_extensions) {
			continue;
		}

		let lines = read_lines(target)?;
		let outcome = splice_target(&lines, &snippets, &ctx.config.features, &ctx.markers, target)?;
		diagnostics.extend(outcome.diagnostics);
		spliced_count += outcome.spliced;

		let new_lines = if ctx.config.features.enable_code_dedenting {
			dedent_blocks(&outcome.lines)
		} else {
			outcome.lines
		};

		let new_text = join_lines(&new_lines);
		if new_text != join_lines(&lines) {
			updated_files.insert(target.clone(), new_text);
		}
	}

	provider.cleanup(&ctx.root)?;

	Ok(SyncOutcome {
		updated_files,
		target_count: targets.len(),
		spliced_count,
		diagnostics,
	})
}

/// The computed result of a `clear` run.
#[derive(Debug)]
pub struct ClearOutcome {
	/// Files whose content changed and their new full text.
	pub updated_files: HashMap<PathBuf, String>,
	/// Number of target files examined.
	pub target_count: usize,
}

/// Strip every placeholder body across the configured targets. Nothing is
/// written to disk here.
pub fn clear_project(ctx: &RunContext) -> WeaveResult<ClearOutcome> {
	let targets = enumerate_targets(ctx)?;
	let mut updated_files = HashMap::new();

	for target in &targets {
		if !extension_allowed(target, &ctx.config.features.allowed_target_extensions) {
			continue;
		}

		let lines = read_lines(target)?;
		let cleared = clear_target(&lines, &ctx.markers);
		if cleared != lines {
			updated_files.insert(target.clone(), join_lines(&cleared));
		}
	}

	Ok(ClearOutcome {
		updated_files,
		target_count: targets.len(),
	})
}

/// Write the updated contents back to disk.
pub fn write_updates(updated_files: &HashMap<PathBuf, String>) -> WeaveResult<()> {
	for (path, content) in updated_files {
		tracing::debug!(path = %path.display(), "writing target file");
		std::fs::write(path, content)?;
	}
	Ok(())
}
