use crate::error::DiagnosticKind;

/// Default marker literal opening a snippet region in a source file.
pub const DEFAULT_SNIPPET_START: &str = "@@@SNIPSTART";
/// Default marker literal closing a snippet region in a source file.
pub const DEFAULT_SNIPPET_END: &str = "@@@SNIPEND";
/// Default marker literal opening a placeholder region in a target file.
pub const DEFAULT_PLACEHOLDER_START: &str = "<!--SNIPSTART";
/// Default marker literal closing a placeholder region in a target file.
pub const DEFAULT_PLACEHOLDER_END: &str = "<!--SNIPEND";
/// Default token terminating the inline syntax of a placeholder start line.
pub const DEFAULT_PLACEHOLDER_CLOSE: &str = "-->";
/// Default code-fence delimiter used by the formatter.
pub const DEFAULT_FENCE: &str = "```";

/// The lexical forms of the four marker kinds plus the closing token and the
/// code-fence delimiter.
///
/// All matching is substring containment on a line rather than full-line
/// equality, so markers can live inside whatever comment syntax the host
/// language uses (`// @@@SNIPSTART id`, `<!--SNIPSTART id-->`, ...). The
/// literals are configuration, not behavior: historical variants of the
/// marker vocabulary are swapped in through the `[markers]` config section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSet {
	pub snippet_start: String,
	pub snippet_end: String,
	pub placeholder_start: String,
	pub placeholder_end: String,
	pub placeholder_close: String,
	pub fence: String,
}

impl Default for MarkerSet {
	fn default() -> Self {
		Self {
			snippet_start: DEFAULT_SNIPPET_START.to_string(),
			snippet_end: DEFAULT_SNIPPET_END.to_string(),
			placeholder_start: DEFAULT_PLACEHOLDER_START.to_string(),
			placeholder_end: DEFAULT_PLACEHOLDER_END.to_string(),
			placeholder_close: DEFAULT_PLACEHOLDER_CLOSE.to_string(),
			fence: DEFAULT_FENCE.to_string(),
		}
	}
}

/// The parsed pieces of a placeholder start line: the referenced snippet id
/// and, when present, the raw inline JSON blob between the id and the
/// closing token. The JSON is deliberately kept unparsed here — a malformed
/// blob must degrade to "no inline config" rather than fail the line, and
/// that recovery belongs to the config overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderStart {
	pub id: String,
	pub inline_json: Option<String>,
}

impl MarkerSet {
	/// Parse a snippet start marker out of a line. Returns `None` when the
	/// line does not contain the marker at all, and a diagnostic when the
	/// marker is present but no identifier follows it.
	pub fn parse_snippet_start(&self, line: &str) -> Option<Result<String, DiagnosticKind>> {
		let idx = line.find(&self.snippet_start)?;
		let rest = &line[idx + self.snippet_start.len()..];

		match rest.split_whitespace().next() {
			Some(id) => Some(Ok(id.to_string())),
			None => {
				Some(Err(DiagnosticKind::MalformedMarker {
					marker: self.snippet_start.clone(),
				}))
			}
		}
	}

	/// True when the line contains the snippet end marker.
	pub fn is_snippet_end(&self, line: &str) -> bool {
		line.contains(&self.snippet_end)
	}

	/// Parse a placeholder start marker out of a line: the id plus an
	/// optional remainder-of-line JSON blob, terminated by the closing token
	/// when one is present.
	pub fn parse_placeholder_start(
		&self,
		line: &str,
	) -> Option<Result<PlaceholderStart, DiagnosticKind>> {
		let idx = line.find(&self.placeholder_start)?;
		let mut rest = &line[idx + self.placeholder_start.len()..];

		if let Some(close_idx) = rest.find(&self.placeholder_close) {
			rest = &rest[..close_idx];
		}

		let rest = rest.trim();
		let Some(id) = rest.split_whitespace().next() else {
			return Some(Err(DiagnosticKind::MalformedMarker {
				marker: self.placeholder_start.clone(),
			}));
		};

		let remainder = rest[id.len()..].trim();
		let inline_json = if remainder.is_empty() {
			None
		} else {
			Some(remainder.to_string())
		};

		Some(Ok(PlaceholderStart {
			id: id.to_string(),
			inline_json,
		}))
	}

	/// True when the line contains the placeholder start marker, without
	/// attempting to parse an id. The clear engine works on raw containment
	/// so that even malformed placeholder regions are stripped consistently.
	pub fn has_placeholder_start(&self, line: &str) -> bool {
		line.contains(&self.placeholder_start)
	}

	/// True when the line contains the placeholder end marker.
	pub fn is_placeholder_end(&self, line: &str) -> bool {
		line.contains(&self.placeholder_end)
	}

	/// The opening fence line for a code block tagged with `extension`, with
	/// an optional highlight annotation.
	pub fn open_fence(&self, extension: &str, highlights: Option<&str>) -> String {
		match highlights {
			Some(ranges) => format!("{}{extension} {{{ranges}}}", self.fence),
			None => format!("{}{extension}", self.fence),
		}
	}

	/// The closing fence line.
	pub fn close_fence(&self) -> String {
		self.fence.clone()
	}
}
