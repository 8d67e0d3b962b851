use std::collections::HashMap;

use crate::config::FeaturesConfig;
use crate::markers::MarkerSet;
use crate::snippet::Snippet;
use crate::snippet::SnippetSource;

pub fn lines(text: &str) -> Vec<String> {
	text.lines().map(str::to_string).collect()
}

pub fn default_markers() -> MarkerSet {
	MarkerSet::default()
}

pub fn default_features() -> FeaturesConfig {
	FeaturesConfig::default()
}

/// A snippet extracted from a hosted repository, with a body of `count`
/// numbered lines (`line 1` .. `line N`).
pub fn remote_snippet(id: &str, count: usize) -> Snippet {
	Snippet {
		id: id.to_string(),
		extension: "go".to_string(),
		source: SnippetSource::remote("acme", "samples", Some("main"), "workflows/hello.go"),
		lines: (1..=count).map(|n| format!("line {n}")).collect(),
		start_line: 1,
	}
}

/// A snippet from a local glob origin. No source link can be built for it.
pub fn local_snippet(id: &str, body: &[&str]) -> Snippet {
	Snippet {
		id: id.to_string(),
		extension: "rs".to_string(),
		source: SnippetSource::local("src/lib.rs"),
		lines: body.iter().map(|line| (*line).to_string()).collect(),
		start_line: 1,
	}
}

pub fn snippet_map(snippets: impl IntoIterator<Item = Snippet>) -> HashMap<String, Snippet> {
	snippets
		.into_iter()
		.map(|snippet| (snippet.id.clone(), snippet))
		.collect()
}
