use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use snipweave_cli::Commands;
use snipweave_cli::SnipweaveCli;
use snipweave_core::WeaveDiagnostic;
use snipweave_core::clear_project;
use snipweave_core::project::LocalSourceProvider;
use snipweave_core::project::load_context;
use snipweave_core::sync_project;
use snipweave_core::write_updates;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = SnipweaveCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	if args.verbose {
		tracing_subscriber::fmt()
			.with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
			.with_writer(std::io::stderr)
			.init();
	}

	let result = match args.command {
		Some(Commands::Sync { dry_run }) => run_sync(&args, dry_run),
		Some(Commands::Clear { dry_run }) => run_clear(&args, dry_run),
		// Bare `snipweave` is a sync.
		None => run_sync(&args, false),
	};

	if let Err(e) = result {
		// Render through miette for rich diagnostics with help text and error
		// codes where possible.
		match e.downcast::<snipweave_core::WeaveError>() {
			Ok(weave_err) => {
				let report: miette::Report = (*weave_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

fn resolve_root(args: &SnipweaveCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn run_sync(args: &SnipweaveCli, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let ctx = load_context(&root)?;
	let outcome = sync_project(&ctx, &LocalSourceProvider)?;

	print_diagnostics(&outcome.diagnostics, &root);

	if dry_run {
		if outcome.updated_files.is_empty() {
			println!("All target files are already up to date.");
		} else {
			println!("Dry run: would write {} file(s):", outcome.updated_files.len());
			print_file_list(&outcome.updated_files, &root);
		}
		return Ok(());
	}

	write_updates(&outcome.updated_files)?;

	if outcome.updated_files.is_empty() {
		println!("All target files are already up to date.");
	} else {
		println!(
			"{} placeholder(s) spliced, {} file(s) written.",
			outcome.spliced_count,
			outcome.updated_files.len()
		);
		if args.verbose {
			print_file_list(&outcome.updated_files, &root);
		}
	}

	Ok(())
}

fn run_clear(args: &SnipweaveCli, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let ctx = load_context(&root)?;
	let outcome = clear_project(&ctx)?;

	if dry_run {
		if outcome.updated_files.is_empty() {
			println!("No placeholder content to clear.");
		} else {
			println!("Dry run: would clear {} file(s):", outcome.updated_files.len());
			print_file_list(&outcome.updated_files, &root);
		}
		return Ok(());
	}

	write_updates(&outcome.updated_files)?;

	if outcome.updated_files.is_empty() {
		println!("No placeholder content to clear.");
	} else {
		println!("Cleared {} file(s).", outcome.updated_files.len());
		if args.verbose {
			print_file_list(&outcome.updated_files, &root);
		}
	}

	Ok(())
}

/// Print non-fatal run diagnostics as warnings. They never affect the exit
/// code.
fn print_diagnostics(diagnostics: &[WeaveDiagnostic], root: &Path) {
	let mut sorted: Vec<_> = diagnostics.iter().collect();
	sorted.sort_by(|a, b| {
		make_relative(&a.file, root)
			.cmp(&make_relative(&b.file, root))
			.then_with(|| a.line.cmp(&b.line))
	});

	for diag in sorted {
		let rel = make_relative(&diag.file, root);
		eprintln!(
			"{} {rel}:{}: {}",
			colored!("warning:", yellow),
			diag.line,
			diag.message()
		);
	}
}

fn print_file_list(updated_files: &HashMap<PathBuf, String>, root: &Path) {
	let mut paths: Vec<_> = updated_files.keys().collect();
	paths.sort();
	for path in paths {
		println!("  {}", make_relative(path, root));
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
