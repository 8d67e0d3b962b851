use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Keep code snippets in your docs synchronized with their source files.",
	long_about = "snipweave extracts marker-delimited snippet regions from source files and \
	              splices them into placeholder regions inside your documentation.\n\nSource \
	              files mark regions with `@@@SNIPSTART <id>` / `@@@SNIPEND` comments; target \
	              documents reference them with `<!--SNIPSTART <id>-->` / `<!--SNIPEND-->` \
	              placeholders.\n\nQuick start:\n  snipweave sync   Splice snippets into every \
	              placeholder\n  snipweave clear  Strip spliced content back out\n\nRunning \
	              with no subcommand is equivalent to `snipweave sync`."
)]
pub struct SnipweaveCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Splice extracted snippets into every placeholder region.
	///
	/// Resolves the origins listed in `snipweave.config.yaml`, extracts every
	/// marker-delimited snippet region, and replaces the body of each matching
	/// placeholder in the target documents. Placeholders whose id has no
	/// extracted snippet are left untouched and reported as warnings.
	///
	/// Re-running sync on already-synced files is a no-op; only files whose
	/// content actually changes are rewritten.
	Sync {
		/// Preview changes without writing files. Prints which files would be
		/// modified.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// Strip spliced content out of every placeholder region.
	///
	/// Removes everything between each placeholder start/end marker pair,
	/// keeping the marker lines themselves, so that target documents can be
	/// committed without generated content. Clearing an already-cleared file
	/// is a no-op.
	Clear {
		/// Preview changes without writing files. Prints which files would be
		/// modified.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
}
