use std::path::PathBuf;

use catalog::RelicColor;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "relicscan", version, about = "Scan, collect and export game relics from OCR captures")]
pub struct Cli {
	/// Collection file to operate on (defaults to the platform data dir).
	#[arg(long, global = true)]
	pub store: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
	/// Run one scan cycle over captured OCR text and optionally save the relic.
	Scan {
		/// File with the OCR collaborator's recognized text.
		#[arg(long)]
		text: PathBuf,

		/// Full camera frame (PNG) for pixel color fallback.
		#[arg(long)]
		frame: Option<PathBuf>,

		/// Manual color override (red, green, blue, yellow).
		#[arg(long)]
		color: Option<RelicColor>,

		/// Manual deep night override.
		#[arg(long)]
		dn: Option<bool>,

		/// Matcher threshold override for this scan.
		#[arg(long)]
		threshold: Option<f32>,

		/// Persist the scanned relic into the collection.
		#[arg(long)]
		save: bool,
	},

	/// List the collection.
	List,

	/// Collection totals by color and deep night status.
	Stats,

	/// Export the collection as a JSON array.
	Export {
		/// Write to a file instead of stdout.
		#[arg(long)]
		out: Option<PathBuf>,
	},

	/// Merge relics from an exported JSON file (duplicates skipped by id).
	Import { file: PathBuf },

	/// Delete one relic by id.
	Delete { id: String },

	/// Delete every relic in the collection.
	Clear {
		/// Required; there is no undo.
		#[arg(long)]
		yes: bool,
	},
}
