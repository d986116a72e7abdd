//! Persisted relic collection.
//!
//! A flat JSON array on disk, read fully on open and rewritten atomically on
//! save. The export format is the same array, so export/import round-trips
//! byte-compatible records.

use std::{
	fs::File,
	io::{BufReader, BufWriter, Write},
	path::{Path, PathBuf},
	sync::atomic::{AtomicU32, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use catalog::RelicColor;

/// One saved relic.
///
/// Field names on the wire match the established export format (`itemId`,
/// `dn`), so collections can migrate between installs.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Relic {
	pub id: String,
	#[serde(rename = "itemId")]
	pub item_id: i32,
	pub color: RelicColor,
	pub dn: bool,
	/// Effect ids in detection order.
	pub effects: Vec<u32>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
}

/// Generate a collection-unique relic id: `relic-{millis}-{suffix}`.
///
/// The suffix mixes the sub-millisecond clock with a per-process counter, so
/// ids stay unique even when several relics are saved in the same millisecond.
pub fn generate_id() -> String {
	static COUNTER: AtomicU32 = AtomicU32::new(0);

	let now = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.unwrap_or_default();
	let seq = COUNTER.fetch_add(1, Ordering::Relaxed);

	// Disjoint bit ranges: nanos (0..32), counter (32..52), pid (52..).
	// The counter alone makes ids unique within a process; the clock and pid
	// keep separate runs apart.
	let entropy = (now.subsec_nanos() as u64)
		| (((seq as u64) & 0xF_FFFF) << 32)
		| ((std::process::id() as u64) << 52);

	format!("relic-{}-{}", now.as_millis(), base36(entropy))
}

fn base36(mut value: u64) -> String {
	const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
	if value == 0 {
		return "0".to_string();
	}
	let mut out = Vec::new();
	while value > 0 {
		out.push(DIGITS[(value % 36) as usize]);
		value /= 36;
	}
	out.reverse();
	String::from_utf8(out).expect("base36 digits are ascii")
}

/// Collection stats for the export summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
	pub total: usize,
	pub deep_night: usize,
	pub normal: usize,
	/// Counts in [`RelicColor::ALL`] order.
	pub by_color: [usize; 4],
}

pub struct Store {
	path: PathBuf,
	relics: Vec<Relic>,
}

impl Store {
	pub fn default_path() -> Result<PathBuf> {
		let base = dirs::data_dir().context("data_dir() unavailable")?;
		Ok(base.join("relicscan").join("collection.json"))
	}

	/// Open a collection file; a missing file is an empty collection.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
		let path = path.into();
		let relics = if path.exists() {
			let file = File::open(&path).with_context(|| format!("open collection {}", path.display()))?;
			let reader = BufReader::new(file);
			serde_json::from_reader(reader).with_context(|| format!("parse collection {}", path.display()))?
		} else {
			Vec::new()
		};

		Ok(Self { path, relics })
	}

	pub fn save(&self) -> Result<()> {
		if let Some(parent) = self.path.parent() {
			std::fs::create_dir_all(parent)
				.with_context(|| format!("create collection dir {}", parent.display()))?;
		}

		let tmp = self.path.with_extension("json.tmp");
		let file = File::create(&tmp).with_context(|| format!("write collection temp {}", tmp.display()))?;
		let mut writer = BufWriter::new(file);
		serde_json::to_writer(&mut writer, &self.relics).context("serialize collection")?;
		writer.flush().context("flush collection")?;

		// Replace existing file (Windows-friendly).
		if std::fs::rename(&tmp, &self.path).is_err() {
			let _ = std::fs::remove_file(&self.path);
			std::fs::rename(&tmp, &self.path)
				.with_context(|| format!("persist collection {}", self.path.display()))?;
		}
		Ok(())
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn relics(&self) -> &[Relic] {
		&self.relics
	}

	pub fn len(&self) -> usize {
		self.relics.len()
	}

	pub fn is_empty(&self) -> bool {
		self.relics.is_empty()
	}

	pub fn append(&mut self, relic: Relic) {
		self.relics.push(relic);
	}

	/// Remove a relic by id. Returns whether anything was removed.
	pub fn delete(&mut self, id: &str) -> bool {
		let before = self.relics.len();
		self.relics.retain(|r| r.id != id);
		self.relics.len() != before
	}

	pub fn clear(&mut self) {
		self.relics.clear();
	}

	pub fn stats(&self) -> Stats {
		let mut by_color = [0usize; 4];
		let mut deep_night = 0;
		for relic in &self.relics {
			if let Some(i) = RelicColor::ALL.iter().position(|c| *c == relic.color) {
				by_color[i] += 1;
			}
			if relic.dn {
				deep_night += 1;
			}
		}

		Stats {
			total: self.relics.len(),
			deep_night,
			normal: self.relics.len() - deep_night,
			by_color,
		}
	}

	/// Serialize the whole collection, insertion order preserved.
	pub fn export_json(&self) -> Result<String> {
		serde_json::to_string_pretty(&self.relics).context("serialize export")
	}

	/// Merge records from an exported JSON array. Records whose id is already
	/// present are skipped; returns how many were added.
	pub fn import_json(&mut self, json: &str) -> Result<usize> {
		let incoming: Vec<Relic> = serde_json::from_str(json).context("parse import (expected a JSON array of relics)")?;

		let existing = self
			.relics
			.iter()
			.map(|r| r.id.clone())
			.collect::<std::collections::HashSet<_>>();

		let mut added = 0;
		for relic in incoming {
			if existing.contains(&relic.id) {
				continue;
			}
			self.relics.push(relic);
			added += 1;
		}
		Ok(added)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn relic(id: &str, color: RelicColor, dn: bool) -> Relic {
		Relic {
			id: id.to_string(),
			item_id: 1050,
			color,
			dn,
			effects: vec![7040200],
			name: None,
		}
	}

	#[test]
	fn generated_ids_are_unique_and_shaped() {
		let mut seen = std::collections::HashSet::new();
		for _ in 0..1000 {
			let id = generate_id();
			assert!(id.starts_with("relic-"), "{id}");
			assert!(seen.insert(id));
		}
	}

	#[test]
	fn missing_file_is_empty_collection() {
		let dir = tempfile::tempdir().unwrap();
		let store = Store::open(dir.path().join("collection.json")).unwrap();
		assert!(store.is_empty());
	}

	#[test]
	fn save_and_reopen() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("collection.json");

		let mut store = Store::open(&path).unwrap();
		store.append(relic("relic-1-a", RelicColor::Red, false));
		store.append(relic("relic-2-b", RelicColor::Blue, true));
		store.save().unwrap();

		let reopened = Store::open(&path).unwrap();
		assert_eq!(reopened.relics(), store.relics());
	}

	#[test]
	fn delete_by_id() {
		let dir = tempfile::tempdir().unwrap();
		let mut store = Store::open(dir.path().join("c.json")).unwrap();
		store.append(relic("a", RelicColor::Red, false));
		store.append(relic("b", RelicColor::Red, false));

		assert!(store.delete("a"));
		assert!(!store.delete("a"));
		assert_eq!(store.len(), 1);
		assert_eq!(store.relics()[0].id, "b");
	}

	#[test]
	fn stats_count_colors_and_deep_night() {
		let dir = tempfile::tempdir().unwrap();
		let mut store = Store::open(dir.path().join("c.json")).unwrap();
		store.append(relic("a", RelicColor::Red, true));
		store.append(relic("b", RelicColor::Red, false));
		store.append(relic("c", RelicColor::Yellow, false));

		let stats = store.stats();
		assert_eq!(stats.total, 3);
		assert_eq!(stats.deep_night, 1);
		assert_eq!(stats.normal, 2);
		// ALL order: Red, Green, Blue, Yellow.
		assert_eq!(stats.by_color, [2, 0, 0, 1]);
	}

	#[test]
	fn export_import_round_trip_skips_duplicates() {
		let dir = tempfile::tempdir().unwrap();
		let mut source = Store::open(dir.path().join("src.json")).unwrap();
		for i in 0..5 {
			source.append(relic(&format!("relic-{i}"), RelicColor::Green, i % 2 == 0));
		}
		let exported = source.export_json().unwrap();

		let mut target = Store::open(dir.path().join("dst.json")).unwrap();
		assert_eq!(target.import_json(&exported).unwrap(), 5);
		assert_eq!(target.len(), 5);
		assert_eq!(
			target.relics().iter().map(|r| &r.id).collect::<Vec<_>>(),
			source.relics().iter().map(|r| &r.id).collect::<Vec<_>>()
		);

		// Importing the same data again adds nothing.
		assert_eq!(target.import_json(&exported).unwrap(), 0);
		assert_eq!(target.len(), 5);
	}

	#[test]
	fn wire_format_matches_established_export() {
		let r = relic("relic-1-x", RelicColor::Red, true);
		let json = serde_json::to_string(&r).unwrap();
		assert!(json.contains("\"itemId\":1050"), "{json}");
		assert!(json.contains("\"dn\":true"), "{json}");
		// Absent name is omitted, not null.
		assert!(!json.contains("\"name\""), "{json}");
	}
}
