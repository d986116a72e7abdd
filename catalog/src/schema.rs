//! Serde mirror of the embedded JSON catalogs.
//!
//! Kept separate from the runtime types so the on-disk format can stay close
//! to the upstream spreadsheet exports.

use serde::Deserialize;

#[derive(Deserialize)]
pub struct EffectEntry {
	pub id: u32,
	pub name: String,
	#[serde(default)]
	pub desc: Option<String>,
	#[serde(default, rename = "deepNight")]
	pub deep_night: bool,
}

#[derive(Deserialize)]
pub struct NamedRelicEntry {
	pub name: String,
	pub effects: Vec<u32>,
	#[serde(rename = "itemId")]
	pub item_id: i32,
}

#[derive(Deserialize)]
pub struct ShopRelicEntry {
	pub effects: Vec<u32>,
	#[serde(rename = "itemId")]
	pub item_id: i32,
}
