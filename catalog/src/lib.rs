//! Static reference data for the relic scanner, plus every text-side
//! algorithm that runs against it: the fuzzy effect matcher, the text signal
//! detector, the item id resolver and the relic namer.
//!
//! The catalogs are embedded at compile time and loaded once at startup; the
//! resulting [`Catalog`] is read-only for the life of the process.

use std::collections::HashMap;

use anyhow::{Context, Result};

mod schema;

mod detect;
mod key;
mod matcher;
mod name;
mod resolve;
mod types;

pub use key::EffectKey;
pub use name::relic_label;
pub use types::{DetectionResult, EffectMatch, Quality, RelicColor};

/// Returned when no resolution strategy can identify a relic.
pub const UNKNOWN_ITEM_ID: i32 = -1_000_000;

static EFFECTS_JSON: &str = include_str!("../data/effects.json");
static NAMED_RELICS_JSON: &str = include_str!("../data/named_relics.json");
static SHOP_RELICS_JSON: &str = include_str!("../data/shop_relics.json");

/// One entry of the effect vocabulary.
#[derive(Debug, Clone)]
pub struct EffectDef {
	pub id: u32,
	pub name: String,
	pub desc: Option<String>,
	/// Effect only rolls on deep night relics; used as a deep night signal.
	pub deep_night: bool,
}

impl EffectDef {
	/// Plain entry with no description and no deep night marker.
	pub fn plain(id: u32, name: &str) -> Self {
		Self {
			id,
			name: name.to_string(),
			desc: None,
			deep_night: false,
		}
	}
}

/// A relic tied to a unique, story-fixed drop.
#[derive(Debug, Clone)]
pub struct NamedRelic {
	pub name: String,
	/// Order in the source data is irrelevant; matching goes through [`EffectKey`].
	pub effects: Vec<u32>,
	pub item_id: i32,
}

pub struct Catalog {
	effects: Vec<EffectDef>,
	effect_index: HashMap<u32, usize>,
	named_relics: Vec<NamedRelic>,
	shop_lookup: HashMap<EffectKey, i32>,
}

impl Catalog {
	pub fn new(
		effects: Vec<EffectDef>,
		named_relics: Vec<NamedRelic>,
		shop_entries: Vec<(EffectKey, i32)>,
	) -> Self {
		let mut effect_index = HashMap::new();
		for (i, def) in effects.iter().enumerate() {
			if effect_index.insert(def.id, i).is_some() {
				tracing::warn!(id = def.id, "duplicate effect id in catalog; keeping the last entry");
			}
		}

		let mut shop_lookup = HashMap::new();
		for (key, item_id) in shop_entries {
			if let Some(old) = shop_lookup.insert(key, item_id) {
				tracing::warn!(old, new = item_id, "duplicate shop effect combination; keeping the last entry");
			}
		}

		Self {
			effects,
			effect_index,
			named_relics,
			shop_lookup,
		}
	}

	/// Parse the embedded catalogs. Malformed embedded data is a build
	/// problem, but surfaces as a startup error rather than a panic.
	pub fn load() -> Result<Self> {
		let effects: Vec<schema::EffectEntry> =
			serde_json::from_str(EFFECTS_JSON).context("Decode effect catalog")?;
		let named: Vec<schema::NamedRelicEntry> =
			serde_json::from_str(NAMED_RELICS_JSON).context("Decode named relic catalog")?;
		let shop: Vec<schema::ShopRelicEntry> =
			serde_json::from_str(SHOP_RELICS_JSON).context("Decode shop relic catalog")?;

		let effects = effects
			.into_iter()
			.map(|e| EffectDef {
				id: e.id,
				name: e.name,
				desc: e.desc,
				deep_night: e.deep_night,
			})
			.collect();
		let named_relics = named
			.into_iter()
			.map(|r| NamedRelic {
				name: r.name,
				effects: r.effects,
				item_id: r.item_id,
			})
			.collect();
		let shop_entries = shop
			.into_iter()
			.map(|r| (EffectKey::from(r.effects), r.item_id))
			.collect();

		Ok(Self::new(effects, named_relics, shop_entries))
	}

	pub fn effects(&self) -> &[EffectDef] {
		&self.effects
	}

	pub fn named_relics(&self) -> &[NamedRelic] {
		&self.named_relics
	}

	pub fn effect(&self, id: u32) -> Option<&EffectDef> {
		self.effect_index.get(&id).map(|&i| &self.effects[i])
	}

	/// Display name for an effect id; unknown ids render as a placeholder
	/// carrying the raw id instead of failing.
	pub fn effect_label(&self, id: u32) -> String {
		match self.effect(id) {
			Some(def) => def.name.clone(),
			None => format!("#{id}"),
		}
	}

	pub(crate) fn shop_item_id(&self, key: &EffectKey) -> Option<i32> {
		self.shop_lookup.get(key).copied()
	}

	/// Fuzzy-match OCR text against the effect vocabulary; per-line best
	/// matches with `score >= threshold`, ordered by line position.
	pub fn match_effects(&self, text: &str, threshold: f32) -> Vec<EffectMatch> {
		matcher::match_effects(&self.effects, text, threshold)
	}

	/// Scan OCR text (plus the matcher's output) for color, quality, deep
	/// night and unique relic name signals.
	pub fn detect_from_text(&self, text: &str, matched: &[EffectMatch]) -> DetectionResult {
		detect::detect_from_text(self, text, matched)
	}

	/// Resolve the canonical item id for an effect combination, or
	/// [`UNKNOWN_ITEM_ID`]. Exact-match only; see the `resolve` module.
	pub fn resolve_item_id(&self, effect_ids: &[u32], relic_name: Option<&str>) -> i32 {
		resolve::resolve_item_id(self, effect_ids, relic_name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn embedded_catalogs_parse() {
		let catalog = Catalog::load().expect("embedded catalogs");
		assert!(!catalog.effects().is_empty());
		assert!(!catalog.named_relics().is_empty());

		// Every effect referenced by a relic catalog must be in the vocabulary.
		for relic in catalog.named_relics() {
			for &id in &relic.effects {
				assert!(catalog.effect(id).is_some(), "named relic references unknown effect {id}");
			}
		}
		for key in catalog.shop_lookup.keys() {
			for &id in key.ids() {
				assert!(catalog.effect(id).is_some(), "shop relic references unknown effect {id}");
			}
		}
	}

	#[test]
	fn shop_table_spot_checks() {
		let catalog = Catalog::load().unwrap();
		assert_eq!(catalog.resolve_item_id(&[7000400], None), 11004);
		assert_eq!(catalog.resolve_item_id(&[7040400, 7040300], None), 1040);
		assert_eq!(catalog.resolve_item_id(&[7126000, 7126000, 7126000], None), 1520);
		// A lone "all stats" roll is not the triple shop relic.
		assert_ne!(catalog.resolve_item_id(&[7126000], None), 1520);
	}

	#[test]
	fn unknown_effect_renders_placeholder() {
		let catalog = Catalog::load().unwrap();
		assert_eq!(catalog.effect_label(424242), "#424242");
		assert_eq!(catalog.effect_label(7000400), "Crit Rate +8%");
	}

	#[test]
	fn end_to_end_scan_text() {
		let catalog = Catalog::new(
			vec![EffectDef::plain(12, "Attack +15%"), EffectDef::plain(47, "Crit Rate +8%")],
			Vec::new(),
			Vec::new(),
		);
		let text = "Attack +15%\nCrit Rate +8%\nBurning";
		let matches = catalog.match_effects(text, 0.6);
		assert_eq!(matches.iter().map(|m| m.id).collect::<Vec<_>>(), vec![12, 47]);
		assert!(matches.iter().all(|m| m.score >= 0.6));

		let detection = catalog.detect_from_text(text, &matches);
		assert_eq!(detection.color, Some(RelicColor::Red));
	}

	#[test]
	fn lone_shop_item_id_is_not_a_key() {
		// "1050" exists as a shop item id, not as an effect combination.
		let catalog = Catalog::load().unwrap();
		assert_eq!(catalog.resolve_item_id(&[1050], None), UNKNOWN_ITEM_ID);
	}
}
