//! Canonical item id resolution.
//!
//! Exact-match only, in contrast to the fuzzy matcher: by this point the
//! effect ids are confirmed, and guessing an item id would poison exports.

use crate::{Catalog, EffectKey, UNKNOWN_ITEM_ID};

/// Resolve the game's item id for an effect combination, optionally guided by
/// a detected unique relic name.
///
/// Strategies are tried in order; the first hit wins:
/// 1. unique relic name
/// 2. unique relic effect combination
/// 3. shop relic effect combination
/// 4. the unknown sentinel
///
/// Resolution depends only on the canonical [`EffectKey`] and the name, so
/// effect order never changes the outcome.
pub fn resolve_item_id(catalog: &Catalog, effect_ids: &[u32], relic_name: Option<&str>) -> i32 {
	let key = EffectKey::new(effect_ids);

	by_name(catalog, relic_name)
		.or_else(|| by_named_effects(catalog, &key))
		.or_else(|| catalog.shop_item_id(&key))
		.unwrap_or(UNKNOWN_ITEM_ID)
}

fn by_name(catalog: &Catalog, relic_name: Option<&str>) -> Option<i32> {
	let name = relic_name?;
	catalog
		.named_relics()
		.iter()
		.find(|relic| relic.name == name)
		.map(|relic| relic.item_id)
}

fn by_named_effects(catalog: &Catalog, key: &EffectKey) -> Option<i32> {
	catalog
		.named_relics()
		.iter()
		.find(|relic| EffectKey::new(&relic.effects) == *key)
		.map(|relic| relic.item_id)
}
