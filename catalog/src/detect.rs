//! Text signal detector.
//!
//! Scans raw OCR text for color keywords, quality keywords, deep night
//! indicators and unique relic names. Works purely on text plus the matcher's
//! output; pixel data is a separate fallback owned by the caller.

use std::sync::LazyLock;

use regex::Regex;

use crate::{Catalog, DetectionResult, EffectMatch, Quality, RelicColor};

/// In-game color names, 1:1 with the four families.
const COLOR_KEYWORDS: [(&str, RelicColor); 4] = [
	("burning", RelicColor::Red),
	("verdant", RelicColor::Green),
	("tranquil", RelicColor::Blue),
	("radiant", RelicColor::Yellow),
];

const QUALITY_KEYWORDS: [(&str, Quality); 3] = [
	("grand", Quality::Grand),
	("polished", Quality::Polished),
	("delicate", Quality::Delicate),
];

/// OCR merges or pads the words, so allow flexible whitespace.
static DEEP_NIGHT_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?i)deep\s*night").expect("regex"));
static DAYLIGHT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)daylight").expect("regex"));

/// Near-exact relic name tolerance (edit distance per line).
const NAME_MAX_DISTANCE: usize = 2;

pub fn detect_from_text(catalog: &Catalog, text: &str, matched: &[EffectMatch]) -> DetectionResult {
	let lower = text.to_lowercase();

	DetectionResult {
		color: first_keyword(&lower, &COLOR_KEYWORDS),
		quality: first_keyword(&lower, &QUALITY_KEYWORDS),
		deep_night: detect_deep_night(catalog, &lower, matched),
		relic_name: detect_relic_name(catalog, &lower),
	}
}

/// Earliest occurrence wins. Multiple distinct keywords in one text are a
/// plausible OCR artifact; we resolve the ambiguity instead of surfacing it.
fn first_keyword<T: Copy>(lower: &str, keywords: &[(&str, T)]) -> Option<T> {
	keywords
		.iter()
		.filter_map(|(kw, value)| lower.find(kw).map(|pos| (pos, *value)))
		.min_by_key(|(pos, _)| *pos)
		.map(|(_, value)| value)
}

/// Tri-state deep night detection, in priority order:
/// 1. explicit phrase in the text (definitive, either way)
/// 2. a matched effect that only rolls on deep night relics
/// 3. no signal: `None`, so the caller can apply its own heuristic
fn detect_deep_night(catalog: &Catalog, lower: &str, matched: &[EffectMatch]) -> Option<bool> {
	if DEEP_NIGHT_RE.is_match(lower) {
		return Some(true);
	}
	if DAYLIGHT_RE.is_match(lower) {
		return Some(false);
	}

	let exclusive = matched
		.iter()
		.any(|m| catalog.effect(m.id).is_some_and(|def| def.deep_night));
	if exclusive {
		return Some(true);
	}

	None
}

fn detect_relic_name(catalog: &Catalog, lower: &str) -> Option<String> {
	// Exact (case-insensitive) substring first.
	for relic in catalog.named_relics() {
		if lower.contains(&relic.name.to_lowercase()) {
			return Some(relic.name.clone());
		}
	}

	// Then a near-exact line match, for names OCR slightly mangled.
	for line in lower.lines() {
		let line = line.trim();
		if line.len() < 3 {
			continue;
		}
		for relic in catalog.named_relics() {
			if levenshtein::levenshtein(line, &relic.name.to_lowercase()) <= NAME_MAX_DISTANCE {
				return Some(relic.name.clone());
			}
		}
	}

	None
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{EffectDef, NamedRelic};

	fn catalog() -> Catalog {
		Catalog::new(
			vec![
				EffectDef::plain(12, "Attack +15%"),
				EffectDef::plain(47, "Crit Rate +8%"),
				EffectDef {
					id: 7500100,
					name: "Nightveil: Attack +25%".to_string(),
					desc: None,
					deep_night: true,
				},
			],
			vec![NamedRelic {
				name: "Glass Necklace".to_string(),
				effects: vec![12, 47],
				item_id: 2010,
			}],
			Vec::new(),
		)
	}

	#[test]
	fn color_from_keyword() {
		let d = catalog().detect_from_text("Attack +15%\nBurning", &[]);
		assert_eq!(d.color, Some(RelicColor::Red));
	}

	#[test]
	fn color_is_case_insensitive() {
		let d = catalog().detect_from_text("TRANQUIL", &[]);
		assert_eq!(d.color, Some(RelicColor::Blue));
	}

	#[test]
	fn ambiguous_colors_resolve_to_first_occurrence() {
		let d = catalog().detect_from_text("radiant something burning", &[]);
		assert_eq!(d.color, Some(RelicColor::Yellow));
	}

	#[test]
	fn quality_from_keyword() {
		let d = catalog().detect_from_text("Polished relic of some kind", &[]);
		assert_eq!(d.quality, Some(Quality::Polished));
	}

	#[test]
	fn deep_night_phrase_is_definitive() {
		let c = catalog();
		assert_eq!(c.detect_from_text("Deep Night", &[]).deep_night, Some(true));
		assert_eq!(c.detect_from_text("deepnight", &[]).deep_night, Some(true));
		assert_eq!(c.detect_from_text("Daylight", &[]).deep_night, Some(false));
	}

	#[test]
	fn deep_night_from_exclusive_effect() {
		let c = catalog();
		let matched = vec![EffectMatch {
			id: 7500100,
			name: "Nightveil: Attack +25%".to_string(),
			score: 0.9,
		}];
		assert_eq!(c.detect_from_text("Nightveil: Attack +25%", &matched).deep_night, Some(true));
	}

	#[test]
	fn deep_night_tri_state_unknown_is_none() {
		// No phrase, no exclusive effect: unknown, not false.
		let c = catalog();
		let matched = vec![EffectMatch {
			id: 12,
			name: "Attack +15%".to_string(),
			score: 1.0,
		}];
		assert_eq!(c.detect_from_text("Attack +15%", &matched).deep_night, None);
		assert_ne!(c.detect_from_text("Attack +15%", &matched).deep_night, Some(false));
	}

	#[test]
	fn relic_name_exact_substring() {
		let d = catalog().detect_from_text("glass necklace\nAttack +15%", &[]);
		assert_eq!(d.relic_name.as_deref(), Some("Glass Necklace"));
	}

	#[test]
	fn relic_name_near_match() {
		let d = catalog().detect_from_text("Glass Necklcce", &[]);
		assert_eq!(d.relic_name.as_deref(), Some("Glass Necklace"));
	}

	#[test]
	fn empty_text_yields_all_absent() {
		let d = catalog().detect_from_text("", &[]);
		assert_eq!(d, DetectionResult::default());
	}
}
