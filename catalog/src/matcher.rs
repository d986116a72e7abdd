//! Fuzzy effect matcher.
//!
//! OCR output is noisy: misread characters, merged words, partial lines. We
//! match each line of the raw text against the closed effect vocabulary with a
//! normalized Levenshtein similarity and keep the best candidate per line.

use crate::{EffectDef, EffectMatch};

/// Candidate lines shorter than this (after trimming) are OCR dust, not text.
const MIN_LINE_LEN: usize = 3;

/// Normalized similarity in [0, 1] between two already-lowercased strings.
///
/// 1.0 for identical strings; approaches 0.0 as the edit distance nears the
/// longer string's length.
fn similarity(a: &str, b: &str) -> f32 {
	if a == b {
		return 1.0;
	}
	let max_len = a.chars().count().max(b.chars().count());
	if max_len == 0 {
		return 1.0;
	}
	let dist = levenshtein::levenshtein(a, b);
	(1.0 - dist as f32 / max_len as f32).max(0.0)
}

/// Match every line of `text` against the vocabulary, keeping per-line best
/// matches with `score >= threshold`.
///
/// The result is ordered by line position. The same effect id can appear more
/// than once when it is the best match for several lines; de-duplication is
/// the caller's policy. Ties within a line resolve to the earliest catalog
/// entry, so the output is stable for a given `(text, threshold)`.
pub fn match_effects(effects: &[EffectDef], text: &str, threshold: f32) -> Vec<EffectMatch> {
	let lowered = effects
		.iter()
		.map(|def| def.name.to_lowercase())
		.collect::<Vec<_>>();

	let mut matches = Vec::new();
	for line in text.lines() {
		let line = line.trim();
		if line.len() < MIN_LINE_LEN {
			continue;
		}
		let line = line.to_lowercase();

		let mut best: Option<(usize, f32)> = None;
		for (i, name) in lowered.iter().enumerate() {
			let score = similarity(&line, name);
			// Strictly-greater keeps the earliest catalog entry on ties.
			if best.is_none_or(|(_, s)| score > s) {
				best = Some((i, score));
			}
		}

		if let Some((i, score)) = best {
			if score >= threshold {
				matches.push(EffectMatch {
					id: effects[i].id,
					name: effects[i].name.clone(),
					score,
				});
			}
		}
	}

	matches
}

#[cfg(test)]
mod tests {
	use super::*;

	fn vocab() -> Vec<EffectDef> {
		vec![
			EffectDef::plain(12, "Attack +15%"),
			EffectDef::plain(47, "Crit Rate +8%"),
			EffectDef::plain(90, "Energy Regen +10%"),
		]
	}

	#[test]
	fn exact_lines_score_one() {
		let matches = match_effects(&vocab(), "Attack +15%\nCrit Rate +8%", 0.6);
		assert_eq!(matches.len(), 2);
		assert_eq!(matches[0].id, 12);
		assert_eq!(matches[0].score, 1.0);
		assert_eq!(matches[1].id, 47);
		assert_eq!(matches[1].score, 1.0);
	}

	#[test]
	fn tolerates_ocr_noise() {
		// Misread characters still clear a 0.6 floor.
		let matches = match_effects(&vocab(), "Attock +l5%", 0.6);
		assert_eq!(matches.len(), 1);
		assert_eq!(matches[0].id, 12);
		assert!(matches[0].score >= 0.6 && matches[0].score < 1.0);
	}

	#[test]
	fn case_insensitive() {
		let matches = match_effects(&vocab(), "ATTACK +15%", 0.9);
		assert_eq!(matches.len(), 1);
		assert_eq!(matches[0].id, 12);
		assert_eq!(matches[0].score, 1.0);
	}

	#[test]
	fn disjoint_text_scores_near_zero() {
		let matches = match_effects(&vocab(), "zzzzzzzzzzzz", 0.2);
		assert!(matches.is_empty());
	}

	#[test]
	fn empty_text_is_not_an_error() {
		assert!(match_effects(&vocab(), "", 0.1).is_empty());
		assert!(match_effects(&vocab(), "\n \n", 0.1).is_empty());
	}

	#[test]
	fn deterministic() {
		let a = match_effects(&vocab(), "Attack +15%\nCrit Rote +8%", 0.5);
		let b = match_effects(&vocab(), "Attack +15%\nCrit Rote +8%", 0.5);
		assert_eq!(a, b);
	}

	#[test]
	fn threshold_is_monotone() {
		let text = "Attack +15%\nCrit Rote +8%\nEnergy Regen +10%\ngibberish line";
		let loose = match_effects(&vocab(), text, 0.3);
		let strict = match_effects(&vocab(), text, 0.8);
		assert!(strict.len() <= loose.len());
		for m in &strict {
			assert!(loose.iter().any(|l| l.id == m.id && l.score == m.score));
		}
	}

	#[test]
	fn ties_break_by_catalog_order() {
		// Two entries with the same display name: the earlier one wins.
		let effects = vec![EffectDef::plain(1, "Attack +15%"), EffectDef::plain(2, "Attack +15%")];
		let matches = match_effects(&effects, "Attack +15%", 0.9);
		assert_eq!(matches.len(), 1);
		assert_eq!(matches[0].id, 1);
	}

	#[test]
	fn duplicate_ids_across_lines_are_allowed() {
		let matches = match_effects(&vocab(), "Attack +15%\nAttack +15%", 0.9);
		assert_eq!(matches.len(), 2);
		assert_eq!(matches[0].id, matches[1].id);
	}
}
