//! Scan cycle orchestration.
//!
//! One session accumulates detection state across cycles: a value detected in
//! an earlier cycle sticks even when later cycles read nothing. The caller
//! drives cycles (on demand or from a timer); at most one cycle runs at a
//! time, and a tick arriving mid-cycle is dropped, not queued.

use anyhow::{Context, Result, bail};
use catalog::{Catalog, DetectionResult, EffectMatch, Quality, RelicColor, relic_label};
use vision::{FrameSource, Ocr};

use crate::config::Config;
use crate::store::{Relic, generate_id};

/// With no explicit deep night signal, relics carrying at least this many
/// effects are displayed as deep night. Display heuristic only; the detector
/// itself stays tri-state.
const DN_EFFECT_COUNT: usize = 5;

/// What one cycle produced, kept for status display.
#[derive(Debug, Clone)]
pub struct ScanSignal {
	pub text: String,
	pub confidence: f32,
	pub matched: Vec<EffectMatch>,
}

/// Accumulated detection state, folded across cycles.
#[derive(Debug, Clone, Default)]
pub struct Detected {
	/// Confirmed effects: the most recent non-empty accepted set.
	pub effects: Vec<EffectMatch>,
	/// Color from text or pixel detection.
	pub color: Option<RelicColor>,
	/// User override; always beats detection.
	pub manual_color: Option<RelicColor>,
	pub quality: Option<Quality>,
	/// Tri-state: `None` means no signal either way.
	pub deep_night: Option<bool>,
	/// Unique relic name, when one was read from the text.
	pub relic_name: Option<String>,
}

impl Detected {
	/// Fold one cycle's detection into the accumulated state.
	///
	/// Non-absent wins over absent, and the first non-absent value wins over
	/// later conflicting ones, so a confident early read cannot be churned
	/// away by a noisy later frame.
	pub fn merge(&mut self, result: DetectionResult) {
		if self.color.is_none() {
			self.color = result.color;
		}
		if self.quality.is_none() {
			self.quality = result.quality;
		}
		if self.deep_night.is_none() {
			self.deep_night = result.deep_night;
		}
		if self.relic_name.is_none() {
			self.relic_name = result.relic_name;
		}
	}

	pub fn effective_color(&self) -> Option<RelicColor> {
		self.manual_color.or(self.color)
	}

	/// Deep night as shown to the user: the detected tri-state when known,
	/// otherwise the effect count heuristic.
	pub fn deep_night_display(&self) -> bool {
		self.deep_night.unwrap_or(self.effects.len() >= DN_EFFECT_COUNT)
	}

	/// Unique name when detected, otherwise a synthesized label.
	pub fn display_name(&self) -> Option<String> {
		if let Some(name) = &self.relic_name {
			return Some(name.clone());
		}
		relic_label(
			self.effective_color(),
			self.deep_night_display(),
			self.effects.len(),
			self.quality,
		)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
	/// A cycle was already running; this tick was dropped.
	Busy,
	/// The camera had no cropped frame to offer.
	NoFrame,
	/// A full cycle ran; `accepted` counts this cycle's confirmed effects.
	Scanned { accepted: usize },
}

pub struct ScanSession<'a> {
	catalog: &'a Catalog,
	config: Config,
	detected: Detected,
	last_signal: Option<ScanSignal>,
	processing: bool,
}

impl<'a> ScanSession<'a> {
	pub fn new(catalog: &'a Catalog, config: Config) -> Self {
		Self {
			catalog,
			config,
			detected: Detected::default(),
			last_signal: None,
			processing: false,
		}
	}

	pub fn detected(&self) -> &Detected {
		&self.detected
	}

	pub fn detected_mut(&mut self) -> &mut Detected {
		&mut self.detected
	}

	pub fn last_signal(&self) -> Option<&ScanSignal> {
		self.last_signal.as_ref()
	}

	/// Discard the cycle state, e.g. after a save or a manual reset.
	pub fn reset(&mut self) {
		self.detected = Detected::default();
		self.last_signal = None;
	}

	/// Run one scan cycle, unless one is already in flight.
	///
	/// Collaborator failures bubble up as errors for the caller to surface;
	/// the busy flag is cleared on every exit path.
	pub fn scan_once(&mut self, frames: &mut dyn FrameSource, ocr: &dyn Ocr) -> Result<CycleOutcome> {
		if self.processing {
			tracing::debug!("scan tick dropped; a cycle is already running");
			return Ok(CycleOutcome::Busy);
		}

		self.processing = true;
		let outcome = self.run_cycle(frames, ocr);
		self.processing = false;
		outcome
	}

	fn run_cycle(&mut self, frames: &mut dyn FrameSource, ocr: &dyn Ocr) -> Result<CycleOutcome> {
		let Some(cropped) = frames.cropped_frame() else {
			return Ok(CycleOutcome::NoFrame);
		};

		let ocr_out = ocr
			.recognize(cropped.as_image(), self.config.psm)
			.context("OCR collaborator failed")?;

		let matched = self.catalog.match_effects(&ocr_out.text, self.config.match_threshold);

		// Acceptance policy on top of the matcher floor.
		let accepted = matched
			.iter()
			.filter(|m| m.score > self.config.accept_score)
			.cloned()
			.collect::<Vec<_>>();
		let accepted_count = accepted.len();

		let detection = self.catalog.detect_from_text(&ocr_out.text, &accepted);

		// A noisy cycle must not wipe effects confirmed by a previous one.
		if !accepted.is_empty() {
			self.detected.effects = accepted;
		}

		self.detected.merge(detection);

		// Pixel fallback runs only while no color is known from any source.
		// A manual or text-detected color suppresses it entirely; the full
		// frame is not even requested.
		if self.detected.effective_color().is_none() {
			let full = frames.full_frame();
			self.detected.color = vision::detect_color(full.as_ref().map(|f| f.as_image()));
		}

		self.last_signal = Some(ScanSignal {
			text: ocr_out.text,
			confidence: ocr_out.confidence,
			matched,
		});

		Ok(CycleOutcome::Scanned {
			accepted: accepted_count,
		})
	}

	/// Build the persistable record from the accumulated state.
	///
	/// The save preconditions are enforced here, before the resolver runs: a
	/// relic with no color or no effects is rejected with a message for the
	/// user, never persisted.
	pub fn build_relic(&self) -> Result<Relic> {
		let Some(color) = self.detected.effective_color() else {
			bail!("no color detected; set one manually before saving");
		};
		if self.detected.effects.is_empty() {
			bail!("no effects detected; nothing to save");
		}

		let effect_ids = self.detected.effects.iter().map(|m| m.id).collect::<Vec<_>>();
		let item_id = self
			.catalog
			.resolve_item_id(&effect_ids, self.detected.relic_name.as_deref());

		Ok(Relic {
			id: generate_id(),
			item_id,
			color,
			dn: self.detected.deep_night_display(),
			effects: effect_ids,
			name: self.detected.display_name(),
		})
	}
}
