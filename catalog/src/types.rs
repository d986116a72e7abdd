use std::fmt;
use std::str::FromStr;

/// The four relic color families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum RelicColor {
	Red,
	Green,
	Blue,
	Yellow,
}

impl RelicColor {
	pub const ALL: [Self; 4] = [Self::Red, Self::Green, Self::Blue, Self::Yellow];

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Red => "Red",
			Self::Green => "Green",
			Self::Blue => "Blue",
			Self::Yellow => "Yellow",
		}
	}
}

impl fmt::Display for RelicColor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for RelicColor {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"red" => Ok(Self::Red),
			"green" => Ok(Self::Green),
			"blue" => Ok(Self::Blue),
			"yellow" => Ok(Self::Yellow),
			other => Err(format!("unknown color {other:?} (expected red, green, blue or yellow)")),
		}
	}
}

/// Relic quality tier, as printed on the item screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Quality {
	Grand,
	Polished,
	Delicate,
}

impl Quality {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Grand => "Grand",
			Self::Polished => "Polished",
			Self::Delicate => "Delicate",
		}
	}
}

impl fmt::Display for Quality {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One scored effect match from the fuzzy matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectMatch {
	pub id: u32,
	pub name: String,
	/// Normalized similarity in [0, 1]; 1.0 is an exact match.
	pub score: f32,
}

/// Signals extracted from a single pass of OCR text.
///
/// Every field is optional: `None` means "no signal found", which for
/// `deep_night` is distinct from an explicit `Some(false)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionResult {
	pub color: Option<RelicColor>,
	pub quality: Option<Quality>,
	pub deep_night: Option<bool>,
	pub relic_name: Option<String>,
}
