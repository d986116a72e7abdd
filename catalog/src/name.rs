use crate::{Quality, RelicColor};

/// Build a display label for a relic with no known unique name.
///
/// Pure: derived entirely from the arguments. Returns `None` when the color
/// is unknown, since a label without a color family reads as garbage.
pub fn relic_label(
	color: Option<RelicColor>,
	deep_night: bool,
	effect_count: usize,
	quality: Option<Quality>,
) -> Option<String> {
	let color = color?;

	let mut label = String::new();
	if let Some(quality) = quality {
		label.push_str(quality.as_str());
		label.push(' ');
	}
	if deep_night {
		label.push_str("Deep Night ");
	}
	label.push_str(color.as_str());
	label.push_str(" Relic");
	match effect_count {
		0 => {}
		1 => label.push_str(" (1 effect)"),
		n => {
			label.push_str(&format!(" ({n} effects)"));
		}
	}

	Some(label)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn no_color_no_label() {
		assert_eq!(relic_label(None, true, 5, Some(Quality::Grand)), None);
	}

	#[test]
	fn full_label() {
		assert_eq!(
			relic_label(Some(RelicColor::Red), true, 5, Some(Quality::Grand)).as_deref(),
			Some("Grand Deep Night Red Relic (5 effects)")
		);
	}

	#[test]
	fn minimal_label() {
		assert_eq!(
			relic_label(Some(RelicColor::Blue), false, 0, None).as_deref(),
			Some("Blue Relic")
		);
	}

	#[test]
	fn singular_effect_count() {
		assert_eq!(
			relic_label(Some(RelicColor::Yellow), false, 1, None).as_deref(),
			Some("Yellow Relic (1 effect)")
		);
	}
}
