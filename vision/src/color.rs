//! Pixel-histogram color fallback.
//!
//! Used only when the OCR text carries no color keyword. The relic icon sits
//! roughly centered in the frame with a colored glow behind it, so we sample
//! two background strips flanking the icon (never the icon itself, whose art
//! can contain any color) and vote pixels into the four color families.
//!
//! All coordinates are relative so the detector is resolution independent.

use catalog::RelicColor;

use crate::Image;

/// Glow sampling regions as (x, y, w, h) fractions of the frame.
const GLOW_REGIONS: [(f32, f32, f32, f32); 2] = [
    (0.16, 0.30, 0.14, 0.32),
    (0.70, 0.30, 0.14, 0.32),
];

/// Reference hues for the four families (degrees).
const REFERENCE_HUES: [(RelicColor, f32); 4] = [
    (RelicColor::Red, 0.0),
    (RelicColor::Yellow, 50.0),
    (RelicColor::Green, 120.0),
    (RelicColor::Blue, 225.0),
];

/// Tolerance band around each reference hue.
const HUE_TOLERANCE: f32 = 28.0;

/// Washed-out or dark pixels (UI chrome, shadows) never vote.
const MIN_SATURATION: f32 = 0.25;
const MIN_VALUE: f32 = 0.15;

/// The winning bucket must cover at least this fraction of sampled pixels,
/// otherwise the glow is considered absent.
const MIN_VOTE_FRACTION: f32 = 0.04;

/// Classify the dominant glow color of a full camera frame.
///
/// Returns `None` for a missing frame, a degenerate frame, or a frame whose
/// glow regions carry no dominant color. Never fails.
pub fn detect_color(frame: Option<Image>) -> Option<RelicColor> {
    let frame = frame?;
    let (width, height) = (frame.width(), frame.height());
    if width == 0 || height == 0 {
        return None;
    }

    let mut votes = [0usize; REFERENCE_HUES.len()];
    let mut sampled = 0usize;

    for &(rx, ry, rw, rh) in &GLOW_REGIONS {
        let region = frame.sub_image(
            (width as f32 * rx).round() as u32,
            (height as f32 * ry).round() as u32,
            ((width as f32 * rw).round() as u32).max(1),
            ((height as f32 * rh).round() as u32).max(1),
        );
        tracing::debug!(
            "glow region {}x{} average {:?}",
            region.width(),
            region.height(),
            region.average_color()
        );

        for pixel in region.pixels() {
            sampled += 1;
            let (hue, sat, val) = pixel.hsv();
            if sat < MIN_SATURATION || val < MIN_VALUE {
                continue;
            }
            if let Some(bucket) = classify_hue(hue) {
                votes[bucket] += 1;
            }
        }
    }

    if sampled == 0 {
        return None;
    }

    let (best, &count) = votes
        .iter()
        .enumerate()
        .max_by_key(|&(_, &count)| count)?;

    if (count as f32) < (sampled as f32) * MIN_VOTE_FRACTION {
        return None;
    }

    Some(REFERENCE_HUES[best].0)
}

fn classify_hue(hue: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &(_, reference)) in REFERENCE_HUES.iter().enumerate() {
        let raw = (hue - reference).abs();
        let dist = raw.min(360.0 - raw);
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((i, dist));
        }
    }

    best.and_then(|(i, dist)| (dist <= HUE_TOLERANCE).then_some(i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OwnedImage, Rgb};

    #[test]
    fn missing_frame_is_absent() {
        assert_eq!(detect_color(None), None);
    }

    #[test]
    fn degenerate_frame_is_absent() {
        let img = OwnedImage::solid(0, 0, Rgb::default());
        assert_eq!(detect_color(Some(img.as_image())), None);
    }

    #[test]
    fn solid_glow_frames_classify() {
        let cases = [
            (Rgb::new(200, 40, 40), RelicColor::Red),
            (Rgb::new(60, 190, 70), RelicColor::Green),
            (Rgb::new(50, 90, 210), RelicColor::Blue),
            (Rgb::new(230, 200, 40), RelicColor::Yellow),
        ];
        for (fill, expected) in cases {
            let img = OwnedImage::solid(320, 180, fill);
            assert_eq!(detect_color(Some(img.as_image())), Some(expected), "{fill:?}");
        }
    }

    #[test]
    fn gray_frame_has_no_dominant_color() {
        let img = OwnedImage::solid(320, 180, Rgb::new(120, 120, 120));
        assert_eq!(detect_color(Some(img.as_image())), None);
    }

    #[test]
    fn dark_frame_has_no_dominant_color() {
        let img = OwnedImage::solid(320, 180, Rgb::new(20, 8, 8));
        assert_eq!(detect_color(Some(img.as_image())), None);
    }
}
