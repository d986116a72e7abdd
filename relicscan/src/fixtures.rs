//! Offline collaborator implementations.
//!
//! The real OCR engine and camera live outside this workspace. For CLI use,
//! the OCR collaborator is modeled by a text fixture (recognized text supplied
//! as a file) and the camera by PNG frames on disk.

use std::path::Path;

use anyhow::{Context, Result};
use vision::{FrameSource, Image, Ocr, OcrText, OwnedImage, PageSegMode, Rgb};

/// OCR collaborator whose output is fixed up front.
pub struct TextFixture {
	text: String,
	confidence: f32,
}

impl TextFixture {
	pub fn new(text: impl Into<String>, confidence: f32) -> Self {
		Self {
			text: text.into(),
			confidence,
		}
	}

	/// Use a file's contents as the recognized text (confidence 100).
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path)
			.with_context(|| format!("read OCR text {}", path.display()))?;
		Ok(Self::new(text, 100.0))
	}
}

impl Ocr for TextFixture {
	fn recognize(&self, _image: Image<'_>, _mode: PageSegMode) -> Result<OcrText> {
		Ok(OcrText {
			text: self.text.clone(),
			confidence: self.confidence,
		})
	}
}

/// Frame source backed by files.
///
/// The cropped buffer is a stand-in (the text fixture never reads it); the
/// full frame, when given, is a real capture used for pixel color detection.
pub struct OfflineFrames {
	cropped: OwnedImage,
	full: Option<OwnedImage>,
}

impl OfflineFrames {
	pub fn new(full_frame: Option<&Path>) -> Result<Self> {
		let full = full_frame.map(OwnedImage::from_file).transpose()?;
		Ok(Self {
			cropped: OwnedImage::solid(1, 1, Rgb::default()),
			full,
		})
	}
}

impl FrameSource for OfflineFrames {
	fn cropped_frame(&mut self) -> Option<OwnedImage> {
		Some(self.cropped.clone())
	}

	fn full_frame(&mut self) -> Option<OwnedImage> {
		self.full.clone()
	}
}
