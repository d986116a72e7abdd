//! Collaborator boundaries.
//!
//! The OCR engine and the camera/preprocessing layer live outside this
//! workspace; the pipeline only sees these traits. Implementations are
//! expected to do their own preprocessing — by the time an image reaches
//! `recognize` it should already be a normalized crop.

use crate::{Image, OwnedImage};

/// Output of one OCR pass.
#[derive(Debug, Clone)]
pub struct OcrText {
    pub text: String,
    /// Engine confidence, 0–100.
    pub confidence: f32,
}

/// Page segmentation hint forwarded to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum PageSegMode {
    /// A uniform block of text (the effect list panel).
    #[default]
    SingleBlock,
    /// One line of text.
    SingleLine,
    /// Sparse text in no particular order.
    SparseText,
}

pub trait Ocr {
    /// Recognize text in a normalized image crop.
    ///
    /// Engine failures are real errors (the caller surfaces them as a status
    /// message); an image that simply contains no text is `Ok` with an empty
    /// string.
    fn recognize(&self, image: Image<'_>, mode: PageSegMode) -> anyhow::Result<OcrText>;
}

/// Frame supplier: a cropped buffer for OCR and a separate full frame for
/// pixel color detection. Either may be unavailable at any given moment.
pub trait FrameSource {
    fn cropped_frame(&mut self) -> Option<OwnedImage>;
    fn full_frame(&mut self) -> Option<OwnedImage>;
}
