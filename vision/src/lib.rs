mod image;
pub use image::*;
mod color;
pub use color::detect_color;
mod ocr;
pub use ocr::*;
