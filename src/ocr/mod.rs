//! Image enhancement and external OCR.

pub mod engine;
pub mod preprocess;
pub mod setup;

pub use engine::OcrInvoker;
pub use preprocess::ImagePreprocessor;
pub use setup::find_tesseract_executable;
