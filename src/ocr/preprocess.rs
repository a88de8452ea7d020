use image::{DynamicImage, GrayImage, Luma, imageops::FilterType};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{CaptureRegion, PreprocessConfig};
use crate::error::{PipelineError, PipelineResult};

/// One step of the enhancement chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Crop,
    Invert,
    Grayscale,
    Threshold,
    Resize,
    Blur,
    Sharpen,
}

/// Stages in the order they are applied.
pub const STAGES: [Stage; 7] = [
    Stage::Crop,
    Stage::Invert,
    Stage::Grayscale,
    Stage::Threshold,
    Stage::Resize,
    Stage::Blur,
    Stage::Sharpen,
];

/// Turns a raw screenshot into an image Tesseract reads reliably.
///
/// The game log is light text on a dark, semi-transparent background. The
/// chain isolates the log, flips it to dark-on-light, hard-binarizes it,
/// upscales the small glyphs and finally smooths and re-sharpens the edges.
#[derive(Clone, Debug)]
pub struct ImagePreprocessor {
    region: CaptureRegion,
    config: PreprocessConfig,
}

impl ImagePreprocessor {
    pub fn new(region: CaptureRegion, config: PreprocessConfig) -> Self {
        Self { region, config }
    }

    /// Runs the full chain on `raw_path` and returns the prepared image path.
    ///
    /// Every stage writes its result to the same `<stem>-edited.<ext>` file,
    /// so a previous run's output is simply overwritten.
    pub fn prepare(&self, raw_path: &Path) -> PipelineResult<PathBuf> {
        let prepared_path = prepared_path_for(raw_path);
        let mut img = image::open(raw_path).map_err(|e| PipelineError::capture_io(raw_path, e))?;

        for stage in STAGES {
            img = self.apply(stage, img);
            if img.width() == 0 || img.height() == 0 {
                return Err(PipelineError::capture_io(
                    raw_path,
                    format!("capture region {:?} lies outside the screenshot", self.region),
                ));
            }
            img.save(&prepared_path)
                .map_err(|e| PipelineError::capture_io(&prepared_path, e))?;
            debug!(
                "Stage {:?} -> {}x{} written to {}",
                stage,
                img.width(),
                img.height(),
                prepared_path.display()
            );
        }

        Ok(prepared_path)
    }

    /// Applies a single stage.
    pub fn apply(&self, stage: Stage, img: DynamicImage) -> DynamicImage {
        match stage {
            Stage::Crop => crop_region(&img, &self.region),
            Stage::Invert => {
                let mut img = img;
                img.invert();
                img
            }
            Stage::Grayscale => DynamicImage::ImageLuma8(img.to_luma8()),
            Stage::Threshold => {
                DynamicImage::ImageLuma8(binarize(&img.to_luma8(), self.config.threshold))
            }
            Stage::Resize => {
                let (w, h) = scaled_dimensions(img.width(), img.height(), self.config.scale_factor);
                img.resize_exact(w, h, FilterType::Lanczos3)
            }
            Stage::Blur => img.blur(self.config.blur_sigma),
            Stage::Sharpen => img.unsharpen(self.config.unsharp_sigma, self.config.unsharp_threshold),
        }
    }
}

/// Derives `<stem>-edited.<ext>` next to the raw image. Falls back to `png`
/// when the raw path carries no extension.
pub fn prepared_path_for(raw_path: &Path) -> PathBuf {
    let stem = raw_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "capture".to_string());
    let ext = raw_path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "png".to_string());

    raw_path.with_file_name(format!("{}-edited.{}", stem, ext))
}

/// Crops the capture region out of a full screenshot, clamped to the image bounds.
pub fn crop_region(img: &DynamicImage, region: &CaptureRegion) -> DynamicImage {
    let (w, h) = (img.width(), img.height());

    let x0 = region.x.min(w);
    let y0 = region.y.min(h);
    let rw = region.width.min(w - x0);
    let rh = region.height.min(h - y0);

    img.crop_imm(x0, y0, rw, rh)
}

/// Hard binarization: values strictly above `threshold` become white,
/// everything else black.
pub fn binarize(img: &GrayImage, threshold: u8) -> GrayImage {
    let (width, height) = img.dimensions();
    let mut output = GrayImage::new(width, height);

    for (x, y, pixel) in img.enumerate_pixels() {
        let value = if pixel[0] > threshold { 255u8 } else { 0u8 };
        output.put_pixel(x, y, Luma([value]));
    }

    output
}

/// Scales both dimensions by `factor`, truncating, never below one pixel.
pub fn scaled_dimensions(width: u32, height: u32, factor: f64) -> (u32, u32) {
    let w = ((width as f64 * factor) as u32).max(1);
    let h = ((height as f64 * factor) as u32).max(1);
    (w, h)
}
