use image::GrayImage;
use imageproc::contrast::{otsu_level, threshold, ThresholdType};

use crate::common::{epoch_seconds, QrDetection};
use crate::detect::{CodeScanner, Symbol};
use crate::error::Result;

/// Sigma of the Gaussian blur applied before Otsu binarization.
const BLUR_SIGMA: f32 = 1.5;

/// Turns raw encoded image bytes into a batch of detections.
///
/// The scan runs against the plain grayscale rendering first; the
/// blurred, Otsu-thresholded variant is consulted only when the first
/// pass finds nothing. Codes whose payload is blank after trimming are
/// discarded. Repeated detections of one code across frames are all
/// reported.
pub struct Detector {
    scanner: Box<dyn CodeScanner>,
}

impl Detector {
    pub fn new(scanner: Box<dyn CodeScanner>) -> Self {
        Self { scanner }
    }

    /// Decodes one frame and scans it for codes.
    ///
    /// Every detection in the batch carries the same timestamp. An
    /// undecodable image is an error for the caller to log and skip;
    /// partial results are never returned alongside one.
    pub fn detect(&self, data: &[u8]) -> Result<Vec<QrDetection>> {
        let image = image::load_from_memory(data)?;
        let gray = image.to_luma8();
        log::debug!("processing {}x{} frame", gray.width(), gray.height());

        let mut symbols = self.scanner.scan(&gray);
        if symbols.is_empty() {
            symbols = self.scanner.scan(&binarize(&gray));
        }

        let detected_at = epoch_seconds();
        let batch: Vec<QrDetection> = symbols
            .into_iter()
            .filter_map(|symbol| finish(symbol, detected_at))
            .collect();
        if !batch.is_empty() {
            log::info!("found {} code(s) in frame", batch.len());
        }
        Ok(batch)
    }
}

/// Blurred Otsu threshold of the grayscale frame.
fn binarize(gray: &GrayImage) -> GrayImage {
    let blurred = image::imageops::blur(gray, BLUR_SIGMA);
    let level = otsu_level(&blurred);
    threshold(&blurred, level, ThresholdType::Binary)
}

fn finish(symbol: Symbol, detected_at: f64) -> Option<QrDetection> {
    let text = symbol.text.trim();
    if text.is_empty() {
        return None;
    }
    log::info!("detected code: {text}");
    Some(QrDetection {
        text: text.to_string(),
        symbology: symbol.symbology,
        rect: symbol.rect,
        polygon: symbol.polygon,
        timestamp: detected_at,
    })
}
