use image::GrayImage;

use crate::common::BoundingRect;

/// One code located by a [`CodeScanner`], before timestamping and
/// payload filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub text: String,
    pub symbology: String,
    pub rect: BoundingRect,
    pub polygon: Vec<[i32; 2]>,
}

/// Code localization capability.
///
/// The pipeline hands the scanner a grayscale rendering of each frame
/// (and possibly a binarized derivative) and treats whatever comes back
/// as opaque located symbols. Implementations must tolerate images with
/// no codes in them; a scan is not an error.
pub trait CodeScanner: Send + Sync {
    fn scan(&self, image: &GrayImage) -> Vec<Symbol>;
}

/// QR scanner backed by `rqrr`.
#[derive(Debug, Default, Clone, Copy)]
pub struct QrScanner;

impl CodeScanner for QrScanner {
    fn scan(&self, image: &GrayImage) -> Vec<Symbol> {
        let width = image.width() as usize;
        let height = image.height() as usize;
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(width, height, |x, y| {
            image.get_pixel(x as u32, y as u32)[0]
        });

        let mut symbols = Vec::new();
        for grid in prepared.detect_grids() {
            match grid.decode() {
                Ok((_meta, text)) => {
                    let polygon: Vec<[i32; 2]> =
                        grid.bounds.iter().map(|point| [point.x, point.y]).collect();
                    symbols.push(Symbol {
                        text,
                        symbology: "QRCODE".to_string(),
                        rect: BoundingRect::enclosing(&polygon),
                        polygon,
                    });
                }
                Err(err) => log::debug!("located a grid but could not decode it: {err}"),
            }
        }
        symbols
    }
}
