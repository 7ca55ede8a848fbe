//! Shared helpers for the integration tests.

#![allow(dead_code)]

use image::{DynamicImage, GrayImage, Luma};
use qrcode::{Color, QrCode};

use qr_relay::common::BoundingRect;
use qr_relay::detect::{CodeScanner, Symbol};

/// Pixels per QR module in rendered test images.
const MODULE_PX: u32 = 8;
/// Quiet zone around the code, in modules.
const QUIET_ZONE: u32 = 4;

/// Renders `payload` as a grayscale QR image large enough to scan back.
pub fn qr_image(payload: &str) -> GrayImage {
    let code = QrCode::new(payload.as_bytes()).expect("payload fits a QR code");
    let modules = code.width() as u32;
    let colors = code.to_colors();
    let size = (modules + 2 * QUIET_ZONE) * MODULE_PX;
    GrayImage::from_fn(size, size, |x, y| {
        let mx = x / MODULE_PX;
        let my = y / MODULE_PX;
        if mx < QUIET_ZONE
            || my < QUIET_ZONE
            || mx >= QUIET_ZONE + modules
            || my >= QUIET_ZONE + modules
        {
            return Luma([255]);
        }
        let index = ((my - QUIET_ZONE) * modules + (mx - QUIET_ZONE)) as usize;
        match colors[index] {
            Color::Dark => Luma([0]),
            Color::Light => Luma([255]),
        }
    })
}

/// The same image as PNG bytes, as a client would submit it.
pub fn qr_png(payload: &str) -> Vec<u8> {
    png_bytes(&qr_image(payload))
}

/// A solid white frame with nothing to detect.
pub fn blank_png() -> Vec<u8> {
    png_bytes(&GrayImage::from_pixel(64, 64, Luma([255])))
}

pub fn png_bytes(image: &GrayImage) -> Vec<u8> {
    let mut bytes = std::io::Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(image.clone())
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("png encoding");
    bytes.into_inner()
}

/// Deterministic stand-in for the external scanner: reports a `HELLO`
/// code for any image with visible structure (both dark and light
/// pixels), nothing for uniform ones.
pub struct HelloScanner;

impl CodeScanner for HelloScanner {
    fn scan(&self, image: &GrayImage) -> Vec<Symbol> {
        let has_dark = image.pixels().any(|p| p[0] < 128);
        let has_light = image.pixels().any(|p| p[0] >= 128);
        if !(has_dark && has_light) {
            return Vec::new();
        }
        let width = image.width() as i32;
        let height = image.height() as i32;
        vec![Symbol {
            text: "HELLO".to_string(),
            symbology: "QRCODE".to_string(),
            rect: BoundingRect::new(0, 0, width, height),
            polygon: vec![[0, 0], [width, 0], [width, height], [0, height]],
        }]
    }
}
