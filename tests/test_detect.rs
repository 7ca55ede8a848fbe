use image::GrayImage;

use qr_relay::common::BoundingRect;
use qr_relay::detect::{CodeScanner, Detector, QrScanner, Symbol};

mod support;

#[test]
fn decodes_a_generated_qr_image() {
    let detector = Detector::new(Box::new(QrScanner));

    let batch = detector.detect(&support::qr_png("HELLO")).unwrap();
    assert_eq!(batch.len(), 1);

    let detection = &batch[0];
    assert_eq!(detection.text, "HELLO");
    assert_eq!(detection.symbology, "QRCODE");
    assert_eq!(detection.polygon.len(), 4);
    assert!(detection.rect.width > 0 && detection.rect.height > 0);
    assert!(detection.timestamp > 0.0);
}

#[test]
fn blank_image_yields_an_empty_batch() {
    let detector = Detector::new(Box::new(QrScanner));
    let batch = detector.detect(&support::blank_png()).unwrap();
    assert!(batch.is_empty());
}

#[test]
fn undecodable_bytes_are_an_error() {
    let detector = Detector::new(Box::new(QrScanner));
    assert!(detector.detect(b"definitely not an image").is_err());
}

#[test]
fn whitespace_only_payloads_are_dropped() {
    struct BlankTextScanner;
    impl CodeScanner for BlankTextScanner {
        fn scan(&self, _image: &GrayImage) -> Vec<Symbol> {
            vec![Symbol {
                text: "   \n".to_string(),
                symbology: "QRCODE".to_string(),
                rect: BoundingRect::default(),
                polygon: Vec::new(),
            }]
        }
    }

    let detector = Detector::new(Box::new(BlankTextScanner));
    let batch = detector.detect(&support::qr_png("ignored")).unwrap();
    assert!(batch.is_empty());
}

#[test]
fn batch_shares_a_single_timestamp() {
    struct TwoSymbolScanner;
    impl CodeScanner for TwoSymbolScanner {
        fn scan(&self, _image: &GrayImage) -> Vec<Symbol> {
            ["first", "second"]
                .into_iter()
                .map(|text| Symbol {
                    text: text.to_string(),
                    symbology: "QRCODE".to_string(),
                    rect: BoundingRect::new(0, 0, 10, 10),
                    polygon: vec![[0, 0], [10, 0], [10, 10], [0, 10]],
                })
                .collect()
        }
    }

    let detector = Detector::new(Box::new(TwoSymbolScanner));
    let batch = detector.detect(&support::blank_png()).unwrap();
    assert_eq!(batch.len(), 2);
    assert_eq!(batch[0].timestamp, batch[1].timestamp);
}

#[test]
fn payload_text_is_trimmed() {
    struct PaddedTextScanner;
    impl CodeScanner for PaddedTextScanner {
        fn scan(&self, _image: &GrayImage) -> Vec<Symbol> {
            vec![Symbol {
                text: "  HELLO  ".to_string(),
                symbology: "QRCODE".to_string(),
                rect: BoundingRect::default(),
                polygon: Vec::new(),
            }]
        }
    }

    let detector = Detector::new(Box::new(PaddedTextScanner));
    let batch = detector.detect(&support::blank_png()).unwrap();
    assert_eq!(batch[0].text, "HELLO");
}
