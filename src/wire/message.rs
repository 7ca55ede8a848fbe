use serde::{Deserialize, Serialize};

use crate::common::QrDetection;

/// Wire tag of an inbound camera frame.
pub const TAG_FRAME: u8 = 1;
/// Wire tag of an outbound detection batch.
pub const TAG_QR_RESULTS: u8 = 2;

/// One complete, self-contained protocol message.
#[derive(Debug, Clone, PartialEq)]
pub enum WireMessage {
    Frame(FramePayload),
    QrResults(QrResultsPayload),
}

impl WireMessage {
    pub fn tag(&self) -> u8 {
        match self {
            WireMessage::Frame(_) => TAG_FRAME,
            WireMessage::QrResults(_) => TAG_QR_RESULTS,
        }
    }
}

/// Payload of a `frame` message: one encoded still image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FramePayload {
    pub data: Vec<u8>,
}

/// Payload of a `qr_results` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrResultsPayload {
    pub data: Vec<QrDetection>,
    pub timestamp: f64,
}
