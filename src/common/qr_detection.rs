use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::common::BoundingRect;

/// One located, decoded code within a single frame.
///
/// Serialized field names follow the wire protocol: the decoded payload
/// travels as `data` and the symbology name as `type`.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrDetection {
    #[serde(rename = "data")]
    pub text: String,
    #[serde(rename = "type")]
    pub symbology: String,
    pub rect: BoundingRect,
    pub polygon: Vec<[i32; 2]>,
    /// Seconds since the Unix epoch; every detection in one batch
    /// carries the same value.
    pub timestamp: f64,
}

impl QrDetection {
    pub fn new(
        text: String,
        symbology: String,
        rect: BoundingRect,
        polygon: Vec<[i32; 2]>,
        timestamp: f64,
    ) -> Self {
        Self {
            text,
            symbology,
            rect,
            polygon,
            timestamp,
        }
    }

    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Seconds since the Unix epoch, as the wire protocol's float timestamp.
pub fn epoch_seconds() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default()
}
