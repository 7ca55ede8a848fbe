use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::buffer::FrameBuffer;
use crate::common::epoch_seconds;
use crate::detect::Detector;
use crate::hub::ClientHub;
use crate::wire::{self, QrResultsPayload, WireMessage};

/// Sole consumer of the frame buffer.
///
/// Pulls frames, runs detection on a blocking-capable thread, and
/// broadcasts non-empty batches. Runs until the running flag clears;
/// per-frame failures are logged and the loop moves on to the next
/// frame rather than terminating.
pub(crate) async fn detection_loop(
    buffer: Arc<FrameBuffer>,
    hub: Arc<ClientHub>,
    detector: Arc<Detector>,
    running: Arc<AtomicBool>,
    poll_interval: Duration,
) {
    log::info!("detection loop started");
    while running.load(Ordering::Relaxed) {
        let Some(frame) = buffer.try_pop() else {
            tokio::time::sleep(poll_interval).await;
            continue;
        };

        let frame_detector = detector.clone();
        let result = tokio::task::spawn_blocking(move || frame_detector.detect(&frame)).await;
        let batch = match result {
            Ok(Ok(batch)) => batch,
            Ok(Err(err)) => {
                log::error!("skipping frame: {err}");
                continue;
            }
            Err(err) => {
                log::error!("detection task failed: {err}");
                continue;
            }
        };

        if batch.is_empty() {
            continue;
        }

        let message = WireMessage::QrResults(QrResultsPayload {
            data: batch,
            timestamp: epoch_seconds(),
        });
        match wire::encode(&message) {
            Ok(bytes) => {
                let delivered = hub.broadcast(bytes);
                log::info!("broadcast results to {delivered} client(s)");
            }
            Err(err) => log::error!("failed to encode results: {err}"),
        }
    }
    log::info!("detection loop stopped");
}
