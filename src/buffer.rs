use std::collections::VecDeque;

use bytes::Bytes;
use parking_lot::Mutex;

/// Fixed-capacity frame queue between the connection readers and the
/// detection loop.
///
/// This is a latest-wins buffer, not a backpressure queue: a push at
/// capacity evicts the oldest frame, so producers are never slowed by a
/// slow consumer. Stale frames are discarded rather than processed.
#[derive(Debug)]
pub struct FrameBuffer {
    frames: Mutex<VecDeque<Bytes>>,
    capacity: usize,
}

impl FrameBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            frames: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Appends a frame, evicting the oldest one first when full. Never
    /// blocks and never fails.
    pub fn push(&self, frame: Bytes) {
        let mut frames = self.frames.lock();
        if frames.len() >= self.capacity && !frames.is_empty() {
            frames.pop_front();
            log::debug!("frame buffer full, dropped oldest frame");
        }
        frames.push_back(frame);
    }

    /// Removes and returns the oldest frame, if any.
    pub fn try_pop(&self) -> Option<Bytes> {
        self.frames.lock().pop_front()
    }

    pub fn len(&self) -> usize {
        self.frames.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.lock().is_empty()
    }
}
