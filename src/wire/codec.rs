use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};
use crate::wire::{WireMessage, TAG_FRAME, TAG_QR_RESULTS};

/// Ceiling on one message body (tag + payload). Anything above this is
/// stream corruption, not a large frame.
pub const MAX_MESSAGE_LEN: usize = 16 * 1024 * 1024;

const LEN_PREFIX: usize = 4;

/// Encodes one message as a self-contained `[len][tag][payload]`
/// envelope, independent of any other message.
pub fn encode(message: &WireMessage) -> Result<Bytes> {
    let payload = match message {
        WireMessage::Frame(frame) => postcard::to_stdvec(frame)?,
        WireMessage::QrResults(results) => postcard::to_stdvec(results)?,
    };
    let body_len = payload.len() + 1;
    if body_len > MAX_MESSAGE_LEN {
        return Err(Error::OversizedMessage {
            len: body_len,
            max: MAX_MESSAGE_LEN,
        });
    }

    let mut buf = BytesMut::with_capacity(LEN_PREFIX + body_len);
    buf.put_u32_le(body_len as u32);
    buf.put_u8(message.tag());
    buf.put_slice(&payload);
    Ok(buf.freeze())
}

/// Incremental decoder for one connection's byte stream.
///
/// Bytes arrive in whatever chunks the transport produces; `feed`
/// accumulates them and [`next_message`](Self::next_message) yields each
/// message as soon as it is complete, retaining any partial remainder.
/// Never waits for more input.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    buf: BytesMut,
}

impl StreamDecoder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Next complete message, or `None` until more bytes arrive.
    ///
    /// Envelopes with an unknown tag are skipped with a warning. A zero
    /// or oversized length means the stream is corrupt; the connection
    /// owning this decoder must be dropped.
    pub fn next_message(&mut self) -> Result<Option<WireMessage>> {
        loop {
            if self.buf.len() < LEN_PREFIX {
                return Ok(None);
            }
            let mut len_bytes = [0u8; LEN_PREFIX];
            len_bytes.copy_from_slice(&self.buf[..LEN_PREFIX]);
            let body_len = u32::from_le_bytes(len_bytes) as usize;
            if body_len == 0 {
                return Err(Error::EmptyMessage);
            }
            if body_len > MAX_MESSAGE_LEN {
                return Err(Error::OversizedMessage {
                    len: body_len,
                    max: MAX_MESSAGE_LEN,
                });
            }
            if self.buf.len() < LEN_PREFIX + body_len {
                return Ok(None);
            }

            let body = self.buf.split_to(LEN_PREFIX + body_len).freeze();
            let tag = body[LEN_PREFIX];
            let payload = &body[LEN_PREFIX + 1..];
            match tag {
                TAG_FRAME => return Ok(Some(WireMessage::Frame(postcard::from_bytes(payload)?))),
                TAG_QR_RESULTS => {
                    return Ok(Some(WireMessage::QrResults(postcard::from_bytes(payload)?)))
                }
                other => {
                    log::warn!("ignoring message with unknown tag {other}");
                    continue;
                }
            }
        }
    }
}
