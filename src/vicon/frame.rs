//! Decoder and encoder for Vicon object-stream datagrams.
//!
//! # Pattern
//!
//! ```ignore
//! let decoder = FrameDecoder::new(DecodeMode::Strict);
//! let frame = decoder.decode(&datagram)?;     // first item only
//! let poses = decoder.decode_items(&datagram)?; // every item that fits
//! ```

use thiserror::Error;

use super::pose::BodyPose;

/// Maximum datagram size read from the socket.
pub const MAX_DATAGRAM_SIZE: usize = 1024;

/// Bytes of a datagram considered by [`FrameDecoder::decode`].
///
/// Covers the frame header plus room for two item blocks.
pub const FRAME_HEADER_LEN: usize = 160;

/// Frame header: FrameNumber (4) + ItemsInBlock (1).
pub const BLOCK_HEADER_LEN: usize = 5;

/// One item block: ItemID (1) + ItemDataSize (2) + payload (72).
pub const ITEM_LEN: usize = 3 + OBJECT_ITEM_DATA_SIZE as usize;

/// ItemID carried by rigid-body object items.
pub const OBJECT_ITEM_ID: u8 = 0;

/// Payload size of an object item: 24 name bytes + 6 doubles.
pub const OBJECT_ITEM_DATA_SIZE: u16 = 72;

const NAME_OFFSET: usize = 3;
const NAME_LEN: usize = 24;
const DATA_OFFSET: usize = NAME_OFFSET + NAME_LEN;

/// Decode failures. All of them are recoverable: the datagram is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("datagram truncated: {len} bytes, need at least {}", FRAME_HEADER_LEN)]
    Truncated { len: usize },

    #[error("schema mismatch in {field}: expected {expected}, got {actual}")]
    SchemaMismatch {
        field: &'static str,
        expected: u32,
        actual: u32,
    },
}

/// How strictly the item header is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Validate ItemsInBlock, ItemID and ItemDataSize.
    #[default]
    Strict,
    /// Accept any correctly sized buffer as-is. Misaligned data decodes to
    /// garbage poses without an error.
    Lenient,
}

/// One decoded datagram (first item only).
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFrame {
    /// Capture frame number. Parsed but not used for ordering.
    pub frame_number: u32,
    pub items_in_block: u8,
    pub item_id: u8,
    pub item_data_size: u16,
    pub pose: BodyPose,
}

/// Item header fields that precede each pose.
#[derive(Debug, Clone, Copy)]
struct ItemHeader {
    id: u8,
    data_size: u16,
}

/// Stateless datagram decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameDecoder {
    mode: DecodeMode,
}

impl FrameDecoder {
    pub fn new(mode: DecodeMode) -> Self {
        Self { mode }
    }

    /// Decode the first item of a datagram.
    ///
    /// Only the first [`FRAME_HEADER_LEN`] bytes are read; shorter input is
    /// rejected with [`DecodeError::Truncated`].
    pub fn decode(&self, buffer: &[u8]) -> Result<DecodedFrame, DecodeError> {
        if buffer.len() < FRAME_HEADER_LEN {
            return Err(DecodeError::Truncated { len: buffer.len() });
        }
        let frame = &buffer[..FRAME_HEADER_LEN];

        let frame_number = u32::from_le_bytes([frame[0], frame[1], frame[2], frame[3]]);
        let items_in_block = frame[4];
        let (header, pose) = parse_item(&frame[BLOCK_HEADER_LEN..BLOCK_HEADER_LEN + ITEM_LEN]);

        if self.mode == DecodeMode::Strict {
            if items_in_block == 0 {
                return Err(DecodeError::SchemaMismatch {
                    field: "items_in_block",
                    expected: 1,
                    actual: 0,
                });
            }
            validate_header(&header)?;
        }

        Ok(DecodedFrame {
            frame_number,
            items_in_block,
            item_id: header.id,
            item_data_size: header.data_size,
            pose,
        })
    }

    /// Decode every item block announced by ItemsInBlock that fits inside
    /// the datagram.
    ///
    /// The first item follows [`decode`](Self::decode) exactly. Later items
    /// stop at the first block that is cut short or, in strict mode, whose
    /// header does not describe an object.
    pub fn decode_items(&self, buffer: &[u8]) -> Result<Vec<BodyPose>, DecodeError> {
        let first = self.decode(buffer)?;
        let count = usize::from(first.items_in_block).max(1);
        let mut poses = Vec::with_capacity(count);
        poses.push(first.pose);

        for index in 1..count {
            let start = BLOCK_HEADER_LEN + index * ITEM_LEN;
            let end = start + ITEM_LEN;
            if end > buffer.len() {
                tracing::trace!(
                    "Item {} of {} does not fit in {} byte datagram",
                    index,
                    count,
                    buffer.len()
                );
                break;
            }

            let (header, pose) = parse_item(&buffer[start..end]);
            if self.mode == DecodeMode::Strict && validate_header(&header).is_err() {
                tracing::debug!(
                    "Stopping at item {}: id={} size={}",
                    index,
                    header.id,
                    header.data_size
                );
                break;
            }
            poses.push(pose);
        }

        Ok(poses)
    }
}

fn validate_header(header: &ItemHeader) -> Result<(), DecodeError> {
    if header.id != OBJECT_ITEM_ID {
        return Err(DecodeError::SchemaMismatch {
            field: "item_id",
            expected: OBJECT_ITEM_ID.into(),
            actual: header.id.into(),
        });
    }
    if header.data_size != OBJECT_ITEM_DATA_SIZE {
        return Err(DecodeError::SchemaMismatch {
            field: "item_data_size",
            expected: OBJECT_ITEM_DATA_SIZE.into(),
            actual: header.data_size.into(),
        });
    }
    Ok(())
}

/// Parse one item block. `item` must be exactly [`ITEM_LEN`] bytes.
fn parse_item(item: &[u8]) -> (ItemHeader, BodyPose) {
    let header = ItemHeader {
        id: item[0],
        data_size: u16::from_le_bytes([item[1], item[2]]),
    };

    let pose = BodyPose {
        name: printable_name(&item[NAME_OFFSET..NAME_OFFSET + NAME_LEN]),
        pos_x: read_f64(item, DATA_OFFSET),
        pos_y: read_f64(item, DATA_OFFSET + 8),
        pos_z: read_f64(item, DATA_OFFSET + 16),
        rot_x: read_f64(item, DATA_OFFSET + 24),
        rot_y: read_f64(item, DATA_OFFSET + 32),
        rot_z: read_f64(item, DATA_OFFSET + 40),
    };

    (header, pose)
}

/// Keep bytes in `'!'..='~'`; anything else (NUL padding, spaces) is dropped.
fn printable_name(raw: &[u8]) -> String {
    raw.iter()
        .filter(|b| (b'!'..=b'~').contains(*b))
        .map(|&b| char::from(b))
        .collect()
}

#[inline]
fn read_f64(buf: &[u8], offset: usize) -> f64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[offset..offset + 8]);
    f64::from_le_bytes(bytes)
}

/// Builds wire-format datagrams, zero-padded to at least [`FRAME_HEADER_LEN`].
///
/// Names longer than 24 bytes are cut.
pub struct FrameEncoder {
    data: Vec<u8>,
    items: u8,
}

impl FrameEncoder {
    pub fn new(frame_number: u32) -> Self {
        let mut data = Vec::with_capacity(FRAME_HEADER_LEN);
        data.extend_from_slice(&frame_number.to_le_bytes());
        data.push(0);
        Self { data, items: 0 }
    }

    /// Append an object item for `pose`.
    pub fn push(&mut self, pose: &BodyPose) -> &mut Self {
        self.push_raw(OBJECT_ITEM_ID, OBJECT_ITEM_DATA_SIZE, pose)
    }

    /// Append an item with arbitrary header values.
    pub fn push_raw(&mut self, item_id: u8, data_size: u16, pose: &BodyPose) -> &mut Self {
        self.data.push(item_id);
        self.data.extend_from_slice(&data_size.to_le_bytes());

        let mut name = [0u8; NAME_LEN];
        let bytes = pose.name.as_bytes();
        let n = bytes.len().min(NAME_LEN);
        name[..n].copy_from_slice(&bytes[..n]);
        self.data.extend_from_slice(&name);

        for value in pose.position().iter().chain(pose.rotation().iter()) {
            self.data.extend_from_slice(&value.to_le_bytes());
        }

        self.items = self.items.saturating_add(1);
        self.data[4] = self.items;
        self
    }

    /// Finish the datagram.
    pub fn finish(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if out.len() < FRAME_HEADER_LEN {
            out.resize(FRAME_HEADER_LEN, 0);
        }
        out
    }

    /// Single-body datagram.
    pub fn single(frame_number: u32, pose: &BodyPose) -> Vec<u8> {
        Self::new(frame_number).push(pose).finish()
    }
}
