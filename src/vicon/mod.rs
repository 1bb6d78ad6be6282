//! Vicon tracker UDP object stream.
//!
//! The Vicon Tracker "UDP object stream" sends one datagram per capture frame.
//! Each datagram holds a small header followed by fixed-size item blocks, one
//! per rigid body:
//!
//! ```text
//! ┌──────────────┬───────────────┬────────────────────────────────────────────┐
//! │ FrameNumber  │ ItemsInBlock  │ Item 0 │ Item 1 │ ...                       │
//! │ u32 LE (4)   │ u8 (1)        │ 75 bytes each                              │
//! └──────────────┴───────────────┴────────────────────────────────────────────┘
//!
//! Item: ItemID u8 │ ItemDataSize u16 LE │ Name [u8; 24] │ TransX..RotZ 6 × f64 LE
//! ```

mod frame;
mod pose;

pub use frame::{
    BLOCK_HEADER_LEN, DecodeError, DecodeMode, DecodedFrame, FRAME_HEADER_LEN, FrameDecoder,
    FrameEncoder, ITEM_LEN, MAX_DATAGRAM_SIZE, OBJECT_ITEM_DATA_SIZE, OBJECT_ITEM_ID,
};
pub use pose::BodyPose;
