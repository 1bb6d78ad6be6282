//! UDP ingest for the Vicon object stream.
//!
//! Polling primitive: each [`UdpIngest::poll_once`] waits at most the poll
//! timeout for one datagram, decodes it and pushes the result into the
//! [`TrackerState`]. Callers run it inside their own loop.
//!
//! # Example
//!
//! ```ignore
//! let mut ingest = UdpIngest::bind("0.0.0.0:51001", Duration::from_millis(1), DecodeMode::Strict)?;
//! let mut state = TrackerState::new("CF01");
//!
//! loop {
//!     match ingest.poll_once(&mut state)? {
//!         PollResult::Decoded(pose) => println!("{}: x={}", pose.name, pose.pos_x),
//!         PollResult::NoData | PollResult::Skipped(_) => {}
//!     }
//! }
//! ```

use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use crate::error::{Result, ShuttleError};
use crate::tracking::TrackerState;
use crate::vicon::{BodyPose, DecodeError, DecodeMode, FrameDecoder, MAX_DATAGRAM_SIZE};

/// Outcome of one poll.
#[derive(Debug, Clone, PartialEq)]
pub enum PollResult {
    /// Nothing arrived within the poll timeout.
    NoData,
    /// A datagram was decoded; carries the first item's pose.
    Decoded(BodyPose),
    /// A datagram arrived but was dropped. Prior state is kept.
    Skipped(DecodeError),
}

/// Bound Vicon socket plus decoder.
pub struct UdpIngest {
    socket: UdpSocket,
    decoder: FrameDecoder,
    buffer: [u8; MAX_DATAGRAM_SIZE],
    frames_decoded: u64,
    frames_skipped: u64,
}

impl UdpIngest {
    /// Bind a new socket at `addr`.
    pub fn bind(addr: &str, poll_timeout: Duration, mode: DecodeMode) -> Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        let ingest = Self::from_socket(socket, poll_timeout, mode)?;
        tracing::info!("Vicon UDP ingest bound to {}", ingest.local_addr()?);
        Ok(ingest)
    }

    /// Wrap an already bound socket.
    ///
    /// A zero `poll_timeout` makes the socket fully non-blocking.
    pub fn from_socket(socket: UdpSocket, poll_timeout: Duration, mode: DecodeMode) -> Result<Self> {
        if poll_timeout.is_zero() {
            socket.set_nonblocking(true)?;
        } else {
            socket.set_nonblocking(false)?;
            socket.set_read_timeout(Some(poll_timeout))?;
        }

        Ok(Self {
            socket,
            decoder: FrameDecoder::new(mode),
            buffer: [0u8; MAX_DATAGRAM_SIZE],
            frames_decoded: 0,
            frames_skipped: 0,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.socket.local_addr()?)
    }

    /// Wait up to the poll timeout for one datagram and apply it to `state`.
    ///
    /// Socket failures are returned as [`ShuttleError::Socket`] and end the
    /// ingest path; decode failures only skip the datagram.
    pub fn poll_once(&mut self, state: &mut TrackerState) -> Result<PollResult> {
        let len = match self.socket.recv_from(&mut self.buffer) {
            Ok((len, src)) => {
                tracing::trace!("Received {} bytes from {}", len, src);
                len
            }
            Err(e)
                if matches!(
                    e.kind(),
                    ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted
                ) =>
            {
                return Ok(PollResult::NoData);
            }
            Err(e) => {
                tracing::error!("Vicon socket error: {}", e);
                return Err(ShuttleError::Socket(e));
            }
        };

        let datagram = &self.buffer[..len];
        let frame = match self.decoder.decode(datagram) {
            Ok(frame) => frame,
            Err(e) => {
                self.frames_skipped += 1;
                tracing::warn!("Dropping datagram: {}", e);
                return Ok(PollResult::Skipped(e));
            }
        };

        self.frames_decoded += 1;
        tracing::trace!(
            "Frame {}: {} item(s), first id={} size={}",
            frame.frame_number,
            frame.items_in_block,
            frame.item_id,
            frame.item_data_size
        );
        state.set_frame_number(frame.frame_number);

        let first = frame.pose.clone();
        state.apply(frame.pose);

        if frame.items_in_block > 1
            && let Ok(poses) = self.decoder.decode_items(datagram)
        {
            for pose in poses.into_iter().skip(1) {
                state.apply_secondary(pose);
            }
        }

        Ok(PollResult::Decoded(first))
    }

    /// Datagrams decoded so far.
    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    /// Datagrams dropped by the decoder so far.
    pub fn frames_skipped(&self) -> u64 {
        self.frames_skipped
    }
}
