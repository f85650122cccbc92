//! Frame encoding and decoding for the panel protocol.
//!
//! Frame format:
//! - HEADER (2 bytes): 0x5A 0xA5 synchronization word
//! - LENGTH (1 byte): number of bytes from COMMAND to the end of PAYLOAD
//! - COMMAND (1 byte): see [`Command`]
//! - PAYLOAD (LENGTH - 1 bytes): command-specific data, big-endian words
//!
//! A [`Frame`] is a fixed-size buffer. Outbound frames are built with
//! [`Frame::begin`] and the `push_*` methods; inbound frames come from
//! [`Frame::try_receive`] or [`Frame::from_bytes`] and are consumed front
//! to back with the `read_*` methods. Neither direction ever panics: writes
//! past the buffer and reads past the declared length are recorded as a
//! [`FrameError`] on the frame and degrade to truncation or zero values.

use touchlink_hal::SerialLink;

use crate::address::{Register, Variable};
use crate::command::Command;

/// Frame synchronization word
pub const HEADER: [u8; 2] = [0x5A, 0xA5];

/// Maximum complete frame size (HEADER + LENGTH + COMMAND + PAYLOAD)
pub const MAX_FRAME_SIZE: usize = 64;

/// Bytes preceding the part counted by LENGTH
pub const PREFIX_LEN: usize = 3;

/// Offset of the first payload byte
pub const PAYLOAD_OFFSET: usize = 4;

/// Largest LENGTH value that fits the buffer
pub const MAX_LENGTH: usize = MAX_FRAME_SIZE - PREFIX_LEN;

/// Maximum payload bytes in one frame
pub const MAX_PAYLOAD_SIZE: usize = MAX_FRAME_SIZE - PAYLOAD_OFFSET;

/// Default number of polls while completing a started frame
pub const DEFAULT_SPIN_LIMIT: u32 = 10_000;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Fewer than three bytes buffered; nothing consumed
    NotReady,
    /// First byte was not a header byte; that one byte was consumed
    BadHeader,
    /// LENGTH is zero or claims more than the buffer holds
    InvalidLength,
    /// A started frame did not complete within the spin limit
    Timeout,
    /// Append past the end of the buffer; the write was truncated
    Overflow,
    /// Read past the declared length; a zero value was returned
    Underrun,
}

/// A parsed or constructed frame
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    buf: [u8; MAX_FRAME_SIZE],
    /// Read position for inbound frames
    cursor: usize,
    /// First codec error recorded on this frame
    error: Option<FrameError>,
}

impl core::fmt::Debug for Frame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Frame")
            .field("bytes", &self.as_bytes())
            .field("cursor", &self.cursor)
            .field("error", &self.error)
            .finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Frame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Frame {=[u8]:x}", self.as_bytes());
    }
}

impl Frame {
    /// Start an outbound frame for `command`
    ///
    /// LENGTH starts at 1 (the command byte alone).
    pub fn begin(command: Command) -> Self {
        let mut buf = [0u8; MAX_FRAME_SIZE];
        buf[0] = HEADER[0];
        buf[1] = HEADER[1];
        buf[2] = 1;
        buf[3] = command.to_byte();
        Self {
            buf,
            cursor: PAYLOAD_OFFSET,
            error: None,
        }
    }

    /// Declared LENGTH byte
    pub fn length(&self) -> u8 {
        self.buf[2]
    }

    /// Total number of bytes on the wire (PREFIX + LENGTH)
    pub fn wire_len(&self) -> usize {
        PREFIX_LEN + self.buf[2] as usize
    }

    /// Bytes as they go on the wire
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.wire_len()]
    }

    /// Raw command byte
    pub fn command_byte(&self) -> u8 {
        self.buf[3]
    }

    /// Command, if the byte is one of the known opcodes
    pub fn command(&self) -> Option<Command> {
        Command::from_byte(self.command_byte())
    }

    /// Payload bytes (everything after the command byte)
    pub fn payload(&self) -> &[u8] {
        &self.buf[PAYLOAD_OFFSET..self.wire_len()]
    }

    /// First error recorded on this frame
    pub fn error(&self) -> Option<FrameError> {
        self.error
    }

    fn record(&mut self, error: FrameError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    // ------------------------------------------------------------------
    // Outbound
    // ------------------------------------------------------------------

    /// Free payload space left in the buffer
    pub fn free(&self) -> usize {
        MAX_FRAME_SIZE - self.wire_len()
    }

    /// Append one byte
    pub fn push_u8(&mut self, byte: u8) -> &mut Self {
        if self.free() == 0 {
            warn!("frame overflow appending byte to {:#x}", self.command_byte());
            self.record(FrameError::Overflow);
            return self;
        }
        let at = self.wire_len();
        self.buf[at] = byte;
        self.buf[2] += 1;
        self
    }

    /// Append a big-endian word
    ///
    /// A word that does not fit is dropped whole rather than split.
    pub fn push_u16(&mut self, word: u16) -> &mut Self {
        if self.free() < 2 {
            warn!("frame overflow appending word to {:#x}", self.command_byte());
            self.record(FrameError::Overflow);
            return self;
        }
        let at = self.wire_len();
        self.buf[at..at + 2].copy_from_slice(&word.to_be_bytes());
        self.buf[2] += 2;
        self
    }

    /// Append raw bytes, truncating at the buffer end
    pub fn push_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        let n = bytes.len().min(self.free());
        if n < bytes.len() {
            warn!(
                "frame overflow: {} of {} bytes fit",
                n,
                bytes.len()
            );
            self.record(FrameError::Overflow);
        }
        let at = self.wire_len();
        self.buf[at..at + n].copy_from_slice(&bytes[..n]);
        self.buf[2] += n as u8;
        self
    }

    /// Write the frame to the link
    ///
    /// The frame is left untouched; build a new one to send something else.
    pub fn send<L: SerialLink + ?Sized>(&self, link: &mut L) {
        trace!("tx {} bytes cmd {:#x}", self.wire_len(), self.command_byte());
        link.write(self.as_bytes());
    }

    // ------------------------------------------------------------------
    // Inbound
    // ------------------------------------------------------------------

    /// Try to receive one frame from the link
    ///
    /// Returns [`FrameError::NotReady`] without consuming anything when
    /// fewer than three bytes are buffered. If the first byte is not the
    /// first header byte, only that byte is consumed and
    /// [`FrameError::BadHeader`] is returned, so that the caller can retry
    /// and resynchronize on the next byte. A run of first header bytes is
    /// treated as one, the last of them starting the frame. Once a header
    /// byte has been seen the rest of the frame is waited for, polling at
    /// most `spin_limit` times per byte and calling [`SerialLink::relax`]
    /// between polls.
    pub fn try_receive<L: SerialLink + ?Sized>(
        link: &mut L,
        spin_limit: u32,
    ) -> Result<Self, FrameError> {
        if link.available() < PREFIX_LEN {
            return Err(FrameError::NotReady);
        }

        let first = link.read_byte().ok_or(FrameError::NotReady)?;
        if first != HEADER[0] {
            trace!("resync: dropped {:#x}", first);
            return Err(FrameError::BadHeader);
        }
        let mut second = wait_byte(link, spin_limit)?;
        while second == HEADER[0] {
            // A repeated first header byte may start the real frame
            second = wait_byte(link, spin_limit)?;
        }
        if second != HEADER[1] {
            trace!("resync: bad second header byte {:#x}", second);
            return Err(FrameError::BadHeader);
        }

        let length = wait_byte(link, spin_limit)?;
        if length == 0 || length as usize > MAX_LENGTH {
            warn!("discarding frame with length {}", length);
            return Err(FrameError::InvalidLength);
        }

        let mut frame = Self {
            buf: [0u8; MAX_FRAME_SIZE],
            cursor: PAYLOAD_OFFSET,
            error: None,
        };
        frame.buf[0] = HEADER[0];
        frame.buf[1] = HEADER[1];
        frame.buf[2] = length;
        for slot in frame.buf[PREFIX_LEN..PREFIX_LEN + length as usize].iter_mut() {
            *slot = wait_byte(link, spin_limit)?;
        }

        trace!("rx frame cmd {:#x} len {}", frame.command_byte(), length);
        Ok(frame)
    }

    /// Parse a complete frame from a byte slice
    ///
    /// Bytes beyond the declared length are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < PREFIX_LEN {
            return Err(FrameError::NotReady);
        }
        if bytes[..2] != HEADER {
            return Err(FrameError::BadHeader);
        }
        let length = bytes[2] as usize;
        if length == 0 || length > MAX_LENGTH {
            return Err(FrameError::InvalidLength);
        }
        if bytes.len() < PREFIX_LEN + length {
            return Err(FrameError::Timeout);
        }

        let mut buf = [0u8; MAX_FRAME_SIZE];
        buf[..PREFIX_LEN + length].copy_from_slice(&bytes[..PREFIX_LEN + length]);
        Ok(Self {
            buf,
            cursor: PAYLOAD_OFFSET,
            error: None,
        })
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.wire_len().saturating_sub(self.cursor)
    }

    /// Move the read cursor back to the first payload byte
    pub fn rewind(&mut self) {
        self.cursor = PAYLOAD_OFFSET;
    }

    /// Unread payload bytes
    pub fn rest(&self) -> &[u8] {
        let end = self.wire_len();
        &self.buf[self.cursor.min(end)..end]
    }

    /// Read one byte, or 0 past the end
    pub fn read_u8(&mut self) -> u8 {
        if self.remaining() < 1 {
            warn!("frame underrun reading byte at {}", self.cursor);
            self.record(FrameError::Underrun);
            return 0;
        }
        let byte = self.buf[self.cursor];
        self.cursor += 1;
        byte
    }

    /// Read a big-endian word, or 0 past the end
    pub fn read_u16(&mut self) -> u16 {
        if self.remaining() < 2 {
            warn!("frame underrun reading word at {}", self.cursor);
            self.record(FrameError::Underrun);
            self.cursor = self.wire_len();
            return 0;
        }
        let word = u16::from_be_bytes([self.buf[self.cursor], self.buf[self.cursor + 1]]);
        self.cursor += 2;
        word
    }

    /// Read a register address
    pub fn read_register(&mut self) -> Register {
        Register(self.read_u8())
    }

    /// Read a variable address
    pub fn read_variable(&mut self) -> Variable {
        Variable(self.read_u16())
    }
}

/// Poll for one byte, relaxing between polls
fn wait_byte<L: SerialLink + ?Sized>(link: &mut L, spin_limit: u32) -> Result<u8, FrameError> {
    let mut spins = 0;
    loop {
        if let Some(byte) = link.read_byte() {
            return Ok(byte);
        }
        if spins >= spin_limit {
            warn!("frame incomplete after {} polls", spins);
            return Err(FrameError::Timeout);
        }
        spins += 1;
        link.relax();
    }
}
