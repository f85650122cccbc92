//! Panel link
//!
//! Owns the serial link to the touchscreen, sends outbound frames and
//! receives inbound ones. Codec errors recorded on outbound frames are
//! counted here; nothing is retried.

use touchlink_hal::SerialLink;
use touchlink_protocol::{Frame, FrameError, Register, Variable};

use crate::nav::Page;

/// Serial connection to the panel
pub struct Panel<L: SerialLink> {
    link: L,
    spin_limit: u32,
    codec_errors: u32,
    version: Option<u8>,
}

impl<L: SerialLink> Panel<L> {
    pub fn new(link: L, spin_limit: u32) -> Self {
        Self {
            link,
            spin_limit,
            codec_errors: 0,
            version: None,
        }
    }

    /// Transmit `frame`
    ///
    /// A frame that overflowed while being built is still sent, truncated.
    pub fn send(&mut self, frame: &Frame) {
        if let Some(e) = frame.error() {
            self.codec_errors = self.codec_errors.wrapping_add(1);
            warn!("sending frame with codec error {:?}", e);
        }
        frame.send(&mut self.link);
    }

    /// Switch the panel to `page`
    pub fn show_page(&mut self, page: Page) {
        debug!("show page {}", page.id);
        self.send(&Frame::write_register(Register::PAGE, &[0x00, page.id]));
    }

    /// Write `words` to consecutive variables starting at `variable`
    pub fn write_words(&mut self, variable: Variable, words: &[u16]) {
        self.send(&Frame::write_variables(variable, words));
    }

    /// Write text into a variable field
    pub fn write_text(&mut self, variable: Variable, text: &str, field_len: usize) {
        self.send(&Frame::write_text(variable, text, field_len));
    }

    /// Write raw register bytes starting at `register`
    pub fn write_register(&mut self, register: Register, data: &[u8]) {
        self.send(&Frame::write_register(register, data));
    }

    /// Ask the panel for its firmware version
    pub fn request_version(&mut self) {
        self.send(&Frame::request_register(Register::VERSION, 1));
    }

    /// Try to receive one inbound frame
    ///
    /// See [`Frame::try_receive`] for the consumption rules.
    pub fn poll(&mut self) -> Result<Frame, FrameError> {
        Frame::try_receive(&mut self.link, self.spin_limit)
    }

    /// Version reported by the panel, once it answered
    pub fn version(&self) -> Option<u8> {
        self.version
    }

    pub fn set_version(&mut self, version: u8) {
        info!("panel version {}", version);
        self.version = Some(version);
    }

    /// Outbound frames sent with a recorded codec error
    pub fn codec_errors(&self) -> u32 {
        self.codec_errors
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }
}
