//! Request builders and response classification
//!
//! Controller → Panel: register/variable writes and reads, curve samples.
//! Panel → Controller: write acknowledgements, register data, variable
//! data. Touch input arrives as variable data: the variable address names
//! the action (which widget fired) and the first data word is the
//! sub-event code.

use crate::address::{Register, Variable};
use crate::command::Command;
use crate::frame::Frame;

/// Payload the panel sends back after a RAM write
pub const ACK_PAYLOAD: [u8; 2] = [0x4F, 0x4B]; // "OK"

/// Terminator written after text shorter than its field
pub const TEXT_TERMINATOR: [u8; 2] = [0xFF, 0xFF];

impl Frame {
    /// Write `data` to consecutive registers starting at `register`
    pub fn write_register(register: Register, data: &[u8]) -> Self {
        let mut frame = Frame::begin(Command::WriteRegister);
        frame.push_u8(register.raw()).push_bytes(data);
        frame
    }

    /// Request `count` bytes of registers starting at `register`
    pub fn request_register(register: Register, count: u8) -> Self {
        let mut frame = Frame::begin(Command::ReadRegister);
        frame.push_u8(register.raw()).push_u8(count);
        frame
    }

    /// Write `words` to consecutive variables starting at `variable`
    pub fn write_variables(variable: Variable, words: &[u16]) -> Self {
        let mut frame = Frame::begin(Command::WriteRam);
        frame.push_u16(variable.raw());
        for &word in words {
            frame.push_u16(word);
        }
        frame
    }

    /// Write raw bytes to the variable block starting at `variable`
    pub fn write_variable_bytes(variable: Variable, bytes: &[u8]) -> Self {
        let mut frame = Frame::begin(Command::WriteRam);
        frame.push_u16(variable.raw()).push_bytes(bytes);
        frame
    }

    /// Write text into a variable field of `field_len` bytes
    ///
    /// Text longer than the field is cut; shorter text is followed by the
    /// terminator when there is room for it.
    pub fn write_text(variable: Variable, text: &str, field_len: usize) -> Self {
        let bytes = text.as_bytes();
        let n = bytes.len().min(field_len);
        let mut frame = Frame::begin(Command::WriteRam);
        frame.push_u16(variable.raw()).push_bytes(&bytes[..n]);
        if field_len - n >= TEXT_TERMINATOR.len() {
            frame.push_bytes(&TEXT_TERMINATOR);
        }
        frame
    }

    /// Request `count` words of variables starting at `variable`
    pub fn request_variables(variable: Variable, count: u8) -> Self {
        let mut frame = Frame::begin(Command::ReadRam);
        frame.push_u16(variable.raw()).push_u8(count);
        frame
    }

    /// Push one sample per enabled channel to the curve buffers
    pub fn write_curve(channels: u8, samples: &[u16]) -> Self {
        let mut frame = Frame::begin(Command::WriteCurve);
        frame.push_u8(channels);
        for &sample in samples {
            frame.push_u16(sample);
        }
        frame
    }
}

/// Panel-originated frame, classified by command
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response<'a> {
    /// Acknowledgement of a RAM write
    Ack,
    /// Register contents: `[reg][count][bytes...]`
    Register {
        register: Register,
        count: u8,
        data: &'a [u8],
    },
    /// Variable contents: `[addr:2][count][words...]`
    Variables {
        start: Variable,
        count: u8,
        data: &'a [u8],
    },
    /// Command byte this controller does not expect from the panel
    Unsupported(u8),
}

impl<'a> Response<'a> {
    /// Classify an inbound frame, consuming its payload
    pub fn parse(frame: &'a mut Frame) -> Self {
        frame.rewind();
        match frame.command() {
            Some(Command::WriteRam) if frame.payload() == ACK_PAYLOAD => Response::Ack,
            Some(Command::ReadRegister) => {
                let register = frame.read_register();
                let count = frame.read_u8();
                Response::Register {
                    register,
                    count,
                    data: frame.rest(),
                }
            }
            Some(Command::ReadRam) => {
                let start = frame.read_variable();
                let count = frame.read_u8();
                Response::Variables {
                    start,
                    count,
                    data: frame.rest(),
                }
            }
            _ => Response::Unsupported(frame.command_byte()),
        }
    }

    /// Data word `index` of a variable response
    ///
    /// Returns `None` past the declared count or past the received bytes.
    pub fn word(&self, index: usize) -> Option<u16> {
        match self {
            Response::Variables { count, data, .. } if index < *count as usize => data
                .get(index * 2..index * 2 + 2)
                .map(|w| u16::from_be_bytes([w[0], w[1]])),
            _ => None,
        }
    }
}
