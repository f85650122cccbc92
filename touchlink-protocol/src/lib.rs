//! Touchscreen panel frame protocol
//!
//! This crate implements the binary protocol spoken by serial touchscreen
//! panels that expose their state as addressable memory. The controller
//! writes registers and RAM variables to update what is shown; the panel
//! reports touches by sending variable data frames back.
//!
//! # Protocol Overview
//!
//! All messages use the same frame layout, multi-byte fields big-endian:
//! ```text
//! ┌──────┬──────┬────────┬─────────┬──────────────────┐
//! │ 0x5A │ 0xA5 │ LENGTH │ COMMAND │ PAYLOAD          │
//! │ 1B   │ 1B   │ 1B     │ 1B      │ LENGTH - 1 bytes │
//! └──────┴──────┴────────┴─────────┴──────────────────┘
//! ```
//!
//! `LENGTH` counts the command byte and the payload. There is no checksum;
//! the link is assumed reliable apart from line noise between frames, which
//! the receiver skips one byte at a time until it finds a header.

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod address;
pub mod command;
pub mod frame;
pub mod messages;

pub use address::{Register, Variable};
pub use command::Command;
pub use frame::{
    Frame, FrameError, DEFAULT_SPIN_LIMIT, HEADER, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE, PAYLOAD_OFFSET,
};
pub use messages::{Response, ACK_PAYLOAD};
