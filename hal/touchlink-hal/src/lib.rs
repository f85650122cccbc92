//! Touchlink Hardware Abstraction Layer
//!
//! This crate defines the traits the panel controller needs from the host
//! board. The host firmware implements them on top of its UART driver and
//! its persistent storage (EEPROM, flash emulation, SD backing file).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  touchlink-core (session, screens)      │
//! └─────────────────────────────────────────┘
//!          │                     │
//!          ▼                     ▼
//! ┌──────────────────┐   ┌──────────────────┐
//! │ touchlink-       │   │ touchlink-hal    │
//! │ protocol (codec) │──▶│ (this crate)     │
//! └──────────────────┘   └──────────────────┘
//!                                │
//!                                ▼
//!                       host board drivers
//! ```
//!
//! # Traits
//!
//! - [`serial::SerialLink`] - Byte stream to the panel
//! - [`storage::PersistentStore`] - Byte-addressable persistent region
//! - [`checksum::Checksum`] - Running checksum over persisted bytes

#![no_std]
#![deny(unsafe_code)]

pub mod checksum;
pub mod serial;
pub mod storage;

// Re-export key traits at crate root for convenience
pub use checksum::{Checksum, Crc16};
pub use serial::SerialLink;
pub use storage::{PersistentStore, StoreError};
