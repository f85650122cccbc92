//! Board-agnostic core logic for serial touchscreen panels
//!
//! This crate contains everything between the printer firmware and the
//! panel link that does not depend on a specific board:
//!
//! - Host integration traits (printer state, command injection)
//! - Page table and navigation history
//! - Screen dispatch for every touch action
//! - Versioned settings ledger over a byte-addressable store
//! - Background jobs (leveling walk, filament moves)
//! - The session controller tying it together on each idle tick

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod fmt;

pub mod action;
pub mod config;
pub mod events;
pub mod gcode;
pub mod layout;
pub mod nav;
pub mod panel;
pub mod scheduler;
pub mod screen;
pub mod session;
pub mod settings;
pub mod status;
pub mod traits;

#[cfg(test)]
mod mock;

pub use action::{Action, KeyValue};
pub use config::{ConfigError, SessionConfig};
pub use events::HostEvent;
pub use nav::{NavigationContext, NavigationStack, Navigator, Page};
pub use panel::Panel;
pub use session::{Session, SessionStats};
pub use settings::{Ledger, LedgerError, LedgerState, Settings};
pub use traits::{Axis, Heater, PrinterHost};
