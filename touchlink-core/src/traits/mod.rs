//! Host abstraction traits
//!
//! These traits define the interface between the panel session and the
//! printer firmware it runs inside.

pub mod host;

pub use host::{Axis, Heater, PrinterHost};
