//! Panel variable map
//!
//! Addresses of the display variables the controller writes. Touch
//! variables live in [`crate::action`]; everything here is output only.

use touchlink_protocol::Variable;

/// Hotend current, hotend target, bed current, bed target (°C)
pub const TEMPERATURES: Variable = Variable(0x2000);
/// X, Y, Z position in tenths of a millimetre
pub const POSITIONS: Variable = Variable(0x2010);
/// Print progress then background job progress (percent)
pub const PROGRESS: Variable = Variable(0x2020);

/// Pending hotend and bed targets on the temperature screen
pub const PENDING_TARGETS: Variable = Variable(0x2030);
/// Selected jog step in tenths of a millimetre
pub const JOG_STEP: Variable = Variable(0x2040);
/// Z offset in hundredths of a millimetre
pub const Z_OFFSET: Variable = Variable(0x2050);
/// Brightness, beep, language on the preferences screen
pub const PREFERENCES: Variable = Variable(0x2060);

/// Message line on popups
pub const MESSAGE: Variable = Variable(0x3000);
/// Size of the message field in bytes
pub const MESSAGE_LEN: usize = 32;
