//! G-code lines injected into the host
//!
//! Commands are formatted into fixed-capacity strings; anything that does
//! not fit is cut at the capacity, which none of these lines reach.

use heapless::String;

use crate::traits::Axis;

/// Capacity of one injected command block
pub const MAX_GCODE_LEN: usize = 64;

pub type Gcode = String<MAX_GCODE_LEN>;

pub const HOME_ALL: &str = "G28";
pub const DISABLE_STEPPERS: &str = "M84";
pub const QUICK_STOP: &str = "M410";
pub const PAUSE_PRINT: &str = "M25";
pub const RESUME_PRINT: &str = "M24";
pub const STOP_PRINT: &str = "M524";
pub const RESUME_AFTER_PROMPT: &str = "M108";

fn write_to_string(s: &mut Gcode, args: core::fmt::Arguments<'_>) -> core::fmt::Result {
    use core::fmt::Write;
    s.write_fmt(args)
}

/// Split a hundredths value into sign, whole part and fraction
fn hundredths(value: i32) -> (&'static str, u32, u32) {
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    (sign, abs / 100, abs % 100)
}

/// Relative move of one axis by `tenths` tenths of a millimetre
pub fn jog(axis: Axis, tenths: i16) -> Gcode {
    let mut s = Gcode::new();
    let (sign, whole, frac) = hundredths(i32::from(tenths) * 10);
    let _ = write_to_string(
        &mut s,
        format_args!("G91\nG0 {}{}{}.{:02}\nG90", axis.letter(), sign, whole, frac),
    );
    s
}

/// Lift, travel to (x, y) and lower to the bed
pub fn probe_point(x_mm: u16, y_mm: u16, travel_mm: u8) -> Gcode {
    let mut s = Gcode::new();
    let _ = write_to_string(
        &mut s,
        format_args!("G0 Z{}\nG0 X{} Y{} F6000\nG0 Z0", travel_mm, x_mm, y_mm),
    );
    s
}

/// Absolute Z move
pub fn lift(z_mm: u8) -> Gcode {
    let mut s = Gcode::new();
    let _ = write_to_string(&mut s, format_args!("G0 Z{}", z_mm));
    s
}

/// Relative extrusion of `mm` (negative retracts) at `feed_rate` mm/min
pub fn extrude(mm: i16, feed_rate: u16) -> Gcode {
    let mut s = Gcode::new();
    let _ = write_to_string(&mut s, format_args!("M83\nG1 E{} F{}", mm, feed_rate));
    s
}

/// Store the probe Z offset
pub fn z_offset(offset_x100: i16) -> Gcode {
    let mut s = Gcode::new();
    let (sign, whole, frac) = hundredths(i32::from(offset_x100));
    let _ = write_to_string(&mut s, format_args!("M851 Z{}{}.{:02}", sign, whole, frac));
    s
}
