//! Printer host interface
//!
//! Everything the panel session needs from the printer: temperatures,
//! positions, motion and print status, a command queue, and a clock.

/// Heated element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Heater {
    Hotend,
    Bed,
}

/// Motion axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
    Z,
    E,
}

impl Axis {
    /// G-code letter for this axis
    pub const fn letter(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
            Axis::E => 'E',
        }
    }
}

/// Services provided by the printer firmware
pub trait PrinterHost {
    /// Queue one or more newline-separated G-code commands
    fn inject_command(&mut self, gcode: &str);

    /// Measured temperature in degrees Celsius
    fn current_temperature(&self, heater: Heater) -> i16;

    /// Target temperature in degrees Celsius, 0 when off
    fn target_temperature(&self, heater: Heater) -> i16;

    fn set_target_temperature(&mut self, heater: Heater, celsius: i16);

    /// Logical axis position in millimetres
    fn axis_position(&self, axis: Axis) -> f32;

    /// No queued or executing moves
    fn is_motion_queue_empty(&self) -> bool;

    /// A print job is running (including paused)
    fn is_printing(&self) -> bool;

    /// Print progress in percent
    fn print_progress(&self) -> u8 {
        0
    }

    /// Monotonic milliseconds, wrapping
    fn now_ms(&self) -> u32;

    /// Let the host run its own housekeeping while the session waits
    fn yield_now(&mut self) {}
}

impl<T: PrinterHost + ?Sized> PrinterHost for &mut T {
    fn inject_command(&mut self, gcode: &str) {
        (**self).inject_command(gcode)
    }

    fn current_temperature(&self, heater: Heater) -> i16 {
        (**self).current_temperature(heater)
    }

    fn target_temperature(&self, heater: Heater) -> i16 {
        (**self).target_temperature(heater)
    }

    fn set_target_temperature(&mut self, heater: Heater, celsius: i16) {
        (**self).set_target_temperature(heater, celsius)
    }

    fn axis_position(&self, axis: Axis) -> f32 {
        (**self).axis_position(axis)
    }

    fn is_motion_queue_empty(&self) -> bool {
        (**self).is_motion_queue_empty()
    }

    fn is_printing(&self) -> bool {
        (**self).is_printing()
    }

    fn print_progress(&self) -> u8 {
        (**self).print_progress()
    }

    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }

    fn yield_now(&mut self) {
        (**self).yield_now()
    }
}
