//! Panel address space
//!
//! Registers (8-bit addresses) hold panel control state such as the shown
//! page. Variables (16-bit addresses) live in panel RAM and back the widgets
//! of each page. Both are opaque identifiers: the only relation between two
//! addresses is their order, which lets a contiguous block be requested with
//! a start address and a count.

/// Control register address
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Register(pub u8);

impl Register {
    /// Panel firmware version
    pub const VERSION: Register = Register(0x00);
    /// Backlight brightness (0x00-0x40)
    pub const BRIGHTNESS: Register = Register(0x01);
    /// Buzzer duration in 10ms units
    pub const BUZZER: Register = Register(0x02);
    /// Currently displayed page id (two bytes)
    pub const PAGE: Register = Register(0x03);
    /// Touch event flag
    pub const TOUCH_FLAG: Register = Register(0x06);

    /// Raw address byte
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// RAM variable address
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Variable(pub u16);

impl Variable {
    /// Raw address word
    pub const fn raw(self) -> u16 {
        self.0
    }
}
