//! Command opcodes

/// Frame command byte
///
/// The command determines the payload shape: register commands use a
/// one-byte address, RAM and curve commands a two-byte address or channel
/// mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Write control registers: `[reg][data...]`
    WriteRegister = 0x80,
    /// Read control registers: `[reg][count]`
    ReadRegister = 0x81,
    /// Write RAM variables: `[addr:2][words...]`
    WriteRam = 0x82,
    /// Read RAM variables: `[addr:2][count]`
    ReadRam = 0x83,
    /// Push curve samples: `[channels][samples:2...]`
    WriteCurve = 0x84,
}

impl Command {
    /// Parse a command from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x80 => Some(Command::WriteRegister),
            0x81 => Some(Command::ReadRegister),
            0x82 => Some(Command::WriteRam),
            0x83 => Some(Command::ReadRam),
            0x84 => Some(Command::WriteCurve),
            _ => None,
        }
    }

    /// Wire byte for this command
    pub const fn to_byte(self) -> u8 {
        self as u8
    }

    /// Width of the address field in bytes
    pub const fn address_width(self) -> usize {
        match self {
            Command::WriteRegister | Command::ReadRegister | Command::WriteCurve => 1,
            Command::WriteRam | Command::ReadRam => 2,
        }
    }

    /// Returns true for the two read requests
    pub fn is_read(self) -> bool {
        matches!(self, Command::ReadRegister | Command::ReadRam)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_bytes() {
        assert_eq!(Command::WriteRegister.to_byte(), 0x80);
        assert_eq!(Command::WriteCurve.to_byte(), 0x84);
        assert_eq!(Command::from_byte(0x83), Some(Command::ReadRam));
        assert_eq!(Command::from_byte(0x85), None);
        assert_eq!(Command::from_byte(0x00), None);
    }

    #[test]
    fn test_address_width() {
        assert_eq!(Command::ReadRegister.address_width(), 1);
        assert_eq!(Command::ReadRam.address_width(), 2);
        assert!(Command::ReadRam.is_read());
        assert!(!Command::WriteRam.is_read());
    }
}
