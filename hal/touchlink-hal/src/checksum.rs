//! Running checksum accumulators
//!
//! The ledger feeds every byte it reads or writes through a [`Checksum`].
//! The algorithm belongs to the host; [`Crc16`] is provided for hosts that
//! have none of their own.

/// Running checksum over a byte sequence
pub trait Checksum {
    /// Restart accumulation
    fn reset(&mut self);

    /// Fold one byte into the running value
    fn update(&mut self, byte: u8);

    /// Current value
    fn value(&self) -> u16;
}

/// CRC-16/CCITT-FALSE (poly 0x1021, init 0xFFFF)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Crc16 {
    crc: u16,
}

impl Crc16 {
    const POLY: u16 = 0x1021;
    const INIT: u16 = 0xFFFF;

    /// Create a fresh accumulator
    pub const fn new() -> Self {
        Self { crc: Self::INIT }
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

impl Checksum for Crc16 {
    fn reset(&mut self) {
        self.crc = Self::INIT;
    }

    fn update(&mut self, byte: u8) {
        self.crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if self.crc & 0x8000 != 0 {
                self.crc = (self.crc << 1) ^ Self::POLY;
            } else {
                self.crc <<= 1;
            }
        }
    }

    fn value(&self) -> u16 {
        self.crc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc16_check_value() {
        let mut crc = Crc16::new();
        for &b in b"123456789" {
            crc.update(b);
        }
        assert_eq!(crc.value(), 0x29B1);
    }

    #[test]
    fn test_crc16_reset() {
        let mut crc = Crc16::new();
        crc.update(0x42);
        assert_ne!(crc.value(), 0xFFFF);
        crc.reset();
        assert_eq!(crc.value(), 0xFFFF);
    }
}
