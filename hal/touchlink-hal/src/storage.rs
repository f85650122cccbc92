//! Persistent storage abstraction
//!
//! The settings ledger is laid out in a byte-addressable region owned by the
//! host (EEPROM, emulated EEPROM in flash, a file on SD). The controller only
//! sees offsets relative to the start of that region.

/// Errors from persistent storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Access beyond the end of the region
    OutOfBounds,
    /// Underlying medium reported a failure
    Medium,
    /// Region is write-protected
    ReadOnly,
}

/// Byte-addressable persistent region
pub trait PersistentStore {
    /// Size of the region in bytes
    fn capacity(&self) -> usize;

    /// Read `buf.len()` bytes starting at `offset`
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StoreError>;

    /// Write `data` starting at `offset`
    ///
    /// Writes may be buffered until [`PersistentStore::commit`].
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StoreError>;

    /// Flush buffered writes and record the checksum of the written layout
    ///
    /// Where the checksum lives is up to the host.
    fn commit(&mut self, checksum: u16) -> Result<(), StoreError> {
        let _ = checksum;
        Ok(())
    }

    /// Checksum recorded by the last [`PersistentStore::commit`], if the host keeps one
    fn stored_checksum(&mut self) -> Option<u16> {
        None
    }
}

impl<T: PersistentStore + ?Sized> PersistentStore for &mut T {
    fn capacity(&self) -> usize {
        (**self).capacity()
    }

    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), StoreError> {
        (**self).read(offset, buf)
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), StoreError> {
        (**self).write(offset, data)
    }

    fn commit(&mut self, checksum: u16) -> Result<(), StoreError> {
        (**self).commit(checksum)
    }

    fn stored_checksum(&mut self) -> Option<u16> {
        (**self).stored_checksum()
    }
}
