//! Sequential access to the persistent region
//!
//! Every byte read or written goes through the running checksum. Errors are
//! recorded rather than returned so that entry code can stay linear; the
//! offset still advances on failure, keeping later fields aligned.

use touchlink_hal::{Checksum, PersistentStore, StoreError};

use super::LedgerError;

/// Cursor over the settings region
pub struct LedgerCursor<'a> {
    store: &'a mut dyn PersistentStore,
    checksum: &'a mut dyn Checksum,
    offset: usize,
    error: Option<LedgerError>,
}

impl<'a> LedgerCursor<'a> {
    /// Start at `offset`, restarting the checksum
    pub fn new(
        store: &'a mut dyn PersistentStore,
        checksum: &'a mut dyn Checksum,
        offset: usize,
    ) -> Self {
        checksum.reset();
        Self {
            store,
            checksum,
            offset,
            error: None,
        }
    }

    /// Current absolute offset in the store
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Checksum over everything accessed so far
    pub fn checksum(&self) -> u16 {
        self.checksum.value()
    }

    /// First error recorded by this cursor
    pub fn error(&self) -> Option<LedgerError> {
        self.error
    }

    /// Consume the cursor, returning the checksum or the first error
    pub fn finish(self) -> Result<u16, LedgerError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.checksum.value()),
        }
    }

    fn record(&mut self, error: StoreError) {
        if self.error.is_none() {
            warn!("store error at {}: {:?}", self.offset, error);
            self.error = Some(LedgerError::Store(error));
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        if let Err(e) = self.store.write(self.offset, bytes) {
            self.record(e);
        }
        for &b in bytes {
            self.checksum.update(b);
        }
        self.offset += bytes.len();
    }

    /// Fill `buf` from the store; zeros on failure
    pub fn read_bytes(&mut self, buf: &mut [u8]) {
        if let Err(e) = self.store.read(self.offset, buf) {
            self.record(e);
            buf.fill(0);
        }
        for &b in buf.iter() {
            self.checksum.update(b);
        }
        self.offset += buf.len();
    }

    pub fn write_u8(&mut self, value: u8) {
        self.write_bytes(&[value]);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_i16(&mut self, value: i16) {
        self.write_bytes(&value.to_le_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.write_u8(value as u8);
    }

    pub fn read_u8(&mut self) -> u8 {
        let mut buf = [0u8; 1];
        self.read_bytes(&mut buf);
        buf[0]
    }

    pub fn read_u16(&mut self) -> u16 {
        let mut buf = [0u8; 2];
        self.read_bytes(&mut buf);
        u16::from_le_bytes(buf)
    }

    pub fn read_i16(&mut self) -> i16 {
        let mut buf = [0u8; 2];
        self.read_bytes(&mut buf);
        i16::from_le_bytes(buf)
    }

    /// Read a raw flag byte; anything but 0 or 1 is left for `validate` to reject
    pub fn read_flag(&mut self) -> u8 {
        self.read_u8()
    }

    /// Read and checksum `n` bytes without interpreting them
    pub fn skip(&mut self, n: usize) {
        let mut chunk = [0u8; 16];
        let mut left = n;
        while left > 0 {
            let take = left.min(chunk.len());
            self.read_bytes(&mut chunk[..take]);
            left -= take;
        }
    }

    /// Write filler up to `target` after an entry wrote short
    pub fn pad_to(&mut self, target: usize) {
        while self.offset < target {
            self.write_u8(0xFF);
        }
        if self.offset > target {
            warn!("entry overran its layout by {} bytes", self.offset - target);
            self.offset = target;
        }
    }

    /// Bring the cursor to `target`
    ///
    /// Bytes an entry left unread are consumed through the checksum. An
    /// entry that read past its declared size is logged and the offset is
    /// pulled back.
    pub fn align_to(&mut self, target: usize) {
        if self.offset < target {
            self.skip(target - self.offset);
        } else if self.offset > target {
            warn!("entry overran its layout by {} bytes", self.offset - target);
            self.offset = target;
        }
    }
}
