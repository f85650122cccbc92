//! Versioned settings layout
//!
//! ```text
//! [version:u16][entry 1][entry 2]...[entry N]
//! ```
//!
//! Entries are laid out back to back in declaration order with no padding
//! or per-entry tags. The layout is only meaningful for the version that
//! wrote it.

use touchlink_hal::{Checksum, PersistentStore};

use super::cursor::LedgerCursor;
use super::entries::{Settings, SettingsEntry};
use super::LedgerError;

/// Format version of the current layout
pub const SETTINGS_VERSION: u16 = 0x0104;

/// Bytes taken by the version word
pub const VERSION_LEN: usize = 2;

/// Outcome of the last load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedgerState {
    /// Nothing loaded yet
    Unknown,
    /// Stored layout matched and was applied
    Valid,
    /// Stored layout rejected; running on defaults until a reset is confirmed
    Mismatched,
}

/// Bytes the entries occupy after the version word
pub fn layout_size(entries: &[&dyn SettingsEntry]) -> usize {
    entries.iter().map(|e| e.size_of()).sum()
}

/// Write the version word then every entry
pub fn write_all(cursor: &mut LedgerCursor<'_>, entries: &[&dyn SettingsEntry]) {
    cursor.write_u16(SETTINGS_VERSION);
    for entry in entries {
        let end = cursor.offset() + entry.size_of();
        entry.write(cursor);
        cursor.pad_to(end);
    }
}

/// Check the stored layout
///
/// The full declared layout is consumed whatever the outcome, so the cursor
/// ends at the same offset as after [`read_all`].
pub fn validate_all(cursor: &mut LedgerCursor<'_>, entries: &[&dyn SettingsEntry]) -> bool {
    let version = cursor.read_u16();
    if version != SETTINGS_VERSION {
        warn!(
            "settings version {:#x}, expected {:#x}",
            version, SETTINGS_VERSION
        );
        cursor.skip(layout_size(entries));
        return false;
    }

    let mut valid = true;
    for entry in entries {
        let end = cursor.offset() + entry.size_of();
        let ok = entry.validate(cursor);
        cursor.align_to(end);
        if !ok {
            debug!("settings entry at {} out of range", end - entry.size_of());
        }
        valid &= ok;
    }
    valid && cursor.error().is_none()
}

/// Apply every stored entry to live state
///
/// No checks are made; validate first.
pub fn read_all(cursor: &mut LedgerCursor<'_>, entries: &mut [&mut dyn SettingsEntry]) {
    let _version = cursor.read_u16();
    for entry in entries.iter_mut() {
        let end = cursor.offset() + entry.size_of();
        entry.read(cursor);
        cursor.align_to(end);
    }
}

/// Restore every entry to its defaults without touching the store
pub fn reset_all(entries: &mut [&mut dyn SettingsEntry]) {
    for entry in entries.iter_mut() {
        entry.reset();
    }
}

/// Owner of the settings region lifecycle
#[derive(Debug, Clone)]
pub struct Ledger {
    base: usize,
    state: LedgerState,
    last_checksum: Option<u16>,
}

impl Ledger {
    /// Ledger stored at `base` within the persistent region
    pub const fn new(base: usize) -> Self {
        Self {
            base,
            state: LedgerState::Unknown,
            last_checksum: None,
        }
    }

    pub fn state(&self) -> LedgerState {
        self.state
    }

    pub fn base(&self) -> usize {
        self.base
    }

    /// Checksum computed by the last load or save
    pub fn last_checksum(&self) -> Option<u16> {
        self.last_checksum
    }

    /// Total bytes used in the store, version word included
    pub fn footprint(settings: &Settings) -> usize {
        VERSION_LEN + layout_size(&settings.entries())
    }

    fn check_fits(&self, store: &dyn PersistentStore, settings: &Settings) -> Result<(), LedgerError> {
        if self.base + Self::footprint(settings) > store.capacity() {
            return Err(LedgerError::Overflow);
        }
        Ok(())
    }

    /// Validate the stored layout and apply it if valid
    ///
    /// On any failure `settings` is reset to defaults and the ledger enters
    /// [`LedgerState::Mismatched`].
    pub fn load(
        &mut self,
        store: &mut dyn PersistentStore,
        checksum: &mut dyn Checksum,
        settings: &mut Settings,
    ) -> LedgerState {
        self.state = match self.try_load(store, checksum, settings) {
            Ok(()) => {
                info!("settings loaded");
                LedgerState::Valid
            }
            Err(e) => {
                warn!("settings rejected: {:?}, using defaults", e);
                reset_all(&mut settings.entries_mut());
                LedgerState::Mismatched
            }
        };
        self.state
    }

    fn try_load(
        &mut self,
        store: &mut dyn PersistentStore,
        checksum: &mut dyn Checksum,
        settings: &mut Settings,
    ) -> Result<(), LedgerError> {
        self.check_fits(store, settings)?;

        let (valid, computed) = {
            let mut cursor = LedgerCursor::new(store, checksum, self.base);
            let valid = validate_all(&mut cursor, &settings.entries());
            (valid, cursor.finish()?)
        };
        if !valid {
            return Err(LedgerError::Invalid);
        }
        if let Some(stored) = store.stored_checksum() {
            if stored != computed {
                warn!("settings checksum {:#x}, stored {:#x}", computed, stored);
                return Err(LedgerError::Checksum);
            }
        }

        let mut cursor = LedgerCursor::new(store, checksum, self.base);
        read_all(&mut cursor, &mut settings.entries_mut());
        self.last_checksum = Some(cursor.finish()?);
        Ok(())
    }

    /// Write the full layout and commit it with its checksum
    pub fn save(
        &mut self,
        store: &mut dyn PersistentStore,
        checksum: &mut dyn Checksum,
        settings: &Settings,
    ) -> Result<(), LedgerError> {
        self.check_fits(store, settings)?;
        let computed = {
            let mut cursor = LedgerCursor::new(store, checksum, self.base);
            write_all(&mut cursor, &settings.entries());
            cursor.finish()?
        };
        store.commit(computed)?;
        self.last_checksum = Some(computed);
        self.state = LedgerState::Valid;
        info!("settings saved, checksum {:#x}", computed);
        Ok(())
    }

    /// Wipe live settings to defaults and persist them
    pub fn factory_reset(
        &mut self,
        store: &mut dyn PersistentStore,
        checksum: &mut dyn Checksum,
        settings: &mut Settings,
    ) -> Result<(), LedgerError> {
        info!("factory reset");
        reset_all(&mut settings.entries_mut());
        self.save(store, checksum, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::RamStore;
    use touchlink_hal::Crc16;

    fn saved_store(settings: &Settings) -> RamStore {
        let mut store = RamStore::new(64);
        let mut crc = Crc16::new();
        Ledger::new(0).save(&mut store, &mut crc, settings).unwrap();
        store
    }

    #[test]
    fn test_layout_is_packed() {
        let settings = Settings::default();
        assert_eq!(layout_size(&settings.entries()), 8 + 5 + 4 + 8);
        assert_eq!(Ledger::footprint(&settings), 27);
    }

    #[test]
    fn test_version_written_first() {
        let store = saved_store(&Settings::default());
        assert_eq!(&store.data[..2], &SETTINGS_VERSION.to_le_bytes());
        assert_eq!(store.commits, 1);
    }

    #[test]
    fn test_round_trip() {
        let mut settings = Settings::default();
        settings.presets.presets[1].hotend_c = 255;
        settings.panel.beep = false;
        settings.leveling.z_offset_x100 = -125;
        settings.filament.unload_mm = 420;
        let mut store = saved_store(&settings);

        let mut loaded = Settings::default();
        let mut ledger = Ledger::new(0);
        let state = ledger.load(&mut store, &mut Crc16::new(), &mut loaded);
        assert_eq!(state, LedgerState::Valid);
        assert_eq!(loaded, settings);
        assert_eq!(ledger.last_checksum(), store.committed);
    }

    #[test]
    fn test_corrupt_version_invalid() {
        let settings = Settings::default();
        let mut store = saved_store(&settings);
        store.data[0] ^= 0x01;
        let mut crc = Crc16::new();
        let mut cursor = LedgerCursor::new(&mut store, &mut crc, 0);
        assert!(!validate_all(&mut cursor, &settings.entries()));
        // Declared layout still consumed
        assert_eq!(cursor.offset(), Ledger::footprint(&settings));
    }

    #[test]
    fn test_bad_entry_still_consumes_layout() {
        let settings = Settings::default();
        let mut store = saved_store(&settings);
        // Brightness lives right after the presets block
        store.data[VERSION_LEN + 8] = 250;
        let mut crc = Crc16::new();
        let mut cursor = LedgerCursor::new(&mut store, &mut crc, 0);
        assert!(!validate_all(&mut cursor, &settings.entries()));
        assert_eq!(cursor.offset(), Ledger::footprint(&settings));
    }

    #[test]
    fn test_mismatch_resets_to_defaults() {
        let mut custom = Settings::default();
        custom.panel.brightness = 20;
        let mut store = saved_store(&custom);
        store.data[1] = 0x7F;

        let mut live = custom;
        let mut ledger = Ledger::new(0);
        assert_eq!(
            ledger.load(&mut store, &mut Crc16::new(), &mut live),
            LedgerState::Mismatched
        );
        assert_eq!(live, Settings::default());
    }

    #[test]
    fn test_blank_store_mismatched() {
        let mut store = RamStore::new(64);
        let mut live = Settings::default();
        let mut ledger = Ledger::new(0);
        assert_eq!(
            ledger.load(&mut store, &mut Crc16::new(), &mut live),
            LedgerState::Mismatched
        );
    }

    #[test]
    fn test_stored_checksum_compared() {
        let settings = Settings::default();
        let mut store = saved_store(&settings);
        store.keeps_checksum = true;
        let mut ledger = Ledger::new(0);
        let mut live = Settings::default();
        assert_eq!(
            ledger.load(&mut store, &mut Crc16::new(), &mut live),
            LedgerState::Valid
        );

        // Same values, different standby: still in range, checksum now stale
        store.data[VERSION_LEN + 8 + 2] ^= 0x01;
        assert_eq!(
            ledger.load(&mut store, &mut Crc16::new(), &mut live),
            LedgerState::Mismatched
        );
    }

    #[test]
    fn test_region_too_small() {
        let mut store = RamStore::new(16);
        let mut ledger = Ledger::new(0);
        assert_eq!(
            ledger.save(&mut store, &mut Crc16::new(), &Settings::default()),
            Err(LedgerError::Overflow)
        );
    }

    #[test]
    fn test_base_offset() {
        let settings = Settings::default();
        let mut store = RamStore::new(64);
        let mut ledger = Ledger::new(32);
        ledger.save(&mut store, &mut Crc16::new(), &settings).unwrap();
        assert!(store.data[..32].iter().all(|&b| b == 0xFF));
        let mut live = Settings::default();
        assert_eq!(
            ledger.load(&mut store, &mut Crc16::new(), &mut live),
            LedgerState::Valid
        );
    }

    #[test]
    fn test_factory_reset_persists_defaults() {
        let mut custom = Settings::default();
        custom.filament.load_mm = 7;
        let mut store = saved_store(&custom);
        let mut ledger = Ledger::new(0);
        ledger
            .factory_reset(&mut store, &mut Crc16::new(), &mut custom)
            .unwrap();
        assert_eq!(custom, Settings::default());
        let mut live = Settings::default();
        live.filament.load_mm = 1;
        ledger.load(&mut store, &mut Crc16::new(), &mut live);
        assert_eq!(live, Settings::default());
    }
}
