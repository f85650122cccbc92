//! Persisted settings
//!
//! A fixed-order ledger of entries behind a format version word. See
//! [`ledger`] for the layout and lifecycle.

pub mod cursor;
pub mod entries;
pub mod ledger;

pub use cursor::LedgerCursor;
pub use entries::{
    FilamentPreferences, LevelingPreferences, PanelPreferences, Preheat, PreheatPresets, Settings,
    SettingsEntry,
};
pub use ledger::{Ledger, LedgerState, SETTINGS_VERSION};

use touchlink_hal::StoreError;

/// Errors from loading or saving the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedgerError {
    /// Persistent store failed
    Store(StoreError),
    /// Layout does not fit in the region
    Overflow,
    /// Version or an entry failed validation
    Invalid,
    /// Recomputed checksum differs from the committed one
    Checksum,
}

impl From<StoreError> for LedgerError {
    fn from(e: StoreError) -> Self {
        LedgerError::Store(e)
    }
}
