//! Registered settings entries
//!
//! Each entry owns one fixed-size block of the ledger. `read` trusts the
//! bytes; `validate` reads the same bytes into temporaries and range-checks
//! them without touching live state. Both always consume the whole block.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::cursor::LedgerCursor;

/// One component of the persisted layout
pub trait SettingsEntry {
    /// Bytes this entry occupies in the ledger
    fn size_of(&self) -> usize;

    fn write(&self, cursor: &mut LedgerCursor<'_>);

    fn read(&mut self, cursor: &mut LedgerCursor<'_>);

    /// Check the stored block without applying it
    fn validate(&self, cursor: &mut LedgerCursor<'_>) -> bool;

    /// Restore compiled-in defaults
    fn reset(&mut self);
}

/// Hotend limit for presets and targets (°C)
pub const MAX_HOTEND_C: u16 = 300;
/// Bed limit for presets and targets (°C)
pub const MAX_BED_C: u16 = 120;

/// Preheat preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Preheat {
    pub hotend_c: u16,
    pub bed_c: u16,
}

impl Preheat {
    fn is_valid(&self) -> bool {
        self.hotend_c <= MAX_HOTEND_C && self.bed_c <= MAX_BED_C
    }
}

/// Preheat presets offered on the temperature screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PreheatPresets {
    pub presets: [Preheat; 2],
}

impl Default for PreheatPresets {
    fn default() -> Self {
        Self {
            presets: [
                // PLA
                Preheat {
                    hotend_c: 200,
                    bed_c: 60,
                },
                // PETG
                Preheat {
                    hotend_c: 240,
                    bed_c: 80,
                },
            ],
        }
    }
}

impl PreheatPresets {
    fn read_preset(cursor: &mut LedgerCursor<'_>) -> Preheat {
        Preheat {
            hotend_c: cursor.read_u16(),
            bed_c: cursor.read_u16(),
        }
    }
}

impl SettingsEntry for PreheatPresets {
    fn size_of(&self) -> usize {
        self.presets.len() * 4
    }

    fn write(&self, cursor: &mut LedgerCursor<'_>) {
        for p in &self.presets {
            cursor.write_u16(p.hotend_c);
            cursor.write_u16(p.bed_c);
        }
    }

    fn read(&mut self, cursor: &mut LedgerCursor<'_>) {
        for p in self.presets.iter_mut() {
            *p = Self::read_preset(cursor);
        }
    }

    fn validate(&self, cursor: &mut LedgerCursor<'_>) -> bool {
        let mut ok = true;
        for _ in 0..self.presets.len() {
            // No early exit: the remaining presets must still be consumed
            ok &= Self::read_preset(cursor).is_valid();
        }
        ok
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Number of UI languages the panel carries
pub const LANGUAGES: u8 = 4;

/// Panel behavior the user can change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PanelPreferences {
    /// Backlight in percent
    pub brightness: u8,
    /// Touch feedback beep
    pub beep: bool,
    /// Dim after this many idle seconds, 0 = never
    pub standby_s: u16,
    pub language: u8,
}

impl Default for PanelPreferences {
    fn default() -> Self {
        Self {
            brightness: 80,
            beep: true,
            standby_s: 300,
            language: 0,
        }
    }
}

impl SettingsEntry for PanelPreferences {
    fn size_of(&self) -> usize {
        5
    }

    fn write(&self, cursor: &mut LedgerCursor<'_>) {
        cursor.write_u8(self.brightness);
        cursor.write_bool(self.beep);
        cursor.write_u16(self.standby_s);
        cursor.write_u8(self.language);
    }

    fn read(&mut self, cursor: &mut LedgerCursor<'_>) {
        self.brightness = cursor.read_u8();
        self.beep = cursor.read_flag() != 0;
        self.standby_s = cursor.read_u16();
        self.language = cursor.read_u8();
    }

    fn validate(&self, cursor: &mut LedgerCursor<'_>) -> bool {
        let brightness = cursor.read_u8();
        let beep = cursor.read_flag();
        let _standby = cursor.read_u16();
        let language = cursor.read_u8();
        brightness <= 100 && beep <= 1 && language < LANGUAGES
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Z offset limit in hundredths of a millimetre
pub const MAX_Z_OFFSET_X100: i16 = 500;

/// Probe walk parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelingPreferences {
    /// Z offset in hundredths of a millimetre
    pub z_offset_x100: i16,
    /// Distance of the corner points from the bed edge
    pub inset_mm: u8,
    /// Nozzle lift between points
    pub travel_height_mm: u8,
}

impl Default for LevelingPreferences {
    fn default() -> Self {
        Self {
            z_offset_x100: 0,
            inset_mm: 30,
            travel_height_mm: 5,
        }
    }
}

impl SettingsEntry for LevelingPreferences {
    fn size_of(&self) -> usize {
        4
    }

    fn write(&self, cursor: &mut LedgerCursor<'_>) {
        cursor.write_i16(self.z_offset_x100);
        cursor.write_u8(self.inset_mm);
        cursor.write_u8(self.travel_height_mm);
    }

    fn read(&mut self, cursor: &mut LedgerCursor<'_>) {
        self.z_offset_x100 = cursor.read_i16();
        self.inset_mm = cursor.read_u8();
        self.travel_height_mm = cursor.read_u8();
    }

    fn validate(&self, cursor: &mut LedgerCursor<'_>) -> bool {
        let z = cursor.read_i16();
        let inset = cursor.read_u8();
        let travel = cursor.read_u8();
        (-MAX_Z_OFFSET_X100..=MAX_Z_OFFSET_X100).contains(&z)
            && inset <= 100
            && (1..=50).contains(&travel)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Filament change parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FilamentPreferences {
    pub load_mm: u16,
    pub unload_mm: u16,
    /// Extruder feed rate in mm/min
    pub feed_rate: u16,
    /// Lowest hotend temperature at which the extruder may move (°C)
    pub min_temp_c: u16,
}

impl Default for FilamentPreferences {
    fn default() -> Self {
        Self {
            load_mm: 100,
            unload_mm: 100,
            feed_rate: 300,
            min_temp_c: 180,
        }
    }
}

impl SettingsEntry for FilamentPreferences {
    fn size_of(&self) -> usize {
        8
    }

    fn write(&self, cursor: &mut LedgerCursor<'_>) {
        cursor.write_u16(self.load_mm);
        cursor.write_u16(self.unload_mm);
        cursor.write_u16(self.feed_rate);
        cursor.write_u16(self.min_temp_c);
    }

    fn read(&mut self, cursor: &mut LedgerCursor<'_>) {
        self.load_mm = cursor.read_u16();
        self.unload_mm = cursor.read_u16();
        self.feed_rate = cursor.read_u16();
        self.min_temp_c = cursor.read_u16();
    }

    fn validate(&self, cursor: &mut LedgerCursor<'_>) -> bool {
        let load = cursor.read_u16();
        let unload = cursor.read_u16();
        let rate = cursor.read_u16();
        let min_temp = cursor.read_u16();
        load <= 1000
            && unload <= 1000
            && (1..=6000).contains(&rate)
            && (150..=MAX_HOTEND_C).contains(&min_temp)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Every persisted setting, in ledger order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settings {
    pub presets: PreheatPresets,
    pub panel: PanelPreferences,
    pub leveling: LevelingPreferences,
    pub filament: FilamentPreferences,
}

impl Settings {
    /// Entries in declaration order
    pub fn entries(&self) -> [&dyn SettingsEntry; 4] {
        [&self.presets, &self.panel, &self.leveling, &self.filament]
    }

    /// Entries in declaration order, mutable
    pub fn entries_mut(&mut self) -> [&mut dyn SettingsEntry; 4] {
        [
            &mut self.presets,
            &mut self.panel,
            &mut self.leveling,
            &mut self.filament,
        ]
    }
}
