//! Touch events
//!
//! Every panel screen reports its widgets through one RAM variable. The
//! variable address is the [`Action`] (which screen fired) and the data
//! word is the [`KeyValue`] (what was pressed on it).

use touchlink_protocol::Variable;

/// Event space owned by one screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum Action {
    MainMenu = 0x1000,
    PrintStatus = 0x1002,
    Temperature = 0x1004,
    Motion = 0x1006,
    Leveling = 0x1008,
    Filament = 0x100A,
    Preferences = 0x100C,
    ConfirmReset = 0x100E,
    Popup = 0x1010,
}

impl Action {
    /// Every action the panel layout defines
    pub const ALL: [Action; 9] = [
        Action::MainMenu,
        Action::PrintStatus,
        Action::Temperature,
        Action::Motion,
        Action::Leveling,
        Action::Filament,
        Action::Preferences,
        Action::ConfirmReset,
        Action::Popup,
    ];

    /// Resolve the variable a touch frame reported on
    pub fn from_variable(variable: Variable) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.variable() == variable)
    }

    /// Variable this action's widgets report on
    pub const fn variable(self) -> Variable {
        Variable(self as u16)
    }
}

/// Screen-scoped sub-event code
///
/// Codes below [`KeyValue::SAVE`] belong to the individual screens. The
/// four shared codes drive the default show/save/back/abort behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyValue(pub u16);

impl KeyValue {
    /// Open the screen's page
    pub const SHOW: KeyValue = KeyValue(0x0000);
    /// Commit pending edits and return
    pub const SAVE: KeyValue = KeyValue(0x00FD);
    /// Discard pending edits and return
    pub const BACK: KeyValue = KeyValue(0x00FE);
    /// Cancel whatever the screen has in flight
    pub const ABORT: KeyValue = KeyValue(0x00FF);

    /// Raw code
    pub const fn raw(self) -> u16 {
        self.0
    }
}
