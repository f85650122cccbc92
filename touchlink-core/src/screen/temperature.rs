//! Temperature targets
//!
//! Edits are kept pending on the screen and only reach the heaters on save.
//! Cooldown is the exception and applies immediately.

use touchlink_hal::SerialLink;

use super::{Screen, ScreenContext};
use crate::action::{Action, KeyValue};
use crate::layout;
use crate::nav::Page;
use crate::settings::entries::{MAX_BED_C, MAX_HOTEND_C};
use crate::traits::{Heater, PrinterHost};

/// Degrees per up/down press
pub const TEMPERATURE_STEP: i16 = 5;

#[derive(Debug, Default)]
pub struct TemperatureScreen {
    /// Pending hotend and bed targets while the page is open
    pending: Option<[i16; 2]>,
}

impl TemperatureScreen {
    pub const HOTEND_UP: KeyValue = KeyValue(0x0001);
    pub const HOTEND_DOWN: KeyValue = KeyValue(0x0002);
    pub const BED_UP: KeyValue = KeyValue(0x0003);
    pub const BED_DOWN: KeyValue = KeyValue(0x0004);
    pub const PRESET_1: KeyValue = KeyValue(0x0005);
    pub const PRESET_2: KeyValue = KeyValue(0x0006);
    pub const COOLDOWN: KeyValue = KeyValue(0x0007);

    pub fn pending(&self) -> Option<[i16; 2]> {
        self.pending
    }

    fn publish<H: PrinterHost, L: SerialLink>(&self, cx: &mut ScreenContext<'_, H, L>) {
        if let Some([hotend, bed]) = self.pending {
            cx.panel()
                .write_words(layout::PENDING_TARGETS, &[hotend as u16, bed as u16]);
        }
    }

    fn adjust(&mut self, heater: Heater, delta: i16) {
        if let Some(pending) = self.pending.as_mut() {
            let (slot, max) = match heater {
                Heater::Hotend => (0, MAX_HOTEND_C as i16),
                Heater::Bed => (1, MAX_BED_C as i16),
            };
            pending[slot] = pending[slot].saturating_add(delta).clamp(0, max);
        }
    }
}

impl Screen for TemperatureScreen {
    const PAGE: Page = Page::TEMPERATURE;
    const ACTION: Action = Action::Temperature;

    fn on_dispatch<H: PrinterHost, L: SerialLink>(
        &mut self,
        key: KeyValue,
        cx: &mut ScreenContext<'_, H, L>,
    ) -> bool {
        match key {
            Self::HOTEND_UP => self.adjust(Heater::Hotend, TEMPERATURE_STEP),
            Self::HOTEND_DOWN => self.adjust(Heater::Hotend, -TEMPERATURE_STEP),
            Self::BED_UP => self.adjust(Heater::Bed, TEMPERATURE_STEP),
            Self::BED_DOWN => self.adjust(Heater::Bed, -TEMPERATURE_STEP),
            Self::PRESET_1 | Self::PRESET_2 => {
                let index = usize::from(key == Self::PRESET_2);
                let preset = cx.settings.presets.presets[index];
                self.pending = Some([preset.hotend_c as i16, preset.bed_c as i16]);
            }
            Self::COOLDOWN => {
                cx.host_mut().set_target_temperature(Heater::Hotend, 0);
                cx.host_mut().set_target_temperature(Heater::Bed, 0);
                self.pending = Some([0, 0]);
            }
            _ => return false,
        }
        self.publish(cx);
        true
    }

    fn on_enter<H: PrinterHost, L: SerialLink>(&mut self, cx: &mut ScreenContext<'_, H, L>) -> bool {
        let host = cx.host();
        self.pending = Some([
            host.target_temperature(Heater::Hotend),
            host.target_temperature(Heater::Bed),
        ]);
        self.publish(cx);
        true
    }

    fn on_save<H: PrinterHost, L: SerialLink>(&mut self, cx: &mut ScreenContext<'_, H, L>) {
        if let Some([hotend, bed]) = self.pending.take() {
            info!("targets hotend {} bed {}", hotend, bed);
            cx.host_mut().set_target_temperature(Heater::Hotend, hotend);
            cx.host_mut().set_target_temperature(Heater::Bed, bed);
        }
    }

    fn on_back<H: PrinterHost, L: SerialLink>(&mut self, _cx: &mut ScreenContext<'_, H, L>) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::harness::Rig;

    #[test]
    fn test_edits_pending_until_save() {
        let mut rig = Rig::new();
        let mut screen = TemperatureScreen::default();
        screen.dispatch(KeyValue::SHOW, &mut rig.cx());
        screen.dispatch(TemperatureScreen::PRESET_1, &mut rig.cx());
        screen.dispatch(TemperatureScreen::HOTEND_UP, &mut rig.cx());
        assert_eq!(rig.host.targets, [0, 0]);
        assert_eq!(screen.pending(), Some([205, 60]));

        screen.dispatch(KeyValue::SAVE, &mut rig.cx());
        assert_eq!(rig.host.targets, [205, 60]);
        assert_eq!(rig.page(), Page::MAIN);
    }

    #[test]
    fn test_back_discards() {
        let mut rig = Rig::new();
        let mut screen = TemperatureScreen::default();
        screen.dispatch(KeyValue::SHOW, &mut rig.cx());
        screen.dispatch(TemperatureScreen::BED_UP, &mut rig.cx());
        screen.dispatch(KeyValue::BACK, &mut rig.cx());
        assert_eq!(rig.host.targets, [0, 0]);
        assert_eq!(screen.pending(), None);
    }

    #[test]
    fn test_clamped() {
        let mut rig = Rig::new();
        let mut screen = TemperatureScreen::default();
        screen.dispatch(KeyValue::SHOW, &mut rig.cx());
        screen.dispatch(TemperatureScreen::BED_DOWN, &mut rig.cx());
        assert_eq!(screen.pending(), Some([0, 0]));
        rig.host.targets = [298, 0];
        screen.dispatch(KeyValue::SHOW, &mut rig.cx());
        screen.dispatch(TemperatureScreen::HOTEND_UP, &mut rig.cx());
        assert_eq!(screen.pending(), Some([300, 0]));
    }

    #[test]
    fn test_cooldown_immediate() {
        let mut rig = Rig::new();
        rig.host.targets = [200, 60];
        let mut screen = TemperatureScreen::default();
        screen.dispatch(KeyValue::SHOW, &mut rig.cx());
        screen.dispatch(TemperatureScreen::COOLDOWN, &mut rig.cx());
        assert_eq!(rig.host.targets, [0, 0]);
    }
}
