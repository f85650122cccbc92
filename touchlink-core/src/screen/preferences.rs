//! Panel preferences
//!
//! Brightness is previewed on the panel as it changes; everything is put
//! back if the user leaves without saving.

use touchlink_hal::SerialLink;
use touchlink_protocol::Register;

use super::{Screen, ScreenContext};
use crate::action::{Action, KeyValue};
use crate::layout;
use crate::nav::Page;
use crate::settings::entries::LANGUAGES;
use crate::settings::PanelPreferences;
use crate::traits::PrinterHost;

/// Brightness change per press, percent
pub const BRIGHTNESS_STEP: u8 = 10;
/// Lowest brightness the screen will set
pub const MIN_BRIGHTNESS: u8 = 10;

#[derive(Debug, Default)]
pub struct PreferencesScreen {
    pending: Option<PanelPreferences>,
}

impl PreferencesScreen {
    pub const BRIGHTNESS_UP: KeyValue = KeyValue(0x0001);
    pub const BRIGHTNESS_DOWN: KeyValue = KeyValue(0x0002);
    pub const TOGGLE_BEEP: KeyValue = KeyValue(0x0003);
    pub const NEXT_LANGUAGE: KeyValue = KeyValue(0x0004);

    pub fn pending(&self) -> Option<&PanelPreferences> {
        self.pending.as_ref()
    }

    fn publish<H: PrinterHost, L: SerialLink>(
        prefs: &PanelPreferences,
        cx: &mut ScreenContext<'_, H, L>,
    ) {
        let panel = cx.panel();
        panel.write_register(Register::BRIGHTNESS, &[prefs.brightness]);
        panel.write_words(
            layout::PREFERENCES,
            &[
                u16::from(prefs.brightness),
                u16::from(prefs.beep),
                u16::from(prefs.language),
            ],
        );
    }
}

impl Screen for PreferencesScreen {
    const PAGE: Page = Page::PREFERENCES;
    const ACTION: Action = Action::Preferences;

    fn on_dispatch<H: PrinterHost, L: SerialLink>(
        &mut self,
        key: KeyValue,
        cx: &mut ScreenContext<'_, H, L>,
    ) -> bool {
        let Some(prefs) = self.pending.as_mut() else {
            return false;
        };
        match key {
            Self::BRIGHTNESS_UP => {
                prefs.brightness = prefs.brightness.saturating_add(BRIGHTNESS_STEP).min(100);
            }
            Self::BRIGHTNESS_DOWN => {
                prefs.brightness = prefs
                    .brightness
                    .saturating_sub(BRIGHTNESS_STEP)
                    .max(MIN_BRIGHTNESS);
            }
            Self::TOGGLE_BEEP => prefs.beep = !prefs.beep,
            Self::NEXT_LANGUAGE => prefs.language = (prefs.language + 1) % LANGUAGES,
            _ => return false,
        }
        let prefs = *prefs;
        Self::publish(&prefs, cx);
        true
    }

    fn on_enter<H: PrinterHost, L: SerialLink>(&mut self, cx: &mut ScreenContext<'_, H, L>) -> bool {
        let prefs = cx.settings.panel;
        self.pending = Some(prefs);
        Self::publish(&prefs, cx);
        true
    }

    fn on_save<H: PrinterHost, L: SerialLink>(&mut self, cx: &mut ScreenContext<'_, H, L>) {
        if let Some(prefs) = self.pending.take() {
            if prefs != cx.settings.panel {
                cx.settings.panel = prefs;
                cx.requests.save_settings = true;
            }
        }
    }

    fn on_back<H: PrinterHost, L: SerialLink>(&mut self, cx: &mut ScreenContext<'_, H, L>) {
        if self.pending.take().is_some() {
            let saved = cx.settings.panel;
            Self::publish(&saved, cx);
        }
    }
}
