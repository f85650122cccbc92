//! Runout and media popups
//!
//! Popups are shown by host events rather than by touch, so the screen owns
//! no page and SHOW does nothing.

use touchlink_hal::SerialLink;

use super::{Screen, ScreenContext};
use crate::action::{Action, KeyValue};
use crate::gcode;
use crate::nav::Page;
use crate::traits::PrinterHost;

#[derive(Debug, Default)]
pub struct Popup;

impl Popup {
    pub const OK: KeyValue = KeyValue(0x0001);
    /// Continue after the user dealt with a runout
    pub const RESUME: KeyValue = KeyValue(0x0002);
}

impl Screen for Popup {
    const PAGE: Page = Page::NONE;
    const ACTION: Action = Action::Popup;

    fn on_dispatch<H: PrinterHost, L: SerialLink>(
        &mut self,
        key: KeyValue,
        cx: &mut ScreenContext<'_, H, L>,
    ) -> bool {
        match key {
            Self::OK => {
                cx.back();
                true
            }
            Self::RESUME => {
                cx.inject(gcode::RESUME_AFTER_PROMPT);
                cx.back();
                true
            }
            _ => false,
        }
    }
}
