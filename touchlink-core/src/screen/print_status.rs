//! Print status: pause, resume and stop the running job

use touchlink_hal::SerialLink;

use super::{Screen, ScreenContext};
use crate::action::{Action, KeyValue};
use crate::gcode;
use crate::nav::Page;
use crate::traits::PrinterHost;

#[derive(Debug, Default)]
pub struct PrintStatus;

impl PrintStatus {
    pub const PAUSE: KeyValue = KeyValue(0x0001);
    pub const RESUME: KeyValue = KeyValue(0x0002);
    pub const STOP: KeyValue = KeyValue(0x0003);
}

impl Screen for PrintStatus {
    const PAGE: Page = Page::PRINT_STATUS;
    const ACTION: Action = Action::PrintStatus;

    fn on_dispatch<H: PrinterHost, L: SerialLink>(
        &mut self,
        key: KeyValue,
        cx: &mut ScreenContext<'_, H, L>,
    ) -> bool {
        let command = match key {
            Self::PAUSE => gcode::PAUSE_PRINT,
            Self::RESUME => gcode::RESUME_PRINT,
            Self::STOP => gcode::STOP_PRINT,
            _ => return false,
        };
        if cx.is_printing() {
            cx.inject(command);
        } else {
            debug!("no print running, ignoring {}", key.raw());
        }
        true
    }
}
