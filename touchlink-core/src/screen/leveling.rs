//! Manual bed leveling
//!
//! Entry needs homed axes. When they are not, the screen starts a homing
//! cycle, parks the panel on the homing page and asks the session to
//! re-dispatch its SHOW once the host reports homing done.

use touchlink_hal::SerialLink;

use super::{Screen, ScreenContext};
use crate::action::{Action, KeyValue};
use crate::gcode;
use crate::layout;
use crate::nav::Page;
use crate::scheduler::{Job, JobKind, LevelingWalk};
use crate::settings::entries::MAX_Z_OFFSET_X100;
use crate::traits::PrinterHost;

/// Z offset change per press, hundredths of a millimetre
pub const Z_OFFSET_STEP: i16 = 5;

#[derive(Debug, Default)]
pub struct LevelingScreen {
    pending_z: Option<i16>,
}

impl LevelingScreen {
    pub const START_WALK: KeyValue = KeyValue(0x0001);
    pub const Z_UP: KeyValue = KeyValue(0x0002);
    pub const Z_DOWN: KeyValue = KeyValue(0x0003);

    pub fn pending_z(&self) -> Option<i16> {
        self.pending_z
    }

    fn adjust<H: PrinterHost, L: SerialLink>(&mut self, delta: i16, cx: &mut ScreenContext<'_, H, L>) {
        let current = self.pending_z.unwrap_or(cx.settings.leveling.z_offset_x100);
        let z = current
            .saturating_add(delta)
            .clamp(-MAX_Z_OFFSET_X100, MAX_Z_OFFSET_X100);
        self.pending_z = Some(z);
        cx.panel().write_words(layout::Z_OFFSET, &[z as u16]);
    }
}

impl Screen for LevelingScreen {
    const PAGE: Page = Page::LEVELING;
    const ACTION: Action = Action::Leveling;

    fn on_dispatch<H: PrinterHost, L: SerialLink>(
        &mut self,
        key: KeyValue,
        cx: &mut ScreenContext<'_, H, L>,
    ) -> bool {
        match key {
            Self::START_WALK => {
                let walk = LevelingWalk::new(
                    cx.config.bed_x_mm,
                    cx.config.bed_y_mm,
                    &cx.settings.leveling,
                );
                cx.scheduler.start(Job::Leveling(walk), cx.now_ms);
                true
            }
            Self::Z_UP => {
                self.adjust(Z_OFFSET_STEP, cx);
                true
            }
            Self::Z_DOWN => {
                self.adjust(-Z_OFFSET_STEP, cx);
                true
            }
            _ => false,
        }
    }

    fn on_enter<H: PrinterHost, L: SerialLink>(&mut self, cx: &mut ScreenContext<'_, H, L>) -> bool {
        if cx.is_printing() {
            // Let navigation refuse it
            return true;
        }
        if !*cx.homed {
            info!("leveling waits for homing");
            cx.inject(gcode::HOME_ALL);
            cx.requests.deferred = Some(Self::ACTION);
            cx.show(Page::HOMING, Self::ACTION);
            return false;
        }
        self.pending_z = None;
        let z = cx.settings.leveling.z_offset_x100;
        cx.panel().write_words(layout::Z_OFFSET, &[z as u16]);
        true
    }

    fn on_save<H: PrinterHost, L: SerialLink>(&mut self, cx: &mut ScreenContext<'_, H, L>) {
        if let Some(z) = self.pending_z.take() {
            if z != cx.settings.leveling.z_offset_x100 {
                cx.settings.leveling.z_offset_x100 = z;
                cx.inject(&gcode::z_offset(z));
                cx.requests.save_settings = true;
            }
        }
    }

    fn on_back<H: PrinterHost, L: SerialLink>(&mut self, cx: &mut ScreenContext<'_, H, L>) {
        self.pending_z = None;
        cx.requests.deferred = None;
        if cx.scheduler.kind() == Some(JobKind::Leveling) {
            cx.scheduler.abort(&mut *cx.io.host);
        }
    }

    fn on_abort<H: PrinterHost, L: SerialLink>(&mut self, cx: &mut ScreenContext<'_, H, L>) {
        cx.requests.deferred = None;
        if cx.scheduler.kind() == Some(JobKind::Leveling) {
            cx.scheduler.abort(&mut *cx.io.host);
            cx.show(Self::PAGE, Self::ACTION);
        }
    }
}
