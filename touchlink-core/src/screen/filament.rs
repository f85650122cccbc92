//! Filament load and unload

use touchlink_hal::SerialLink;

use super::{Screen, ScreenContext};
use crate::action::{Action, KeyValue};
use crate::nav::Page;
use crate::scheduler::{FilamentMove, Job, JobKind};
use crate::traits::{Heater, PrinterHost};

#[derive(Debug, Default)]
pub struct FilamentScreen;

impl FilamentScreen {
    pub const LOAD: KeyValue = KeyValue(0x0001);
    pub const UNLOAD: KeyValue = KeyValue(0x0002);
    /// Heat the hotend to the extrusion minimum
    pub const PREHEAT: KeyValue = KeyValue(0x0003);

    fn owns_job(kind: Option<JobKind>) -> bool {
        matches!(kind, Some(JobKind::Load) | Some(JobKind::Unload))
    }

    fn start<H: PrinterHost, L: SerialLink>(&self, unload: bool, cx: &mut ScreenContext<'_, H, L>) {
        if cx.is_printing() {
            debug!("filament change refused while printing");
            return;
        }
        let prefs = &cx.settings.filament;
        let step = cx.config.filament_step_mm;
        let job = if unload {
            FilamentMove::unload(prefs, step)
        } else {
            FilamentMove::load(prefs, step)
        };
        cx.scheduler.start(Job::Filament(job), cx.now_ms);
    }
}

impl Screen for FilamentScreen {
    const PAGE: Page = Page::FILAMENT;
    const ACTION: Action = Action::Filament;

    fn on_dispatch<H: PrinterHost, L: SerialLink>(
        &mut self,
        key: KeyValue,
        cx: &mut ScreenContext<'_, H, L>,
    ) -> bool {
        match key {
            Self::LOAD => self.start(false, cx),
            Self::UNLOAD => self.start(true, cx),
            Self::PREHEAT => {
                let min = cx.settings.filament.min_temp_c as i16;
                if cx.host().target_temperature(Heater::Hotend) < min {
                    cx.host_mut().set_target_temperature(Heater::Hotend, min);
                }
            }
            _ => return false,
        }
        true
    }

    fn on_back<H: PrinterHost, L: SerialLink>(&mut self, cx: &mut ScreenContext<'_, H, L>) {
        if Self::owns_job(cx.scheduler.kind()) {
            cx.scheduler.abort(&mut *cx.io.host);
        }
    }

    fn on_abort<H: PrinterHost, L: SerialLink>(&mut self, cx: &mut ScreenContext<'_, H, L>) {
        if Self::owns_job(cx.scheduler.kind()) {
            cx.scheduler.abort(&mut *cx.io.host);
            cx.show(Self::PAGE, Self::ACTION);
        }
    }
}
