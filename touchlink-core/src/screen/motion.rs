//! Manual axis moves

use touchlink_hal::SerialLink;

use super::{Screen, ScreenContext};
use crate::action::{Action, KeyValue};
use crate::gcode;
use crate::layout;
use crate::nav::Page;
use crate::traits::{Axis, PrinterHost};

/// Selectable jog distances in tenths of a millimetre
pub const JOG_STEPS: [i16; 3] = [1, 10, 100];

#[derive(Debug, Default)]
pub struct MotionScreen {
    step_index: usize,
}

impl MotionScreen {
    pub const X_PLUS: KeyValue = KeyValue(0x0001);
    pub const X_MINUS: KeyValue = KeyValue(0x0002);
    pub const Y_PLUS: KeyValue = KeyValue(0x0003);
    pub const Y_MINUS: KeyValue = KeyValue(0x0004);
    pub const Z_PLUS: KeyValue = KeyValue(0x0005);
    pub const Z_MINUS: KeyValue = KeyValue(0x0006);
    pub const NEXT_STEP: KeyValue = KeyValue(0x0007);
    pub const HOME: KeyValue = KeyValue(0x0008);

    /// Current jog distance in tenths of a millimetre
    pub fn step(&self) -> i16 {
        JOG_STEPS[self.step_index % JOG_STEPS.len()]
    }

    fn publish_step<H: PrinterHost, L: SerialLink>(&self, cx: &mut ScreenContext<'_, H, L>) {
        cx.panel()
            .write_words(layout::JOG_STEP, &[self.step() as u16]);
    }

    fn jog_for(&self, key: KeyValue) -> Option<(Axis, i16)> {
        let step = self.step();
        match key {
            Self::X_PLUS => Some((Axis::X, step)),
            Self::X_MINUS => Some((Axis::X, -step)),
            Self::Y_PLUS => Some((Axis::Y, step)),
            Self::Y_MINUS => Some((Axis::Y, -step)),
            Self::Z_PLUS => Some((Axis::Z, step)),
            Self::Z_MINUS => Some((Axis::Z, -step)),
            _ => None,
        }
    }
}

impl Screen for MotionScreen {
    const PAGE: Page = Page::MOTION;
    const ACTION: Action = Action::Motion;

    fn on_dispatch<H: PrinterHost, L: SerialLink>(
        &mut self,
        key: KeyValue,
        cx: &mut ScreenContext<'_, H, L>,
    ) -> bool {
        if let Some((axis, tenths)) = self.jog_for(key) {
            if cx.is_printing() {
                debug!("jog refused while printing");
            } else {
                cx.inject(&gcode::jog(axis, tenths));
            }
            return true;
        }
        match key {
            Self::NEXT_STEP => {
                self.step_index = (self.step_index + 1) % JOG_STEPS.len();
                self.publish_step(cx);
                true
            }
            Self::HOME => {
                if !cx.is_printing() {
                    cx.inject(gcode::HOME_ALL);
                }
                true
            }
            _ => false,
        }
    }

    fn on_enter<H: PrinterHost, L: SerialLink>(&mut self, cx: &mut ScreenContext<'_, H, L>) -> bool {
        self.publish_step(cx);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::harness::Rig;

    #[test]
    fn test_jog_uses_selected_step() {
        let mut rig = Rig::new();
        let mut screen = MotionScreen::default();
        screen.dispatch(KeyValue::SHOW, &mut rig.cx());
        screen.dispatch(MotionScreen::NEXT_STEP, &mut rig.cx());
        screen.dispatch(MotionScreen::Y_MINUS, &mut rig.cx());
        assert_eq!(rig.host.lines(), ["G91", "G0 Y-1.00", "G90"]);
    }

    #[test]
    fn test_step_cycles() {
        let mut screen = MotionScreen::default();
        let mut rig = Rig::new();
        for _ in 0..3 {
            screen.dispatch(MotionScreen::NEXT_STEP, &mut rig.cx());
        }
        assert_eq!(screen.step(), 1);
    }

    #[test]
    fn test_leaving_waits_for_moves() {
        let mut rig = Rig::new();
        let mut screen = MotionScreen::default();
        screen.dispatch(KeyValue::SHOW, &mut rig.cx());
        rig.host.queued_moves = 3;
        screen.dispatch(KeyValue::BACK, &mut rig.cx());
        assert_eq!(rig.host.yields, 3);
        assert_eq!(rig.page(), Page::MAIN);
    }

    #[test]
    fn test_jog_refused_while_printing() {
        let mut rig = Rig::new();
        rig.host.printing = true;
        let mut screen = MotionScreen::default();
        assert!(screen.dispatch(MotionScreen::Z_PLUS, &mut rig.cx()));
        assert!(rig.host.commands.is_empty());
    }
}
