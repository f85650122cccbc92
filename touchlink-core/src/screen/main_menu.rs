//! Main menu

use touchlink_hal::SerialLink;

use super::{Screen, ScreenContext};
use crate::action::{Action, KeyValue};
use crate::gcode;
use crate::nav::Page;
use crate::traits::PrinterHost;

#[derive(Debug, Default)]
pub struct MainMenu;

impl MainMenu {
    pub const HOME_ALL: KeyValue = KeyValue(0x0001);
    pub const DISABLE_STEPPERS: KeyValue = KeyValue(0x0002);
    pub const FACTORY_RESET: KeyValue = KeyValue(0x0003);
}

impl Screen for MainMenu {
    const PAGE: Page = Page::MAIN;
    const ACTION: Action = Action::MainMenu;

    fn on_dispatch<H: PrinterHost, L: SerialLink>(
        &mut self,
        key: KeyValue,
        cx: &mut ScreenContext<'_, H, L>,
    ) -> bool {
        match key {
            Self::HOME_ALL => {
                if cx.is_printing() {
                    debug!("home refused while printing");
                } else {
                    cx.inject(gcode::HOME_ALL);
                    cx.show(Page::HOMING, Self::ACTION);
                }
                true
            }
            Self::DISABLE_STEPPERS => {
                if !cx.is_printing() {
                    cx.inject(gcode::DISABLE_STEPPERS);
                    *cx.homed = false;
                }
                true
            }
            Self::FACTORY_RESET => {
                if cx.is_printing() {
                    debug!("factory reset refused while printing");
                } else {
                    cx.detour(Page::CONFIRM_RESET, Action::ConfirmReset);
                }
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::harness::Rig;

    #[test]
    fn test_home_all() {
        let mut rig = Rig::new();
        assert!(MainMenu.dispatch(MainMenu::HOME_ALL, &mut rig.cx()));
        assert_eq!(rig.host.lines(), ["G28"]);
        assert_eq!(rig.page(), Page::HOMING);
    }

    #[test]
    fn test_disable_steppers_forgets_home() {
        let mut rig = Rig::new();
        rig.homed = true;
        MainMenu.dispatch(MainMenu::DISABLE_STEPPERS, &mut rig.cx());
        assert!(!rig.homed);
        assert_eq!(rig.host.lines(), ["M84"]);
    }

    #[test]
    fn test_factory_reset_remembers_origin() {
        let mut rig = Rig::new();
        MainMenu.dispatch(MainMenu::FACTORY_RESET, &mut rig.cx());
        assert_eq!(rig.page(), Page::CONFIRM_RESET);
        assert_eq!(rig.nav.forward().map(|c| c.page), Some(Page::MAIN));
    }

    #[test]
    fn test_factory_reset_refused_while_printing() {
        let mut rig = Rig::new();
        rig.cx().show(Page::TEMPERATURE, Action::Temperature);
        rig.nav.save_forward();
        rig.cx().show(Page::MAIN, Action::MainMenu);
        rig.host.printing = true;
        assert!(MainMenu.dispatch(MainMenu::FACTORY_RESET, &mut rig.cx()));
        assert_eq!(rig.page(), Page::MAIN);
        assert_eq!(rig.nav.forward().map(|c| c.page), Some(Page::TEMPERATURE));
    }

    #[test]
    fn test_no_motion_while_printing() {
        let mut rig = Rig::new();
        rig.host.printing = true;
        MainMenu.dispatch(MainMenu::HOME_ALL, &mut rig.cx());
        assert!(rig.host.commands.is_empty());
    }
}
