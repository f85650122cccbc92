//! Screen capabilities and routing
//!
//! Each panel screen owns one [`Action`] and, usually, one [`Page`]. A
//! touch on that action is handed to the screen's [`Screen::dispatch`],
//! which tries the screen's own keys first and then falls back to the
//! shared show/save/back/abort handling.
//!
//! The set of screens is closed: [`Screens::dispatch`] matches every
//! [`Action`] exhaustively, so adding an action without a screen does not
//! compile.

pub mod confirm_reset;
pub mod filament;
pub mod leveling;
pub mod main_menu;
pub mod motion;
pub mod popup;
pub mod preferences;
pub mod print_status;
pub mod temperature;

pub use confirm_reset::ConfirmReset;
pub use filament::FilamentScreen;
pub use leveling::LevelingScreen;
pub use main_menu::MainMenu;
pub use motion::MotionScreen;
pub use popup::Popup;
pub use preferences::PreferencesScreen;
pub use print_status::PrintStatus;
pub use temperature::TemperatureScreen;

use touchlink_hal::SerialLink;

use crate::action::{Action, KeyValue};
use crate::config::SessionConfig;
use crate::nav::{NavigationContext, NavigationStack, Navigator, Page};
use crate::panel::Panel;
use crate::scheduler::Scheduler;
use crate::settings::{LedgerState, Settings};
use crate::status::StatusReporter;
use crate::traits::PrinterHost;

/// Work a screen asks the session to do once dispatch returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Requests {
    /// Persist the live settings
    pub save_settings: bool,
    /// Reset settings to defaults and persist them
    pub factory_reset: bool,
    /// Screen whose entry waits for homing to finish
    pub deferred: Option<Action>,
}

/// Everything the navigation stack touches while switching pages
pub struct NavIo<'a, H: PrinterHost, L: SerialLink> {
    pub host: &'a mut H,
    pub panel: &'a mut Panel<L>,
    pub status: &'a mut StatusReporter,
}

impl<H: PrinterHost, L: SerialLink> NavIo<'_, H, L> {
    /// Stands in for `idle` while a dispatch waits on motion
    ///
    /// Only status goes out; inbound frames and job steps wait for the
    /// dispatch to return.
    pub fn guarded_tick(&mut self) {
        let now = self.host.now_ms();
        self.status.flush(&*self.host, &mut *self.panel, now, false);
    }
}

impl<H: PrinterHost, L: SerialLink> Navigator for NavIo<'_, H, L> {
    fn is_printing(&self) -> bool {
        self.host.is_printing()
    }

    fn is_motion_idle(&self) -> bool {
        self.host.is_motion_queue_empty()
    }

    fn wait(&mut self) {
        self.host.yield_now();
        self.guarded_tick();
    }

    fn display(&mut self, page: Page) {
        self.panel.show_page(page);
    }
}

/// State a screen may read or change while handling a touch
pub struct ScreenContext<'a, H: PrinterHost, L: SerialLink> {
    pub nav: &'a mut NavigationStack,
    pub io: NavIo<'a, H, L>,
    pub settings: &'a mut Settings,
    pub scheduler: &'a mut Scheduler,
    pub requests: &'a mut Requests,
    pub config: &'a SessionConfig,
    pub ledger_state: LedgerState,
    /// Axes known since the last homing cycle
    pub homed: &'a mut bool,
    pub now_ms: u32,
}

impl<H: PrinterHost, L: SerialLink> ScreenContext<'_, H, L> {
    /// Switch to `page` owned by `action`
    pub fn show(&mut self, page: Page, action: Action) -> bool {
        self.nav.show(NavigationContext::new(page, action), &mut self.io)
    }

    /// Switch to `page`, remembering the current page for [`Self::return_forward`]
    pub fn detour(&mut self, page: Page, action: Action) -> bool {
        self.nav.detour(NavigationContext::new(page, action), &mut self.io)
    }

    /// One step back in history
    pub fn back(&mut self) -> NavigationContext {
        self.nav.back(1, &mut self.io)
    }

    /// Return to the remembered page, or one step back if there is none
    pub fn return_forward(&mut self) {
        if !self.nav.show_forward(&mut self.io) {
            self.back();
        }
    }

    pub fn host(&self) -> &H {
        &*self.io.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut *self.io.host
    }

    pub fn panel(&mut self) -> &mut Panel<L> {
        &mut *self.io.panel
    }

    pub fn inject(&mut self, gcode: &str) {
        debug!("inject {}", gcode);
        self.io.host.inject_command(gcode);
    }

    pub fn is_printing(&self) -> bool {
        self.io.host.is_printing()
    }
}

/// One panel screen
pub trait Screen {
    /// Page this screen shows, [`Page::NONE`] if it never owns one
    const PAGE: Page;
    /// Event space the screen owns
    const ACTION: Action;

    /// Screen-specific keys; return false for anything unrecognized
    fn on_dispatch<H: PrinterHost, L: SerialLink>(
        &mut self,
        key: KeyValue,
        cx: &mut ScreenContext<'_, H, L>,
    ) -> bool {
        let _ = (key, cx);
        false
    }

    /// Called before the page is shown; false keeps the current page
    fn on_enter<H: PrinterHost, L: SerialLink>(&mut self, cx: &mut ScreenContext<'_, H, L>) -> bool {
        let _ = cx;
        true
    }

    /// Commit pending edits
    fn on_save<H: PrinterHost, L: SerialLink>(&mut self, cx: &mut ScreenContext<'_, H, L>) {
        let _ = cx;
    }

    /// Discard pending edits
    fn on_back<H: PrinterHost, L: SerialLink>(&mut self, cx: &mut ScreenContext<'_, H, L>) {
        let _ = cx;
    }

    /// Cancel in-flight work
    fn on_abort<H: PrinterHost, L: SerialLink>(&mut self, cx: &mut ScreenContext<'_, H, L>) {
        let _ = cx;
    }

    /// Handle one touch; false if the key means nothing to this screen
    fn dispatch<H: PrinterHost, L: SerialLink>(
        &mut self,
        key: KeyValue,
        cx: &mut ScreenContext<'_, H, L>,
    ) -> bool {
        if self.on_dispatch(key, cx) {
            return true;
        }
        match key {
            KeyValue::SHOW => {
                if self.on_enter(cx) && !Self::PAGE.is_none() {
                    cx.show(Self::PAGE, Self::ACTION);
                }
                true
            }
            KeyValue::SAVE => {
                self.on_save(cx);
                cx.back();
                true
            }
            KeyValue::BACK => {
                self.on_back(cx);
                cx.back();
                true
            }
            KeyValue::ABORT => {
                self.on_abort(cx);
                true
            }
            _ => false,
        }
    }
}

/// State of every screen, routed by action
#[derive(Debug, Default)]
pub struct Screens {
    pub main: MainMenu,
    pub print_status: PrintStatus,
    pub temperature: TemperatureScreen,
    pub motion: MotionScreen,
    pub leveling: LevelingScreen,
    pub filament: FilamentScreen,
    pub preferences: PreferencesScreen,
    pub confirm_reset: ConfirmReset,
    pub popup: Popup,
}

impl Screens {
    /// Route `key` to the screen owning `action`
    pub fn dispatch<H: PrinterHost, L: SerialLink>(
        &mut self,
        action: Action,
        key: KeyValue,
        cx: &mut ScreenContext<'_, H, L>,
    ) -> bool {
        match action {
            Action::MainMenu => self.main.dispatch(key, cx),
            Action::PrintStatus => self.print_status.dispatch(key, cx),
            Action::Temperature => self.temperature.dispatch(key, cx),
            Action::Motion => self.motion.dispatch(key, cx),
            Action::Leveling => self.leveling.dispatch(key, cx),
            Action::Filament => self.filament.dispatch(key, cx),
            Action::Preferences => self.preferences.dispatch(key, cx),
            Action::ConfirmReset => self.confirm_reset.dispatch(key, cx),
            Action::Popup => self.popup.dispatch(key, cx),
        }
    }

    /// Page owned by the screen for `action`
    pub fn page_for(action: Action) -> Page {
        match action {
            Action::MainMenu => MainMenu::PAGE,
            Action::PrintStatus => PrintStatus::PAGE,
            Action::Temperature => TemperatureScreen::PAGE,
            Action::Motion => MotionScreen::PAGE,
            Action::Leveling => LevelingScreen::PAGE,
            Action::Filament => FilamentScreen::PAGE,
            Action::Preferences => PreferencesScreen::PAGE,
            Action::ConfirmReset => ConfirmReset::PAGE,
            Action::Popup => Popup::PAGE,
        }
    }
}

#[cfg(test)]
pub(crate) mod harness {
    //! Owned session parts for driving a single screen in tests

    use super::*;
    use crate::mock::{MockHost, MockLink};

    pub struct Rig {
        pub nav: NavigationStack,
        pub host: MockHost,
        pub panel: Panel<MockLink>,
        pub status: StatusReporter,
        pub settings: Settings,
        pub scheduler: Scheduler,
        pub requests: Requests,
        pub config: SessionConfig,
        pub ledger_state: LedgerState,
        pub homed: bool,
    }

    impl Rig {
        pub fn new() -> Self {
            let config = SessionConfig::default();
            Self {
                nav: NavigationStack::new(NavigationContext::new(Page::MAIN, Action::MainMenu)),
                host: MockHost::new(),
                panel: Panel::new(MockLink::new(), 8),
                status: StatusReporter::new(config.status_interval_ms),
                settings: Settings::default(),
                scheduler: Scheduler::new(config.job_step_ms),
                requests: Requests::default(),
                config,
                ledger_state: LedgerState::Valid,
                homed: false,
            }
        }

        pub fn cx(&mut self) -> ScreenContext<'_, MockHost, MockLink> {
            let now_ms = self.host.now;
            ScreenContext {
                nav: &mut self.nav,
                io: NavIo {
                    host: &mut self.host,
                    panel: &mut self.panel,
                    status: &mut self.status,
                },
                settings: &mut self.settings,
                scheduler: &mut self.scheduler,
                requests: &mut self.requests,
                config: &self.config,
                ledger_state: self.ledger_state,
                homed: &mut self.homed,
                now_ms,
            }
        }

        pub fn page(&self) -> Page {
            self.nav.current().page
        }

        pub fn pages_shown(&self) -> std::vec::Vec<u8> {
            self.panel.link().pages_shown()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::harness::Rig;
    use super::*;

    #[test]
    fn test_show_switches_page() {
        let mut rig = Rig::new();
        let mut screens = Screens::default();
        assert!(screens.dispatch(Action::Temperature, KeyValue::SHOW, &mut rig.cx()));
        assert_eq!(rig.page(), Page::TEMPERATURE);
        assert_eq!(rig.pages_shown(), [Page::TEMPERATURE.id]);
    }

    #[test]
    fn test_back_returns() {
        let mut rig = Rig::new();
        let mut screens = Screens::default();
        screens.dispatch(Action::Temperature, KeyValue::SHOW, &mut rig.cx());
        assert!(screens.dispatch(Action::Temperature, KeyValue::BACK, &mut rig.cx()));
        assert_eq!(rig.page(), Page::MAIN);
    }

    #[test]
    fn test_unknown_key_unhandled() {
        let mut rig = Rig::new();
        let mut screens = Screens::default();
        assert!(!screens.dispatch(Action::MainMenu, KeyValue(0x0077), &mut rig.cx()));
        assert!(rig.pages_shown().is_empty());
    }

    #[test]
    fn test_popup_show_keeps_page() {
        let mut rig = Rig::new();
        let mut screens = Screens::default();
        assert!(screens.dispatch(Action::Popup, KeyValue::SHOW, &mut rig.cx()));
        assert_eq!(rig.page(), Page::MAIN);
        assert!(rig.pages_shown().is_empty());
    }

    #[test]
    fn test_enter_no_print_refused_silently() {
        let mut rig = Rig::new();
        rig.host.printing = true;
        let mut screens = Screens::default();
        assert!(screens.dispatch(Action::Preferences, KeyValue::SHOW, &mut rig.cx()));
        assert_eq!(rig.page(), Page::MAIN);
    }

    #[test]
    fn test_every_action_has_a_page() {
        for action in Action::ALL {
            let page = Screens::page_for(action);
            assert!(Page::from_id(page.id).is_some());
        }
    }
}
