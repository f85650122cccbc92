//! Session controller
//!
//! Owns every piece of panel state and is driven by two entry points from
//! the host firmware: [`Session::idle`] on every main loop pass and
//! [`Session::handle_event`] when something happens on the printer.
//!
//! One idle tick, in order:
//!
//! 1. receive at most one inbound frame and dispatch its touch
//! 2. advance the background job by at most one step
//! 3. flush status to the panel if the flush interval has passed
//!
//! A screen that blocks on motion during a dispatch never re-enters
//! `idle`: its waits go through [`NavIo::guarded_tick`], which only flushes
//! status. Inbound frames and job steps wait for the dispatch to return.

use touchlink_hal::{Checksum, Crc16, PersistentStore, SerialLink};
use touchlink_protocol::{Frame, FrameError, Register, Response};

use crate::action::{Action, KeyValue};
use crate::config::{ConfigError, SessionConfig};
use crate::events::HostEvent;
use crate::layout;
use crate::nav::{NavigationContext, NavigationStack, Page};
use crate::panel::Panel;
use crate::scheduler::Scheduler;
use crate::screen::{NavIo, Requests, ScreenContext, Screens};
use crate::settings::{Ledger, LedgerError, LedgerState, Settings};
use crate::status::StatusReporter;
use crate::traits::PrinterHost;

/// Counters for what the session has seen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionStats {
    /// Complete inbound frames
    pub frames: u32,
    /// Bytes dropped while looking for a header
    pub resyncs: u32,
    /// Frames discarded for a bad length or a stalled transfer
    pub malformed: u32,
    /// Touches handed to a screen
    pub dispatched: u32,
    /// Touches dropped inside the debounce window
    pub debounced: u32,
    /// Touches on a variable no screen owns
    pub unknown_actions: u32,
    /// Touches a screen did not recognize
    pub unhandled_keys: u32,
    /// Touches ignored while a factory reset is pending
    pub locked_out: u32,
    /// Save requests refused while a factory reset is pending
    pub refused_saves: u32,
}

/// Panel session
pub struct Session<H, L, S, C = Crc16>
where
    H: PrinterHost,
    L: SerialLink,
    S: PersistentStore,
    C: Checksum,
{
    host: H,
    panel: Panel<L>,
    store: S,
    checksum: C,
    config: SessionConfig,
    nav: NavigationStack,
    screens: Screens,
    settings: Settings,
    ledger: Ledger,
    scheduler: Scheduler,
    status: StatusReporter,
    requests: Requests,
    /// Last accepted touch and when it arrived
    last_action: Option<(Action, u32)>,
    homed: bool,
    stats: SessionStats,
}

impl<H, L, S> Session<H, L, S, Crc16>
where
    H: PrinterHost,
    L: SerialLink,
    S: PersistentStore,
{
    /// Create a session using the stock CRC-16 over the settings region
    pub fn new(host: H, link: L, store: S, config: SessionConfig) -> Result<Self, ConfigError> {
        Self::with_checksum(host, link, store, Crc16::new(), config)
    }
}

impl<H, L, S, C> Session<H, L, S, C>
where
    H: PrinterHost,
    L: SerialLink,
    S: PersistentStore,
    C: Checksum,
{
    /// Create a session with a host-supplied checksum
    ///
    /// Nothing is sent to the panel until [`Session::start`].
    pub fn with_checksum(
        host: H,
        link: L,
        store: S,
        checksum: C,
        config: SessionConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            host,
            panel: Panel::new(link, config.spin_limit),
            store,
            checksum,
            nav: NavigationStack::new(NavigationContext::new(Page::NONE, Action::MainMenu))
                .with_wait_limit(config.move_wait_limit),
            screens: Screens::default(),
            settings: Settings::default(),
            ledger: Ledger::new(config.settings_offset),
            scheduler: Scheduler::new(config.job_step_ms),
            status: StatusReporter::new(config.status_interval_ms),
            requests: Requests::default(),
            last_action: None,
            homed: false,
            stats: SessionStats::default(),
            config,
        })
    }

    /// Load settings and bring the panel to its first page
    ///
    /// A rejected settings layout leaves the panel on the confirm-reset page;
    /// until the reset is confirmed only that page accepts touches.
    pub fn start(&mut self) -> LedgerState {
        let state = self
            .ledger
            .load(&mut self.store, &mut self.checksum, &mut self.settings);
        self.panel.request_version();
        self.apply_panel_settings();

        self.show(Page::MAIN, Action::MainMenu);
        if state == LedgerState::Mismatched
            && !self.detour(Page::CONFIRM_RESET, Action::ConfirmReset)
        {
            warn!("confirm-reset page refused, touches stay locked");
        }

        let now = self.host.now_ms();
        self.status.flush(&self.host, &mut self.panel, now, true);
        state
    }

    /// One pass of the cooperative loop
    pub fn idle(&mut self) {
        let now = self.host.now_ms();
        self.receive(now);

        let finished = self.scheduler.tick(&mut self.host, now).is_some();
        self.status.set_job_progress(self.scheduler.progress());
        if finished {
            self.status.flush(&self.host, &mut self.panel, now, true);
        }
        // A dispatch may have waited on motion and moved the clock
        let now = self.host.now_ms();
        self.status.flush(&self.host, &mut self.panel, now, false);
    }

    /// React to a printer event
    pub fn handle_event(&mut self, event: HostEvent) {
        info!("host event {:?}", event);
        if event == HostEvent::HomingDone {
            self.homed = true;
        }
        if self.ledger.state() == LedgerState::Mismatched
            && event != HostEvent::FactoryResetRequested
        {
            debug!("navigation held until reset confirmed");
            if self.nav.current().page != Page::CONFIRM_RESET {
                self.show(Page::CONFIRM_RESET, Action::ConfirmReset);
            }
        } else {
            self.navigate_for(event);
        }
        self.drop_stale_deferred();

        if event.is_print_event() {
            let now = self.host.now_ms();
            self.status.flush(&self.host, &mut self.panel, now, true);
        }
    }

    fn navigate_for(&mut self, event: HostEvent) {
        match event {
            HostEvent::PrintStarted => {
                self.show(Page::PRINT_STATUS, Action::PrintStatus);
            }
            HostEvent::PrintPaused => {}
            HostEvent::PrintStopped => {
                self.nav.clear_temporaries();
                self.show(Page::MAIN, Action::MainMenu);
            }
            HostEvent::FilamentRunout => {
                self.show(Page::RUNOUT, Action::Popup);
            }
            HostEvent::MediaInserted | HostEvent::MediaRemoved | HostEvent::MediaError => {
                if let Some(message) = event.media_message() {
                    self.panel
                        .write_text(layout::MESSAGE, message, layout::MESSAGE_LEN);
                }
                self.show(Page::MEDIA, Action::Popup);
            }
            HostEvent::HomingDone => match self.requests.deferred.take() {
                Some(action) => {
                    let now = self.host.now_ms();
                    self.dispatch_action(action, KeyValue::SHOW, now);
                }
                None if self.nav.current().page == Page::HOMING => {
                    self.back();
                }
                None => {}
            },
            HostEvent::FactoryResetRequested => {
                if self.ledger.state() != LedgerState::Mismatched && self.host.is_printing() {
                    debug!("factory reset refused while printing");
                } else if self.nav.current().page != Page::CONFIRM_RESET {
                    self.detour(Page::CONFIRM_RESET, Action::ConfirmReset);
                }
            }
        }
    }

    /// Persist the live settings
    ///
    /// Refused while the stored layout is mismatched; confirming the factory
    /// reset is the only way to overwrite it.
    pub fn save_settings(&mut self) -> Result<(), LedgerError> {
        if self.ledger.state() == LedgerState::Mismatched {
            self.stats.refused_saves = self.stats.refused_saves.wrapping_add(1);
            warn!("save refused until reset confirmed");
            return Err(LedgerError::Invalid);
        }
        self.ledger
            .save(&mut self.store, &mut self.checksum, &self.settings)
    }

    fn receive(&mut self, now: u32) {
        match self.panel.poll() {
            Ok(frame) => {
                self.stats.frames = self.stats.frames.wrapping_add(1);
                self.handle_frame(frame, now);
            }
            Err(FrameError::NotReady) => {}
            Err(FrameError::BadHeader) => {
                self.stats.resyncs = self.stats.resyncs.wrapping_add(1);
            }
            Err(e) => {
                self.stats.malformed = self.stats.malformed.wrapping_add(1);
                warn!("inbound frame dropped: {:?}", e);
            }
        }
    }

    fn handle_frame(&mut self, mut frame: Frame, now: u32) {
        let response = Response::parse(&mut frame);
        match &response {
            Response::Ack => trace!("write acknowledged"),
            Response::Register { register, data, .. } if *register == Register::VERSION => {
                if let Some(&version) = data.first() {
                    self.panel.set_version(version);
                }
            }
            Response::Register { register, .. } => {
                debug!("register {:#x} report ignored", register.raw());
            }
            Response::Variables { start, .. } => {
                let start = *start;
                let Some(action) = Action::from_variable(start) else {
                    self.stats.unknown_actions = self.stats.unknown_actions.wrapping_add(1);
                    warn!("touch on unknown variable {:#x}", start.raw());
                    return;
                };
                match response.word(0) {
                    Some(word) => self.handle_touch(action, KeyValue(word), now),
                    None => warn!("touch on {:?} without key value", action),
                }
            }
            Response::Unsupported(command) => {
                warn!("unexpected command {:#x} from panel", command);
            }
        }
    }

    fn handle_touch(&mut self, action: Action, key: KeyValue, now: u32) {
        if let Some((last, at)) = self.last_action {
            if last == action && now.wrapping_sub(at) < self.config.debounce_ms {
                trace!("debounced {:?}", action);
                self.stats.debounced = self.stats.debounced.wrapping_add(1);
                return;
            }
        }
        if self.ledger.state() == LedgerState::Mismatched && action != Action::ConfirmReset {
            debug!("{:?} locked until reset confirmed", action);
            self.stats.locked_out = self.stats.locked_out.wrapping_add(1);
            return;
        }

        self.last_action = Some((action, now));
        self.dispatch_action(action, key, now);
    }

    fn dispatch_action(&mut self, action: Action, key: KeyValue, now: u32) {
        let handled = {
            let mut cx = ScreenContext {
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
                ledger_state: self.ledger.state(),
                homed: &mut self.homed,
                now_ms: now,
            };
            self.screens.dispatch(action, key, &mut cx)
        };

        self.stats.dispatched = self.stats.dispatched.wrapping_add(1);
        if !handled {
            self.stats.unhandled_keys = self.stats.unhandled_keys.wrapping_add(1);
            warn!("key {:#x} not handled by {:?}", key.raw(), action);
        }
        self.drop_stale_deferred();
        self.apply_requests();
    }

    /// A deferred entry only survives while the homing page is up
    fn drop_stale_deferred(&mut self) {
        if self.nav.current().page != Page::HOMING {
            if let Some(action) = self.requests.deferred.take() {
                debug!("deferred {:?} dropped", action);
            }
        }
    }

    fn apply_requests(&mut self) {
        if core::mem::take(&mut self.requests.factory_reset) {
            // A reset persists everything; a pending save is covered by it
            self.requests.save_settings = false;
            match self
                .ledger
                .factory_reset(&mut self.store, &mut self.checksum, &mut self.settings)
            {
                Ok(()) => self.apply_panel_settings(),
                Err(e) => warn!("factory reset not persisted: {:?}", e),
            }
        }
        if core::mem::take(&mut self.requests.save_settings) {
            if let Err(e) = self.save_settings() {
                warn!("settings not saved: {:?}", e);
            }
        }
    }

    fn apply_panel_settings(&mut self) {
        self.panel
            .write_register(Register::BRIGHTNESS, &[self.settings.panel.brightness]);
    }

    fn show(&mut self, page: Page, action: Action) -> bool {
        let mut io = NavIo {
            host: &mut self.host,
            panel: &mut self.panel,
            status: &mut self.status,
        };
        self.nav.show(NavigationContext::new(page, action), &mut io)
    }

    fn detour(&mut self, page: Page, action: Action) -> bool {
        let mut io = NavIo {
            host: &mut self.host,
            panel: &mut self.panel,
            status: &mut self.status,
        };
        self.nav.detour(NavigationContext::new(page, action), &mut io)
    }

    fn back(&mut self) -> NavigationContext {
        let mut io = NavIo {
            host: &mut self.host,
            panel: &mut self.panel,
            status: &mut self.status,
        };
        self.nav.back(1, &mut io)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn panel(&self) -> &Panel<L> {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut Panel<L> {
        &mut self.panel
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn navigation(&self) -> &NavigationStack {
        &self.nav
    }

    pub fn current_page(&self) -> Page {
        self.nav.current().page
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ledger_state(&self) -> LedgerState {
        self.ledger.state()
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn screens(&self) -> &Screens {
        &self.screens
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn is_homed(&self) -> bool {
        self.homed
    }
}
