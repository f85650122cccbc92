//! Factory reset confirmation
//!
//! Reached from the main menu, from a host request, or forced at start-up
//! when the stored settings were rejected. In the forced case there is no
//! way out except confirming.

use touchlink_hal::SerialLink;

use super::{Screen, ScreenContext};
use crate::action::{Action, KeyValue};
use crate::nav::Page;
use crate::settings::LedgerState;
use crate::traits::PrinterHost;

#[derive(Debug, Default)]
pub struct ConfirmReset;

impl Screen for ConfirmReset {
    const PAGE: Page = Page::CONFIRM_RESET;
    const ACTION: Action = Action::ConfirmReset;

    fn on_dispatch<H: PrinterHost, L: SerialLink>(
        &mut self,
        key: KeyValue,
        cx: &mut ScreenContext<'_, H, L>,
    ) -> bool {
        match key {
            KeyValue::SAVE => {
                cx.requests.factory_reset = true;
                cx.return_forward();
                true
            }
            KeyValue::BACK if cx.ledger_state == LedgerState::Mismatched => {
                debug!("reset must be confirmed");
                true
            }
            KeyValue::BACK => {
                cx.return_forward();
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

    fn open(rig: &mut Rig) {
        rig.nav.save_forward();
        rig.cx().show(Page::CONFIRM_RESET, Action::ConfirmReset);
    }

    #[test]
    fn test_confirm_requests_reset() {
        let mut rig = Rig::new();
        open(&mut rig);
        assert!(ConfirmReset.dispatch(KeyValue::SAVE, &mut rig.cx()));
        assert!(rig.requests.factory_reset);
        assert_eq!(rig.page(), Page::MAIN);
    }

    #[test]
    fn test_cancel_returns_to_origin() {
        let mut rig = Rig::new();
        open(&mut rig);
        ConfirmReset.dispatch(KeyValue::BACK, &mut rig.cx());
        assert!(!rig.requests.factory_reset);
        assert_eq!(rig.page(), Page::MAIN);
        assert!(rig.nav.history().all(|c| c.page != Page::CONFIRM_RESET));
    }

    #[test]
    fn test_cannot_cancel_when_mismatched() {
        let mut rig = Rig::new();
        rig.ledger_state = LedgerState::Mismatched;
        open(&mut rig);
        ConfirmReset.dispatch(KeyValue::BACK, &mut rig.cx());
        assert_eq!(rig.page(), Page::CONFIRM_RESET);
    }
}
