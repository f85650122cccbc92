//! Page identities
//!
//! The panel numbers its screens; the controller attaches three policy
//! flags to each number. The table is fixed at compile time.

/// A panel page and its navigation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Page {
    /// Page number as the panel knows it
    pub id: u8,
    /// Not recorded in back-history
    pub temporary: bool,
    /// Refuses to open while a print job is active
    pub enter_no_print: bool,
    /// Leaving it waits for the motion queue to drain
    pub exit_finish_move: bool,
}

impl Page {
    const fn plain(id: u8) -> Self {
        Self {
            id,
            temporary: false,
            enter_no_print: false,
            exit_finish_move: false,
        }
    }

    const fn temporary(mut self) -> Self {
        self.temporary = true;
        self
    }

    const fn enter_no_print(mut self) -> Self {
        self.enter_no_print = true;
        self
    }

    const fn exit_finish_move(mut self) -> Self {
        self.exit_finish_move = true;
        self
    }

    /// Placeholder for screens that never own a page
    pub const NONE: Page = Page::plain(0);
    pub const BOOT: Page = Page::plain(1);
    pub const MAIN: Page = Page::plain(2);
    pub const PRINT_STATUS: Page = Page::plain(3);
    pub const TEMPERATURE: Page = Page::plain(4);
    pub const MOTION: Page = Page::plain(5).exit_finish_move();
    pub const LEVELING: Page = Page::plain(6).enter_no_print().exit_finish_move();
    pub const FILAMENT: Page = Page::plain(7).exit_finish_move();
    pub const PREFERENCES: Page = Page::plain(8).enter_no_print();
    /// Must open even mid-print: a rejected settings store forces it at start-up
    pub const CONFIRM_RESET: Page = Page::plain(9).temporary();
    pub const RUNOUT: Page = Page::plain(10).temporary();
    pub const MEDIA: Page = Page::plain(11).temporary();
    pub const HOMING: Page = Page::plain(12).temporary().exit_finish_move();

    /// Every page in the table
    pub const ALL: [Page; 13] = [
        Page::NONE,
        Page::BOOT,
        Page::MAIN,
        Page::PRINT_STATUS,
        Page::TEMPERATURE,
        Page::MOTION,
        Page::LEVELING,
        Page::FILAMENT,
        Page::PREFERENCES,
        Page::CONFIRM_RESET,
        Page::RUNOUT,
        Page::MEDIA,
        Page::HOMING,
    ];

    /// Look up a page by its panel number
    pub fn from_id(id: u8) -> Option<Page> {
        Self::ALL.iter().copied().find(|p| p.id == id)
    }

    /// True for the placeholder page
    pub const fn is_none(&self) -> bool {
        self.id == Page::NONE.id
    }
}
