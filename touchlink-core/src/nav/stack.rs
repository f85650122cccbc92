//! Navigation stack
//!
//! Bounded back-history of (page, action) contexts, the current context,
//! and a single forward slot. All side effects (checking the printer,
//! waiting for motion, telling the panel which page to show) go through a
//! [`Navigator`] so the stack itself stays plain data.

use heapless::Deque;

use super::page::Page;
use crate::action::Action;

/// Maximum number of entries kept in back-history
pub const HISTORY_CAPACITY: usize = 8;

/// A page together with the action that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavigationContext {
    pub page: Page,
    pub action: Action,
}

impl NavigationContext {
    pub const fn new(page: Page, action: Action) -> Self {
        Self { page, action }
    }
}

/// Environment the stack navigates in
pub trait Navigator {
    /// A print job is running
    fn is_printing(&self) -> bool;

    /// Motion queue has drained
    fn is_motion_idle(&self) -> bool;

    /// Give the host a chance to make progress while waiting for motion
    fn wait(&mut self);

    /// Tell the panel to display `page`
    fn display(&mut self, page: Page);
}

/// Back-history, current context and forward slot
#[derive(Debug, Clone)]
pub struct NavigationStack {
    history: Deque<NavigationContext, HISTORY_CAPACITY>,
    current: NavigationContext,
    forward: Option<NavigationContext>,
    /// Bound on `wait` calls while leaving an ExitFinishMove page
    wait_limit: Option<u32>,
}

impl NavigationStack {
    /// Create a stack whose current context is `initial`
    ///
    /// Nothing is transmitted; the caller shows the first page explicitly.
    pub fn new(initial: NavigationContext) -> Self {
        Self {
            history: Deque::new(),
            current: initial,
            forward: None,
            wait_limit: None,
        }
    }

    /// Give up leaving an ExitFinishMove page after `limit` waits
    pub fn with_wait_limit(mut self, limit: Option<u32>) -> Self {
        self.wait_limit = limit;
        self
    }

    pub fn current(&self) -> NavigationContext {
        self.current
    }

    pub fn forward(&self) -> Option<NavigationContext> {
        self.forward
    }

    /// Number of entries in back-history
    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Back-history from oldest to newest
    pub fn history(&self) -> impl Iterator<Item = &NavigationContext> {
        self.history.iter()
    }

    /// Switch to `target`
    ///
    /// Returns false without changing anything if the target refuses to
    /// open during a print, or if the current page must wait for motion
    /// and the wait limit ran out.
    pub fn show<N: Navigator + ?Sized>(&mut self, target: NavigationContext, nav: &mut N) -> bool {
        if Self::refused(&target, nav) || !self.leave_current(nav) {
            return false;
        }

        if target.page == self.current.page {
            // Re-showing the same page replaces its context without growing history
            self.current = target;
        } else {
            self.push_current();
            self.current = target;
        }
        nav.display(self.current.page);
        true
    }

    /// Pop up to `n` entries from history and redisplay the result
    ///
    /// Stops early when the history runs out; with an empty history the
    /// current page is simply shown again.
    pub fn back<N: Navigator + ?Sized>(&mut self, n: usize, nav: &mut N) -> NavigationContext {
        if !self.leave_current(nav) {
            return self.current;
        }
        for _ in 0..n {
            match self.history.pop_back() {
                Some(previous) => self.current = previous,
                None => break,
            }
        }
        nav.display(self.current.page);
        self.current
    }

    /// Remember the current context for a later [`NavigationStack::show_forward`]
    pub fn save_forward(&mut self) {
        self.forward = Some(self.current);
    }

    /// Show `target` and remember where it was opened from
    ///
    /// The forward slot is only overwritten if `target` actually opened.
    pub fn detour<N: Navigator + ?Sized>(&mut self, target: NavigationContext, nav: &mut N) -> bool {
        let origin = self.current;
        let shown = self.show(target, nav);
        if shown {
            self.forward = Some(origin);
        }
        shown
    }

    /// Return to the remembered context
    ///
    /// The slot is read, not cleared. If the remembered page is still in
    /// history, history is unwound to below its newest entry so the page is
    /// never both current and recorded. Returns false when nothing was saved
    /// or the remembered page refuses to open.
    pub fn show_forward<N: Navigator + ?Sized>(&mut self, nav: &mut N) -> bool {
        let Some(target) = self.forward else {
            return false;
        };
        let recorded = self
            .history
            .iter()
            .enumerate()
            .filter(|(_, c)| c.page == target.page)
            .map(|(i, _)| i)
            .last();
        let Some(at) = recorded else {
            return self.show(target, nav);
        };

        if Self::refused(&target, nav) || !self.leave_current(nav) {
            return false;
        }
        while self.history.len() > at {
            let _ = self.history.pop_back();
        }
        self.current = target;
        nav.display(self.current.page);
        true
    }

    /// Drop any temporary pages found in history
    pub fn clear_temporaries(&mut self) {
        for _ in 0..self.history.len() {
            if let Some(entry) = self.history.pop_front() {
                if !entry.page.temporary {
                    let _ = self.history.push_back(entry);
                }
            }
        }
    }

    fn refused<N: Navigator + ?Sized>(target: &NavigationContext, nav: &N) -> bool {
        let refused = target.page.enter_no_print && nav.is_printing();
        if refused {
            debug!("page {} refused while printing", target.page.id);
        }
        refused
    }

    fn push_current(&mut self) {
        if self.current.page.temporary || self.current.page.is_none() {
            return;
        }
        if self.history.is_full() {
            let _ = self.history.pop_front();
        }
        let _ = self.history.push_back(self.current);
    }

    fn leave_current<N: Navigator + ?Sized>(&mut self, nav: &mut N) -> bool {
        if !self.current.page.exit_finish_move {
            return true;
        }
        let mut waits = 0u32;
        while !nav.is_motion_idle() {
            if let Some(limit) = self.wait_limit {
                if waits >= limit {
                    warn!("motion still busy leaving page {}", self.current.page.id);
                    return false;
                }
            }
            waits += 1;
            nav.wait();
        }
        true
    }
}
