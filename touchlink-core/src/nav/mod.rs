//! Page model and navigation history
//!
//! Pages carry their navigation policy as flags. The stack records where
//! the user came from so that Back and Save can return there.

pub mod page;
pub mod stack;

pub use page::Page;
pub use stack::{NavigationContext, NavigationStack, Navigator, HISTORY_CAPACITY};
