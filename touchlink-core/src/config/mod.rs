//! Configuration types
//!
//! Board-agnostic session configuration, storable as postcard binary data.

pub mod session;

pub use session::*;
