//! Request handlers.

mod entries;
mod system;

#[cfg(test)]
mod entries_test;

pub use entries::*;
pub use system::*;
