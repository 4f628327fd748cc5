//! Common, shared types.

pub mod body;
pub mod combat;
pub mod motion;
pub mod state;
pub mod tunables;

#[cfg(test)]
pub mod test_utils;
