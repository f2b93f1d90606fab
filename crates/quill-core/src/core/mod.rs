//! Session history, update events, and the per-exchange read loop.

pub mod events;
pub mod exchange;
pub mod session;
