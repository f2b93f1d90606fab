//! Interactive and single-shot front-ends.

pub mod chat;
pub mod exec;
