//! Incremental stream assembly.
//!
//! Raw chunks in, growing response buffer out: split-safe UTF-8 decoding,
//! `data: ` record deframing, and an append-only buffer that pushes a
//! full snapshot to the consumer after every append.

mod assembler;
mod decode;
mod deframe;

pub use assembler::{StreamAssembler, StreamState};
pub use decode::Utf8Decoder;
pub use deframe::{RECORD_MARKER, deframe};
