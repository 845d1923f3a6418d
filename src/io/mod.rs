//! Audio I/O modules
//!
//! Decoding with Symphonia, WAV output with hound and tag copying with lofty.
//! The matching engine never touches files; these are the collaborators the
//! binary wires in.

pub mod decoder;
pub mod tags;
pub mod writer;
