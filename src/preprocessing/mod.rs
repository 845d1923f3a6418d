//! Audio preprocessing modules
//!
//! This module contains utilities for preparing audio for matching:
//! - Channel mixing (stereo to mono)
//! - Silence trimming of reference clips

pub mod channel_mixer;
pub mod silence;
