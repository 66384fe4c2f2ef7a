//! Subtitle generation
//!
//! This module turns a record's metadata side-file into an SRT subtitle
//! file stored next to the recording.

pub mod encoder;
pub mod generator;
pub mod srt;

pub use encoder::{DanmakuSrtEncoder, EncodeError, SubtitleEncoder};
pub use generator::{GeneratedSubtitle, SubtitleGenerator};
