//! Codec drivers, one sub-directory per part.

pub mod wm8731;
