//! Voice activity detection.

pub mod energy;
