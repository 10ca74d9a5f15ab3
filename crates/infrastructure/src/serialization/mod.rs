//! JSON helpers for the settings file and machine-readable CLI output.
//!
//! Output uses 2-space indentation and a trailing newline.

mod json;

pub use json::*;
