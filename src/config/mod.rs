//! Configuration module for chatglue
//!
//! This module handles the tunable knobs of the page behaviors (timer
//! delays, CSRF names, spinner class), including serialization and
//! deserialization to/from JSON and persistent storage to
//! platform-specific directories.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
