//! ArUco/AprilTag marker dictionaries and printable marker bitmaps.
//!
//! This crate focuses on:
//! - embedded built-in dictionaries (compiled into the binary),
//! - turning a marker id into a crisp black/white bitmap at a requested size.
//!
//! It does **not** detect or decode markers.

pub mod builtins;
mod dictionary;
mod render;

pub use dictionary::Dictionary;
pub use render::{render_marker, MarkerRenderError};
