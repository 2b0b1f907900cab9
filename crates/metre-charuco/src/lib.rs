//! ChArUco checkerboard boards for printable calibration sheets.
//!
//! A board is a grid of alternating black and white squares with an
//! ArUco/AprilTag marker in every white square. This crate validates board
//! specifications and renders them as bitmaps; marker dictionaries live in
//! `metre-aruco`.

mod board;
mod render;

pub use board::{CharucoBoard, CharucoBoardError, CharucoBoardSpec, MarkerLayout};
pub use render::BoardRenderError;
