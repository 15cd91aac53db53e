//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (monotonic frame time, wall-clock timestamps)
//! - Input (key codes to game commands)
//! - Storage (LocalStorage on web)
//! - The JS-facing game handle (web only)

pub mod input;
pub mod storage;
pub mod time;
#[cfg(target_arch = "wasm32")]
pub mod web;
