//! Shared game logic for the signplay mini-games.
//!
//! Everything in this crate is deterministic and I/O free. The daemon (or any
//! future wasm front-end) owns the event loop and drives these types from its
//! own callbacks: clicks and accepted gestures both funnel into the same
//! [`session::RoundSession::select`] path, and round pacing runs on the wall
//! clock via `update_timing`, matching how the daemon ticks.

pub mod colors;
pub mod gesture;
pub mod letters;
pub mod math;
pub mod round;
pub mod session;
pub mod stats;

// Monotonic clock shim so cooldowns and feedback delays also work on wasm32.
pub(crate) mod time;
