//! Paper Rush - a desk-clearing arcade game
//!
//! Core modules:
//! - `sim`: Deterministic session core (spawners, motion, collisions, scoring, power-ups)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, particles and input-to-velocity conversion live outside this crate.
//! The presentation layer feeds [`sim::TickInput`] commands in and reads the
//! [`sim::GameEvent`] feed back out.

pub mod sim;
pub mod tuning;

pub use sim::{GameContext, GameEvent, TickInput, tick};
pub use tuning::Tuning;

use glam::Vec2;

/// Simulation time in milliseconds
pub type Millis = u64;

/// Game configuration constants
pub mod consts {
    /// Reference frame length. Velocities are expressed in units per frame.
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Maximum frames integrated in one tick to prevent spiral of death
    pub const MAX_FRAME_SCALE: f32 = 4.0;

    /// Bin geometry (bins sit along the bottom edge)
    pub const BIN_WIDTH: f32 = 120.0;
    pub const BIN_HEIGHT: f32 = 80.0;
    /// Horizontal inset of the outer bins from the viewport edges
    pub const BIN_SIDE_MARGIN: f32 = 100.0;
    /// Bin center distance above the bottom edge
    pub const BIN_BOTTOM_OFFSET: f32 = 40.0;

    /// Receipt printer (top-left corner and size)
    pub const PRINTER_X: f32 = 50.0;
    pub const PRINTER_Y: f32 = 200.0;
    pub const PRINTER_WIDTH: f32 = 60.0;
    pub const PRINTER_HEIGHT: f32 = 40.0;

    /// Fax machine (top-left corner and size), right below the printer
    pub const FAX_X: f32 = 50.0;
    pub const FAX_Y: f32 = 260.0;
    pub const FAX_WIDTH: f32 = 70.0;
    pub const FAX_HEIGHT: f32 = 45.0;

    /// Papers fly in from this far outside the viewport
    pub const SPAWN_OFFSCREEN: f32 = 50.0;
    /// Keep spawns this far away from corners
    pub const SPAWN_EDGE_INSET: f32 = 100.0;

    /// Power-up collection radius
    pub const POWER_UP_RADIUS: f32 = 25.0;
}

/// Convert a tick's elapsed wall time into an integration scale.
///
/// 1.0 means exactly one reference frame passed at normal speed.
#[inline]
pub fn frame_scale(elapsed_ms: Millis, time_scale: f32) -> f32 {
    let frames = (elapsed_ms as f32 / consts::FRAME_MS).clamp(0.0, consts::MAX_FRAME_SCALE);
    frames * time_scale
}

/// Unit vector from `from` toward `to` (zero if they coincide)
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}
