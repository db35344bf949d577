//! Deterministic session core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied timestamps only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod collision;
pub mod effects;
pub mod entity;
pub mod event;
pub mod motion;
pub mod schedule;
pub mod scoring;
pub mod spawner;
pub mod state;
pub mod store;
pub mod tick;

pub use autoplay::autoplay_input;
pub use collision::{Contact, detect_contacts};
pub use effects::{ActiveEffects, EffectState};
pub use entity::{Aabb, Bin, BinId, EntityId, Paper, PaperKind, PaperSource, PaperStatus, PowerUp, PowerUpKind};
pub use event::{EntityKind, GameEvent, RemovalReason};
pub use scoring::{Disposal, ScoreOutcome, ScoreState};
pub use spawner::{Spawner, SpawnerSet};
pub use state::{GameContext, OPENING_PAPERS, SessionSummary, Viewport};
pub use store::EntityStore;
pub use tick::{InputCommand, TickInput, activate_power_up, tick};
