//! Events emitted during a tick.
//!
//! The presentation layer consumes these for animation and sound. Each event
//! carries everything needed to draw it without looking at core state.

use glam::Vec2;
use serde::Serialize;

use super::entity::{BinId, EntityId, PaperKind, PaperSource, PowerUpKind};

/// What kind of entity appeared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityKind {
    Paper {
        kind: PaperKind,
        source: PaperSource,
    },
    PowerUp {
        kind: PowerUpKind,
    },
}

/// Why an entity left the desk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RemovalReason {
    /// Paper dropped into a bin (right or wrong)
    Scored,
    /// Paper sat past its grace period, or a power-up timed out
    Expired,
    /// Paper fell off the bottom of the desk
    Lost,
    /// Power-up picked up
    Collected,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    EntitySpawned {
        id: EntityId,
        kind: EntityKind,
        position: Vec2,
        velocity: Vec2,
    },
    EntityRemoved {
        id: EntityId,
        reason: RemovalReason,
    },
    ScoreChanged {
        delta: i64,
        new_score: i64,
        combo: u32,
        multiplier: u32,
    },
    /// Paper hit a bin (points popup)
    PaperScored {
        id: EntityId,
        position: Vec2,
        points: i64,
        combo: u32,
        bin: BinId,
        valid: bool,
    },
    /// Paper just crossed its time limit (start flashing it)
    PaperOverdue {
        id: EntityId,
    },
    /// Combo ran out of time
    ComboBroken {
        previous: u32,
    },
    PowerUpActivated {
        kind: PowerUpKind,
    },
    PowerUpExpired {
        kind: PowerUpKind,
    },
    WindGust {
        direction: Vec2,
        pulse_index: u32,
    },
}
