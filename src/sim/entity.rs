//! Desk entities: papers, power-ups and bins
//!
//! These are plain data owned by the core. The renderer only ever sees copies
//! of positions and kinds through the event feed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::event::RemovalReason;
use crate::Millis;
use crate::consts::*;
use crate::tuning::ScoringTuning;

/// Unique handle for anything that lives in the entity store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Bin identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinId {
    Trash,
    Recycle,
    Shred,
}

impl BinId {
    pub const ALL: [BinId; 3] = [BinId::Trash, BinId::Recycle, BinId::Shred];

    pub fn as_str(&self) -> &'static str {
        match self {
            BinId::Trash => "trash",
            BinId::Recycle => "recycle",
            BinId::Shred => "shred",
        }
    }

    /// Base points for a correct drop
    pub fn points(&self, scoring: &ScoringTuning) -> i64 {
        match self {
            BinId::Trash => scoring.trash_points,
            BinId::Recycle => scoring.recycle_points,
            BinId::Shred => scoring.shred_points,
        }
    }
}

/// Paper types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaperKind {
    Regular,
    Sticky,
    /// Must be shredded
    Confidential,
    Crumpled,
    /// Must be recycled
    Recyclable,
}

impl PaperKind {
    pub const ALL: [PaperKind; 5] = [
        PaperKind::Regular,
        PaperKind::Sticky,
        PaperKind::Confidential,
        PaperKind::Crumpled,
        PaperKind::Recyclable,
    ];

    /// The fax only sends paperwork that matters
    pub const FAX: [PaperKind; 3] = [
        PaperKind::Confidential,
        PaperKind::Regular,
        PaperKind::Recyclable,
    ];

    /// Bins this kind may legally go in
    pub fn valid_bins(&self) -> &'static [BinId] {
        match self {
            PaperKind::Confidential => &[BinId::Shred],
            PaperKind::Recyclable => &[BinId::Recycle],
            PaperKind::Regular | PaperKind::Sticky | PaperKind::Crumpled => {
                &[BinId::Trash, BinId::Recycle]
            }
        }
    }

    /// Whether dropping this kind into `bin` scores
    #[inline]
    pub fn accepts(&self, bin: BinId) -> bool {
        self.valid_bins().contains(&bin)
    }

    /// Time on the desk before the paper goes overdue (ms)
    pub fn time_limit_ms(&self) -> Millis {
        match self {
            PaperKind::Regular => 15_000,
            PaperKind::Sticky => 12_000,
            PaperKind::Confidential => 10_000, // urgent!
            PaperKind::Crumpled => 20_000,
            PaperKind::Recyclable => 18_000,
        }
    }

    /// Side length of a standard sheet
    pub fn size(&self) -> f32 {
        match self {
            PaperKind::Regular => 40.0,
            PaperKind::Sticky => 35.0,
            PaperKind::Confidential => 45.0,
            PaperKind::Crumpled => 38.0,
            PaperKind::Recyclable => 42.0,
        }
    }
}

/// Where a paper came from (affects its shape and drag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSource {
    /// Flew in from a screen edge
    Edge,
    /// Receipt printer - narrow sheets
    Printer,
    /// Fax machine - short sheets
    Fax,
}

/// Lifecycle of a paper. Everything but `Active` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperStatus {
    Active,
    Scored,
    Penalized,
    Expired,
    Lost,
}

impl PaperStatus {
    /// Why a paper in this state left the desk. `None` while it's still active.
    pub fn removal_reason(&self) -> Option<RemovalReason> {
        match self {
            PaperStatus::Active => None,
            PaperStatus::Scored | PaperStatus::Penalized => Some(RemovalReason::Scored),
            PaperStatus::Expired => Some(RemovalReason::Expired),
            PaperStatus::Lost => Some(RemovalReason::Lost),
        }
    }
}

/// A disposable paper on the desk
#[derive(Debug, Clone, Serialize)]
pub struct Paper {
    pub id: EntityId,
    pub kind: PaperKind,
    pub source: PaperSource,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Bounding half-extent
    pub half_size: Vec2,
    /// Air drag fraction per frame
    pub drag: f32,
    /// Fixed at spawn, never mutated
    valid_bins: &'static [BinId],
    pub time_limit_ms: Millis,
    pub spawn_time: Millis,
    pub is_overdue: bool,
    pub status: PaperStatus,
}

impl Paper {
    pub fn new(
        id: EntityId,
        kind: PaperKind,
        source: PaperSource,
        pos: Vec2,
        vel: Vec2,
        drag: f32,
        spawn_time: Millis,
    ) -> Self {
        let size = kind.size();
        let (w, h) = match source {
            PaperSource::Edge => (size, size),
            PaperSource::Printer => (size * 0.8, size),
            PaperSource::Fax => (size, size * 0.7),
        };
        Self {
            id,
            kind,
            source,
            pos,
            vel,
            half_size: Vec2::new(w / 2.0, h / 2.0),
            drag,
            valid_bins: kind.valid_bins(),
            time_limit_ms: kind.time_limit_ms(),
            spawn_time,
            is_overdue: false,
            status: PaperStatus::Active,
        }
    }

    pub fn valid_bins(&self) -> &'static [BinId] {
        self.valid_bins
    }

    pub fn accepts(&self, bin: BinId) -> bool {
        self.valid_bins.contains(&bin)
    }

    /// How long the paper has been on the desk
    #[inline]
    pub fn time_on_desk(&self, now: Millis) -> Millis {
        now.saturating_sub(self.spawn_time)
    }

    /// Past its time limit (the overdue flag may not be set yet)
    pub fn is_past_limit(&self, now: Millis) -> bool {
        self.time_on_desk(now) > self.time_limit_ms
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.half_size)
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Everything moves at a fraction of normal speed
    SlowMo,
    /// Papers drift toward the center of the desk
    Magnet,
    /// Positive scores count twice
    DoublePoints,
    /// One-shot: fling every paper toward the center
    Vacuum,
    /// One-shot: stop every paper in place
    Freeze,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::SlowMo,
        PowerUpKind::Magnet,
        PowerUpKind::DoublePoints,
        PowerUpKind::Vacuum,
        PowerUpKind::Freeze,
    ];

    /// Timed effects have an active window; the rest fire once
    pub fn is_timed(&self) -> bool {
        matches!(
            self,
            PowerUpKind::SlowMo | PowerUpKind::Magnet | PowerUpKind::DoublePoints
        )
    }
}

/// A collectible drifting across the desk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: EntityId,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub spawn_time: Millis,
}

impl PowerUp {
    pub fn new(id: EntityId, kind: PowerUpKind, pos: Vec2, vel: Vec2, spawn_time: Millis) -> Self {
        Self {
            id,
            kind,
            pos,
            vel,
            radius: POWER_UP_RADIUS,
            spawn_time,
        }
    }

    pub fn is_expired(&self, now: Millis, ttl_ms: Millis) -> bool {
        now.saturating_sub(self.spawn_time) > ttl_ms
    }
}

/// A static scoring target. Immutable after layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub id: BinId,
    pub points: i64,
    pub center: Vec2,
    pub half_size: Vec2,
}

impl Bin {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.center, self.half_size)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, half_size: Vec2) -> Self {
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

}

/// Bin layout for a viewport: left, center and right along the bottom edge
pub fn layout_bins(width: f32, height: f32, scoring: &ScoringTuning) -> [Bin; 3] {
    let y = height - BIN_BOTTOM_OFFSET;
    let half_size = Vec2::new(BIN_WIDTH / 2.0, BIN_HEIGHT / 2.0);
    let xs = [BIN_SIDE_MARGIN, width / 2.0, width - BIN_SIDE_MARGIN];
    let mut bins = BinId::ALL.map(|id| Bin {
        id,
        points: id.points(scoring),
        center: Vec2::ZERO,
        half_size,
    });
    for (bin, x) in bins.iter_mut().zip(xs) {
        bin.center = Vec2::new(x, y);
    }
    bins
}
