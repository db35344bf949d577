//! Session state
//!
//! One [`GameContext`] per session, created by [`GameContext::new`], advanced by
//! [`super::tick`], and finished with [`GameContext::teardown`]. There is no
//! other mutable state anywhere in the core.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::ActiveEffects;
use super::entity::{Bin, EntityId, layout_bins};
use super::schedule::{Schedule, ScheduledAction};
use super::scoring::ScoreState;
use super::spawner::SpawnerSet;
use super::store::EntityStore;
use crate::Millis;
use crate::tuning::Tuning;

/// Papers in the opening burst, and the gap between them
pub const OPENING_PAPERS: u32 = 3;
pub const OPENING_PAPER_GAP_MS: Millis = 500;

/// Visible play area in screen units (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Center of the desk (magnet and vacuum target)
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// End-of-session numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub seed: u64,
    pub score: i64,
    pub papers_trashed: u32,
    pub penalties: u32,
    pub best_combo: u32,
    pub duration_ms: Millis,
    pub papers_left: usize,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameContext {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub viewport: Viewport,
    /// Trash, recycle, shred - left to right
    pub bins: [Bin; 3],
    pub store: EntityStore,
    pub spawners: SpawnerSet,
    pub score: ScoreState,
    pub effects: ActiveEffects,
    pub schedule: Schedule,
    /// Paper currently held by the player, if any
    pub held: Option<EntityId>,
    pub start_time: Millis,
    /// Timestamp of the previous tick
    pub now: Millis,
}

impl GameContext {
    /// Start a session with default tuning
    pub fn new(viewport: Viewport, seed: u64, start_time: Millis) -> Self {
        Self::with_tuning(viewport, seed, start_time, Tuning::default())
    }

    pub fn with_tuning(viewport: Viewport, seed: u64, start_time: Millis, tuning: Tuning) -> Self {
        let tuning = tuning.sanitized();
        let mut schedule = Schedule::new();
        for i in 0..OPENING_PAPERS {
            schedule.push(
                start_time + i as Millis * OPENING_PAPER_GAP_MS,
                ScheduledAction::SpawnPaper,
            );
        }

        log::info!(
            "Session started: seed={} viewport={}x{}",
            seed,
            viewport.width,
            viewport.height
        );

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            bins: layout_bins(viewport.width, viewport.height, &tuning.scoring),
            viewport,
            store: EntityStore::new(),
            spawners: SpawnerSet::new(&tuning.spawners, start_time),
            score: ScoreState::new(tuning.scoring.combo_window_ms),
            effects: ActiveEffects::new(&tuning.effects),
            schedule,
            held: None,
            start_time,
            now: start_time,
            tuning,
        }
    }

    /// Viewport changed: bins follow the bottom edge
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.bins = layout_bins(viewport.width, viewport.height, &self.tuning.scoring);
        log::info!("Viewport resized to {}x{}", viewport.width, viewport.height);
    }

    /// Remaining desk space as a percentage (what the HUD shows)
    pub fn desk_space_free(&self) -> f32 {
        let max = self.tuning.desk.max_desk_space.max(1) as f32;
        ((max - self.store.paper_count() as f32) / max * 100.0).max(0.0)
    }

    pub fn has_desk_space(&self) -> bool {
        self.store.paper_count() < self.tuning.desk.max_desk_space
    }

    pub fn elapsed(&self) -> Millis {
        self.now.saturating_sub(self.start_time)
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            seed: self.seed,
            score: self.score.score,
            papers_trashed: self.score.papers_trashed,
            penalties: self.score.penalties,
            best_combo: self.score.best_combo,
            duration_ms: self.elapsed(),
            papers_left: self.store.paper_count(),
        }
    }

    /// End the session: drop pending work and entities, report the result
    pub fn teardown(mut self) -> SessionSummary {
        let summary = self.summary();
        self.schedule.clear();
        self.store.clear();
        log::info!(
            "Session over: score={} trashed={} penalties={} best combo={}",
            summary.score,
            summary.papers_trashed,
            summary.penalties,
            summary.best_combo
        );
        summary
    }
}
