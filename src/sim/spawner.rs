//! Spawner set: interval-driven paper, printer, fax, power-up and wind generators
//!
//! Every spawner shortens its own interval each time it fires until it hits a
//! floor. That ramp is the whole difficulty curve.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, Paper, PaperKind, PaperSource, PowerUp, PowerUpKind};
use super::schedule::{Schedule, ScheduledAction};
use super::state::Viewport;
use crate::Millis;
use crate::consts::*;
use crate::tuning::{SpawnerRamps, SpawnerTuning, WindTuning};

/// One interval-driven generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawner {
    pub interval_ms: Millis,
    pub floor_ms: Millis,
    pub step_ms: Millis,
    /// None until the first fire; a fresh spawner fires on its first check
    pub last_fire: Option<Millis>,
}

impl Spawner {
    /// Spawner that fires on the first tick
    pub fn new(tuning: SpawnerTuning) -> Self {
        Self {
            interval_ms: tuning.initial_ms.max(tuning.floor_ms),
            floor_ms: tuning.floor_ms,
            step_ms: tuning.step_ms,
            last_fire: None,
        }
    }

    /// Spawner that waits one full interval from `now`
    pub fn starting_at(tuning: SpawnerTuning, now: Millis) -> Self {
        Self {
            last_fire: Some(now),
            ..Self::new(tuning)
        }
    }

    pub fn is_due(&self, now: Millis) -> bool {
        self.last_fire
            .is_none_or(|last| now.saturating_sub(last) > self.interval_ms)
    }

    /// Reset the timer and ramp the interval down toward the floor
    pub fn fire(&mut self, now: Millis) {
        self.last_fire = Some(now);
        self.interval_ms = self
            .interval_ms
            .saturating_sub(self.step_ms)
            .max(self.floor_ms);
    }

    /// Fire if due. Returns whether it fired.
    pub fn poll(&mut self, now: Millis) -> bool {
        if self.is_due(now) {
            self.fire(now);
            true
        } else {
            false
        }
    }
}

/// Which spawners fired this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Fired {
    pub paper: bool,
    pub printer: bool,
    pub fax: bool,
    pub power_up: bool,
    pub wind: bool,
}

/// All five generators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnerSet {
    pub paper: Spawner,
    pub printer: Spawner,
    pub fax: Spawner,
    pub power_up: Spawner,
    pub wind: Spawner,
}

impl SpawnerSet {
    /// Paper sources and wind start immediately; power-ups wait a full interval
    pub fn new(ramps: &SpawnerRamps, now: Millis) -> Self {
        Self {
            paper: Spawner::new(ramps.paper),
            printer: Spawner::new(ramps.printer),
            fax: Spawner::new(ramps.fax),
            power_up: Spawner::starting_at(ramps.power_up, now),
            wind: Spawner::new(ramps.wind),
        }
    }

    pub fn poll(&mut self, now: Millis) -> Fired {
        Fired {
            paper: self.paper.poll(now),
            printer: self.printer.poll(now),
            fax: self.fax.poll(now),
            power_up: self.power_up.poll(now),
            wind: self.wind.poll(now),
        }
    }
}

/// Paper flying in from the left, right or top edge
pub fn edge_paper<R: Rng + ?Sized>(
    rng: &mut R,
    id: EntityId,
    viewport: &Viewport,
    drag: f32,
    now: Millis,
) -> Paper {
    let kind = PaperKind::ALL[rng.random_range(0..PaperKind::ALL.len())];
    let (w, h) = (viewport.width, viewport.height);
    let span_y = (h - 2.0 * SPAWN_EDGE_INSET).max(1.0);
    let span_x = (w - 2.0 * SPAWN_EDGE_INSET).max(1.0);

    let (pos, vel) = match rng.random_range(0..3) {
        // Left side
        0 => (
            Vec2::new(-SPAWN_OFFSCREEN, rng.random::<f32>() * span_y + SPAWN_EDGE_INSET),
            Vec2::new(6.0 + rng.random::<f32>() * 8.0, (rng.random::<f32>() - 0.5) * 4.0),
        ),
        // Right side
        1 => (
            Vec2::new(w + SPAWN_OFFSCREEN, rng.random::<f32>() * span_y + SPAWN_EDGE_INSET),
            Vec2::new(-(6.0 + rng.random::<f32>() * 8.0), (rng.random::<f32>() - 0.5) * 4.0),
        ),
        // Top
        _ => (
            Vec2::new(rng.random::<f32>() * span_x + SPAWN_EDGE_INSET, -SPAWN_OFFSCREEN),
            Vec2::new((rng.random::<f32>() - 0.5) * 6.0, 4.0 + rng.random::<f32>() * 6.0),
        ),
    };

    Paper::new(id, kind, PaperSource::Edge, pos, vel, drag, now)
}

/// Narrow receipt dropping out below the printer
pub fn printer_paper<R: Rng + ?Sized>(rng: &mut R, id: EntityId, drag: f32, now: Millis) -> Paper {
    let kind = PaperKind::ALL[rng.random_range(0..PaperKind::ALL.len())];
    let pos = Vec2::new(PRINTER_X, PRINTER_Y + PRINTER_HEIGHT);
    let vel = Vec2::new(-3.0 + rng.random::<f32>() * 6.0, 3.0 + rng.random::<f32>() * 5.0);
    Paper::new(id, kind, PaperSource::Printer, pos, vel, drag, now)
}

/// Short sheet sliding out of the fax's right side
pub fn fax_paper<R: Rng + ?Sized>(rng: &mut R, id: EntityId, drag: f32, now: Millis) -> Paper {
    let kind = PaperKind::FAX[rng.random_range(0..PaperKind::FAX.len())];
    let pos = Vec2::new(FAX_X + FAX_WIDTH, FAX_Y + FAX_HEIGHT / 2.0);
    let vel = Vec2::new(8.0 + rng.random::<f32>() * 6.0, (rng.random::<f32>() - 0.5) * 3.0);
    Paper::new(id, kind, PaperSource::Fax, pos, vel, drag, now)
}

/// Power-up somewhere in the upper part of the desk, drifting gently
pub fn power_up<R: Rng + ?Sized>(rng: &mut R, id: EntityId, viewport: &Viewport, now: Millis) -> PowerUp {
    let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
    let span_x = (viewport.width - 2.0 * SPAWN_EDGE_INSET).max(1.0);
    // Stay clear of the bins along the bottom
    let span_y = (viewport.height * 0.6 - SPAWN_EDGE_INSET).max(1.0);
    let pos = Vec2::new(
        rng.random::<f32>() * span_x + SPAWN_EDGE_INSET,
        rng.random::<f32>() * span_y + SPAWN_EDGE_INSET,
    );
    let vel = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5);
    PowerUp::new(id, kind, pos, vel, now)
}

/// East, west, north, south, northeast, northwest (screen y points down)
pub const WIND_DIRECTIONS: [Vec2; 6] = [
    Vec2::new(8.0, 0.0),
    Vec2::new(-8.0, 0.0),
    Vec2::new(0.0, -6.0),
    Vec2::new(0.0, 6.0),
    Vec2::new(6.0, -4.0),
    Vec2::new(-6.0, -4.0),
];

pub fn wind_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    WIND_DIRECTIONS[rng.random_range(0..WIND_DIRECTIONS.len())]
}

/// Strength of pulse `index`: fades linearly from 1.0, never below the minimum
pub fn pulse_strength(index: u32, wind: &WindTuning) -> f32 {
    (1.0 - index as f32 / wind.pulses as f32).max(wind.min_strength)
}

/// Queue every pulse of a gust. The first pulse is due immediately.
pub fn schedule_gust(schedule: &mut Schedule, direction: Vec2, now: Millis, wind: &WindTuning) {
    for pulse_index in 0..wind.pulses {
        schedule.push(
            now.saturating_add((pulse_index as Millis).saturating_mul(wind.pulse_interval_ms)),
            ScheduledAction::WindPulse {
                direction,
                pulse_index,
                strength: pulse_strength(pulse_index, wind),
            },
        );
    }
}
