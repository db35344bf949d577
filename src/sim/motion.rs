//! Motion integrator
//!
//! Velocities are in units per reference frame; `dt_scale` says how many
//! frames this tick covers (already multiplied by the slow-motion scale).
//! The held paper is skipped by everything here: the player moves it.

use glam::Vec2;
use rand::Rng;

use super::collision::bounce_velocity;
use super::entity::EntityId;
use super::state::Viewport;
use super::store::EntityStore;
use crate::tuning::{EffectTuning, MotionTuning};

/// Move papers, apply air drag, bounce off the left, top and right walls.
/// The bottom is open.
pub fn integrate_papers(
    store: &mut EntityStore,
    held: Option<EntityId>,
    dt_scale: f32,
    viewport: &Viewport,
    motion: &MotionTuning,
) {
    for paper in store.papers_mut() {
        if held == Some(paper.id) {
            continue;
        }

        paper.pos += paper.vel * dt_scale;
        paper.vel *= (1.0 - paper.drag).powf(dt_scale);

        // Only bounce when moving outward, so papers flying in from
        // off-screen aren't turned back at the edge
        let restitution = motion.restitution(paper.source);
        if paper.pos.x - paper.half_size.x < 0.0 && paper.vel.x < 0.0 {
            paper.vel = bounce_velocity(paper.vel, Vec2::X, restitution);
        }
        if paper.pos.x + paper.half_size.x > viewport.width && paper.vel.x > 0.0 {
            paper.vel = bounce_velocity(paper.vel, Vec2::NEG_X, restitution);
        }
        if paper.pos.y - paper.half_size.y < 0.0 && paper.vel.y < 0.0 {
            paper.vel = bounce_velocity(paper.vel, Vec2::Y, restitution);
        }
    }
}

/// Power-ups just drift
pub fn integrate_power_ups(store: &mut EntityStore, dt_scale: f32) {
    for power_up in store.power_ups_mut() {
        power_up.pos += power_up.vel * dt_scale;
    }
}

/// Magnet: pull proportional to distance from the center, nothing inside the deadzone
pub fn apply_magnet(
    store: &mut EntityStore,
    held: Option<EntityId>,
    center: Vec2,
    dt_scale: f32,
    effects: &EffectTuning,
) {
    for paper in store.papers_mut() {
        if held == Some(paper.id) {
            continue;
        }
        let to_center = center - paper.pos;
        if to_center.length() > effects.magnet_deadzone {
            paper.vel += to_center * effects.magnet_strength * dt_scale;
        }
    }
}

/// One wind pulse: push every loose paper, plus a little random jitter each
pub fn apply_wind_pulse<R: Rng + ?Sized>(
    store: &mut EntityStore,
    held: Option<EntityId>,
    direction: Vec2,
    strength: f32,
    jitter: f32,
    rng: &mut R,
) {
    for paper in store.papers_mut() {
        if held == Some(paper.id) {
            continue;
        }
        let kick = Vec2::new(
            (rng.random::<f32>() - 0.5) * 2.0 * jitter,
            (rng.random::<f32>() - 0.5) * 2.0 * jitter,
        );
        paper.vel += direction * strength + kick;
    }
}

/// Vacuum: every loose paper heads for the center at a fixed speed
pub fn apply_vacuum(store: &mut EntityStore, held: Option<EntityId>, center: Vec2, speed: f32) {
    for paper in store.papers_mut() {
        if held == Some(paper.id) {
            continue;
        }
        paper.vel = crate::direction_to(paper.pos, center) * speed;
    }
}

/// Freeze: every loose paper stops dead
pub fn apply_freeze(store: &mut EntityStore, held: Option<EntityId>) {
    for paper in store.papers_mut() {
        if held == Some(paper.id) {
            continue;
        }
        paper.vel = Vec2::ZERO;
    }
}

/// Papers that fell past the bottom edge
pub fn lost_papers(
    store: &EntityStore,
    held: Option<EntityId>,
    viewport: &Viewport,
    margin: f32,
) -> Vec<EntityId> {
    let limit = viewport.height + margin;
    store.paper_ids_where(|p| held != Some(p.id) && p.pos.y > limit)
}
