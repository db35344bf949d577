//! Session tick
//!
//! Core game loop: one call per animation frame. Order within a tick:
//! input commands, spawners, scheduled work (wind pulses, opening papers),
//! motion, overdue marking, collisions, desk cleanup, effect expiry, combo
//! decay.

use glam::Vec2;

use super::collision::{Contact, detect_contacts};
use super::entity::{BinId, EntityId, Paper, PaperSource, PaperStatus, PowerUpKind};
use super::event::{EntityKind, GameEvent, RemovalReason};
use super::motion;
use super::schedule::ScheduledAction;
use super::scoring::{self, Disposal, ScoreState};
use super::spawner;
use super::state::{GameContext, Viewport};
use crate::{Millis, frame_scale};

/// Commands from the input layer, consumed at the start of a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputCommand {
    /// Player is holding a paper at this position
    DragUpdate { id: EntityId, position: Vec2 },
    /// Player let go; the paper keeps this velocity
    DragReleased { id: EntityId, velocity: Vec2 },
    /// Viewport changed size
    Resize { viewport: Viewport },
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub commands: Vec<InputCommand>,
}

impl TickInput {
    pub fn with(command: InputCommand) -> Self {
        Self {
            commands: vec![command],
        }
    }
}

/// Advance the session to `now` and return what happened, in order
pub fn tick(ctx: &mut GameContext, now: Millis, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Clock never runs backwards
    let now = now.max(ctx.now);
    let elapsed = now - ctx.now;
    ctx.now = now;

    for command in &input.commands {
        apply_command(ctx, command);
    }

    run_spawners(ctx, now, &mut events);

    for action in ctx.schedule.drain_due(now) {
        match action {
            ScheduledAction::SpawnPaper => spawn_paper(ctx, PaperSource::Edge, now, &mut events),
            ScheduledAction::WindPulse {
                direction,
                pulse_index,
                strength,
            } => {
                motion::apply_wind_pulse(
                    &mut ctx.store,
                    ctx.held,
                    direction,
                    strength,
                    ctx.tuning.wind.jitter,
                    &mut ctx.rng,
                );
                events.push(GameEvent::WindGust {
                    direction,
                    pulse_index,
                });
            }
        }
    }

    // Motion
    let dt_scale = frame_scale(elapsed, ctx.effects.time_scale);
    if ctx.effects.magnet_active() {
        motion::apply_magnet(
            &mut ctx.store,
            ctx.held,
            ctx.viewport.center(),
            dt_scale,
            &ctx.tuning.effects,
        );
    }
    motion::integrate_papers(
        &mut ctx.store,
        ctx.held,
        dt_scale,
        &ctx.viewport,
        &ctx.tuning.motion,
    );
    motion::integrate_power_ups(&mut ctx.store, dt_scale);

    // Overdue before collisions: a paper crossing its limit on the tick it
    // lands in a bin still pays the penalty
    mark_overdue(ctx, now, &mut events);

    // Collisions
    for contact in detect_contacts(&ctx.store, &ctx.bins) {
        match contact {
            Contact::Bin { paper, bin } => resolve_bin(ctx, paper, bin, now, &mut events),
            Contact::PowerUp { paper: _, power_up } => {
                resolve_power_up(ctx, power_up, now, &mut events)
            }
        }
    }

    remove_expired(ctx, now, &mut events);
    remove_lost(ctx, &mut events);
    remove_stale_power_ups(ctx, now, &mut events);

    for kind in ctx.effects.tick(now) {
        log::debug!("{:?} wore off", kind);
        events.push(GameEvent::PowerUpExpired { kind });
    }

    let previous = ctx.score.combo;
    ctx.score = scoring::tick_combo_timeout(ctx.score, now);
    if previous > 0 && ctx.score.combo == 0 {
        events.push(GameEvent::ComboBroken { previous });
    }

    events
}

fn apply_command(ctx: &mut GameContext, command: &InputCommand) {
    match *command {
        InputCommand::DragUpdate { id, position } => {
            let grabbing = ctx.held != Some(id);
            let Some(paper) = ctx.store.paper_mut(id) else {
                log::warn!("Drag on unknown paper {:?} ignored", id);
                return;
            };
            if grabbing {
                // Picking a paper up stops it
                paper.vel = Vec2::ZERO;
            }
            paper.pos = position;
            ctx.held = Some(id);
        }
        InputCommand::DragReleased { id, velocity } => {
            if ctx.held == Some(id) {
                ctx.held = None;
            }
            match ctx.store.paper_mut(id) {
                Some(paper) => paper.vel = velocity,
                None => log::warn!("Release of unknown paper {:?} ignored", id),
            }
        }
        InputCommand::Resize { viewport } => ctx.resize(viewport),
    }
}

fn run_spawners(ctx: &mut GameContext, now: Millis, events: &mut Vec<GameEvent>) {
    let fired = ctx.spawners.poll(now);

    if fired.paper {
        spawn_paper(ctx, PaperSource::Edge, now, events);
    }
    if fired.printer {
        spawn_paper(ctx, PaperSource::Printer, now, events);
    }
    if fired.fax {
        spawn_paper(ctx, PaperSource::Fax, now, events);
    }
    if fired.power_up {
        spawn_power_up(ctx, now, events);
    }
    if fired.wind {
        let direction = spawner::wind_direction(&mut ctx.rng);
        log::debug!("Wind gust {:?}", direction);
        spawner::schedule_gust(&mut ctx.schedule, direction, now, &ctx.tuning.wind);
    }
}

fn spawn_paper(ctx: &mut GameContext, source: PaperSource, now: Millis, events: &mut Vec<GameEvent>) {
    // Desk is full - skip silently
    if !ctx.has_desk_space() {
        return;
    }

    let id = ctx.store.next_entity_id();
    let drag = &ctx.tuning.motion;
    let paper = match source {
        PaperSource::Edge => {
            spawner::edge_paper(&mut ctx.rng, id, &ctx.viewport, drag.edge_drag, now)
        }
        PaperSource::Printer => spawner::printer_paper(&mut ctx.rng, id, drag.printer_drag, now),
        PaperSource::Fax => spawner::fax_paper(&mut ctx.rng, id, drag.fax_drag, now),
    };

    log::debug!("Spawned {:?} paper {:?} from {:?}", paper.kind, id, source);
    events.push(GameEvent::EntitySpawned {
        id,
        kind: EntityKind::Paper {
            kind: paper.kind,
            source,
        },
        position: paper.pos,
        velocity: paper.vel,
    });
    ctx.store.add_paper(paper);
}

fn spawn_power_up(ctx: &mut GameContext, now: Millis, events: &mut Vec<GameEvent>) {
    if ctx.store.power_up_count() >= ctx.tuning.desk.max_power_ups {
        return;
    }

    let id = ctx.store.next_entity_id();
    let power_up = spawner::power_up(&mut ctx.rng, id, &ctx.viewport, now);

    log::debug!("Spawned {:?} power-up {:?}", power_up.kind, id);
    events.push(GameEvent::EntitySpawned {
        id,
        kind: EntityKind::PowerUp {
            kind: power_up.kind,
        },
        position: power_up.pos,
        velocity: power_up.vel,
    });
    ctx.store.add_power_up(power_up);
}

fn score_changed(before: &ScoreState, after: &ScoreState) -> GameEvent {
    GameEvent::ScoreChanged {
        delta: after.score - before.score,
        new_score: after.score,
        combo: after.combo,
        multiplier: after.multiplier(),
    }
}

fn forget_held(ctx: &mut GameContext, id: EntityId) {
    if ctx.held == Some(id) {
        ctx.held = None;
    }
}

/// Take a paper off the desk in its terminal state. The removal event's
/// reason comes from that state.
fn retire_paper(ctx: &mut GameContext, id: EntityId, status: PaperStatus) -> Option<Paper> {
    let paper = ctx.store.retire_paper(id, status)?;
    forget_held(ctx, id);
    Some(paper)
}

fn removal_event(paper: &Paper) -> Option<GameEvent> {
    paper
        .status
        .removal_reason()
        .map(|reason| GameEvent::EntityRemoved { id: paper.id, reason })
}

fn resolve_bin(ctx: &mut GameContext, id: EntityId, bin: BinId, now: Millis, events: &mut Vec<GameEvent>) {
    let Some(valid) = ctx.store.paper(id).map(|p| p.accepts(bin)) else {
        return;
    };
    let status = if valid {
        PaperStatus::Scored
    } else {
        PaperStatus::Penalized
    };
    let Some(paper) = retire_paper(ctx, id, status) else {
        return;
    };

    let disposal = if valid {
        Disposal::Correct {
            base_points: bin.points(&ctx.tuning.scoring),
            time_limit_ms: paper.time_limit_ms,
            time_on_desk_ms: paper.time_on_desk(now),
        }
    } else {
        Disposal::WrongBin
    };

    let before = ctx.score;
    let (after, outcome) = scoring::apply_score(
        before,
        disposal,
        now,
        ctx.effects.double_points_active(),
        &ctx.tuning.scoring,
    );
    ctx.score = after;

    log::debug!(
        "{:?} paper {:?} -> {}: {:+} (combo {})",
        paper.kind,
        id,
        bin.as_str(),
        outcome.points,
        outcome.combo
    );
    events.push(GameEvent::PaperScored {
        id,
        position: paper.pos,
        points: outcome.points,
        combo: outcome.combo,
        bin,
        valid,
    });
    events.push(score_changed(&before, &after));
    events.extend(removal_event(&paper));
}

fn resolve_power_up(ctx: &mut GameContext, id: EntityId, now: Millis, events: &mut Vec<GameEvent>) {
    let Some(power_up) = ctx.store.remove_power_up(id) else {
        return;
    };
    events.push(GameEvent::EntityRemoved {
        id,
        reason: RemovalReason::Collected,
    });

    activate_power_up(ctx, power_up.kind, now, events);

    let before = ctx.score;
    ctx.score = scoring::apply_bonus(before, ctx.tuning.scoring.power_up_bonus);
    events.push(score_changed(&before, &ctx.score));
}

/// Start a power-up effect. Timed kinds go to the scheduler, one-shots hit
/// the desk right away.
pub fn activate_power_up(ctx: &mut GameContext, kind: PowerUpKind, now: Millis, events: &mut Vec<GameEvent>) {
    match kind {
        PowerUpKind::Vacuum => motion::apply_vacuum(
            &mut ctx.store,
            ctx.held,
            ctx.viewport.center(),
            ctx.tuning.effects.vacuum_speed,
        ),
        PowerUpKind::Freeze => motion::apply_freeze(&mut ctx.store, ctx.held),
        PowerUpKind::SlowMo | PowerUpKind::Magnet | PowerUpKind::DoublePoints => {
            ctx.effects.activate(kind, now);
        }
    }
    log::debug!("{:?} activated", kind);
    events.push(GameEvent::PowerUpActivated { kind });
}

fn mark_overdue(ctx: &mut GameContext, now: Millis, events: &mut Vec<GameEvent>) {
    let mut newly_overdue = Vec::new();
    for paper in ctx.store.papers_mut() {
        if !paper.is_overdue && paper.is_past_limit(now) {
            paper.is_overdue = true;
            newly_overdue.push(paper.id);
        }
    }

    for id in newly_overdue {
        let before = ctx.score;
        ctx.score = scoring::apply_overdue(before, &ctx.tuning.scoring);
        events.push(GameEvent::PaperOverdue { id });
        events.push(score_changed(&before, &ctx.score));
    }
}

fn remove_expired(ctx: &mut GameContext, now: Millis, events: &mut Vec<GameEvent>) {
    let grace = ctx.tuning.scoring.expiry_grace_ms;
    let held = ctx.held;
    let expired = ctx.store.paper_ids_where(|p| {
        held != Some(p.id) && p.time_on_desk(now) > p.time_limit_ms.saturating_add(grace)
    });

    for id in expired {
        let Some(paper) = retire_paper(ctx, id, PaperStatus::Expired) else {
            continue;
        };
        let before = ctx.score;
        ctx.score = scoring::apply_expiry(before, &ctx.tuning.scoring);
        log::debug!("Paper {:?} expired", id);
        events.extend(removal_event(&paper));
        events.push(score_changed(&before, &ctx.score));
    }
}

fn remove_lost(ctx: &mut GameContext, events: &mut Vec<GameEvent>) {
    let lost = motion::lost_papers(
        &ctx.store,
        ctx.held,
        &ctx.viewport,
        ctx.tuning.desk.lost_margin,
    );

    for id in lost {
        let Some(paper) = retire_paper(ctx, id, PaperStatus::Lost) else {
            continue;
        };
        log::debug!("Paper {:?} fell off the desk", id);
        events.extend(removal_event(&paper));
        if ctx.tuning.desk.penalize_lost_papers {
            let before = ctx.score;
            ctx.score = scoring::apply_expiry(before, &ctx.tuning.scoring);
            events.push(score_changed(&before, &ctx.score));
        }
    }
}

fn remove_stale_power_ups(ctx: &mut GameContext, now: Millis, events: &mut Vec<GameEvent>) {
    let ttl = ctx.tuning.desk.power_up_ttl_ms;
    for id in ctx.store.power_up_ids_where(|p| p.is_expired(now, ttl)) {
        if ctx.store.remove_power_up(id).is_some() {
            events.push(GameEvent::EntityRemoved {
                id,
                reason: RemovalReason::Expired,
            });
        }
    }
}
