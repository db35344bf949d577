//! Autoplay bot
//!
//! Drives a session through the same input commands a player would send.
//! Stateless: every tick it looks at the desk and decides again.

use glam::Vec2;

use super::entity::{Bin, Paper};
use super::state::GameContext;
use super::tick::{InputCommand, TickInput};

/// How far the bot moves a held paper per tick
pub const AUTOPLAY_DRAG_SPEED: f32 = 30.0;
/// Papers are carried in above the bin row, then dropped straight down
const HOVER_HEIGHT: f32 = 80.0;

/// Paper the bot should work on: the one it already holds, otherwise the
/// visible paper closest to going overdue
pub fn pick_target(ctx: &GameContext) -> Option<&Paper> {
    if let Some(held) = ctx.held.and_then(|id| ctx.store.paper(id)) {
        return Some(held);
    }

    let (w, h) = (ctx.viewport.width, ctx.viewport.height);
    ctx.store
        .papers()
        .iter()
        .filter(|p| p.pos.x >= 0.0 && p.pos.x <= w && p.pos.y >= 0.0 && p.pos.y <= h)
        .min_by_key(|p| p.time_limit_ms.saturating_sub(p.time_on_desk(ctx.now)))
}

/// Next waypoint on the way to `bin`
fn waypoint(paper: &Paper, bin: &Bin) -> Vec2 {
    let bounds = bin.bounds();
    let above = paper.pos.x >= bounds.min.x && paper.pos.x <= bounds.max.x;
    if above {
        bin.center
    } else {
        Vec2::new(bin.center.x, bounds.min.y - HOVER_HEIGHT)
    }
}

/// Input for the next tick
pub fn autoplay_input(ctx: &GameContext) -> TickInput {
    let Some(paper) = pick_target(ctx) else {
        return TickInput::default();
    };
    let Some(bin) = paper
        .valid_bins()
        .first()
        .and_then(|id| ctx.bins.iter().find(|b| b.id == *id))
    else {
        return TickInput::default();
    };

    let to = waypoint(paper, bin) - paper.pos;
    let step = to.clamp_length_max(AUTOPLAY_DRAG_SPEED);
    TickInput::with(InputCommand::DragUpdate {
        id: paper.id,
        position: paper.pos + step,
    })
}
