//! Scoring and combo engine
//!
//! Pure state transitions: every function takes the current [`ScoreState`] by
//! value and returns the next one. Nothing here touches entities or time
//! sources, which keeps the scoring rules easy to test in isolation.

use serde::{Deserialize, Serialize};

use crate::Millis;
use crate::tuning::ScoringTuning;

/// Score, counters and combo timing for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    /// Can go negative from wrong-bin and overdue penalties
    pub score: i64,
    pub papers_trashed: u32,
    pub penalties: u32,
    pub combo: u32,
    /// Highest combo reached this session
    pub best_combo: u32,
    /// Time of the last correct disposal (None until the first one)
    pub last_scoring_time: Option<Millis>,
    pub combo_window_ms: Millis,
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new(ScoringTuning::default().combo_window_ms)
    }
}

/// What happened when a paper hit a bin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposal {
    /// Right bin
    Correct {
        base_points: i64,
        time_limit_ms: Millis,
        time_on_desk_ms: Millis,
    },
    /// Wrong bin
    WrongBin,
}

/// Result of a disposal, for the event feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreOutcome {
    pub points: i64,
    pub combo: u32,
    pub multiplier: u32,
}

/// Combo multiplier tier: x1 below 5, x2 from 5, x3 from 10
#[inline]
pub fn tier(combo: u32) -> u32 {
    if combo >= 10 {
        3
    } else if combo >= 5 {
        2
    } else {
        1
    }
}

/// Whole seconds left on the clock, never negative
#[inline]
pub fn time_bonus(time_limit_ms: Millis, time_on_desk_ms: Millis) -> i64 {
    (time_limit_ms.saturating_sub(time_on_desk_ms) / 1000) as i64
}

impl ScoreState {
    pub fn new(combo_window_ms: Millis) -> Self {
        Self {
            score: 0,
            papers_trashed: 0,
            penalties: 0,
            combo: 0,
            best_combo: 0,
            last_scoring_time: None,
            combo_window_ms,
        }
    }

    /// Current combo multiplier
    pub fn multiplier(&self) -> u32 {
        tier(self.combo)
    }

    fn within_window(&self, now: Millis) -> bool {
        self.last_scoring_time
            .is_some_and(|last| now.saturating_sub(last) < self.combo_window_ms)
    }
}

/// Apply a paper landing in a bin
pub fn apply_score(
    state: ScoreState,
    disposal: Disposal,
    now: Millis,
    double_points: bool,
    scoring: &ScoringTuning,
) -> (ScoreState, ScoreOutcome) {
    let mut next = state;
    let points = match disposal {
        Disposal::Correct {
            base_points,
            time_limit_ms,
            time_on_desk_ms,
        } => {
            next.combo = if state.within_window(now) {
                state.combo + 1
            } else {
                0
            };
            next.best_combo = next.best_combo.max(next.combo);
            next.last_scoring_time = Some(now);
            next.papers_trashed += 1;

            let mut points =
                base_points * tier(next.combo) as i64 + time_bonus(time_limit_ms, time_on_desk_ms);
            if double_points && points > 0 {
                points *= 2;
            }
            points
        }
        Disposal::WrongBin => {
            next.penalties += 1;
            next.combo = 0;
            scoring.wrong_bin_penalty
        }
    };
    next.score += points;

    let outcome = ScoreOutcome {
        points,
        combo: next.combo,
        multiplier: next.multiplier(),
    };
    (next, outcome)
}

/// One-time penalty when a paper goes overdue. Leaves the combo alone.
pub fn apply_overdue(state: ScoreState, scoring: &ScoringTuning) -> ScoreState {
    ScoreState {
        score: state.score + scoring.overdue_penalty,
        penalties: state.penalties + 1,
        ..state
    }
}

/// Penalty when a paper is force-expired off the desk: score floors at 0 and
/// the combo breaks
pub fn apply_expiry(state: ScoreState, scoring: &ScoringTuning) -> ScoreState {
    ScoreState {
        score: (state.score + scoring.expiry_penalty).max(0),
        ..reset_combo(state)
    }
}

/// Flat bonus (power-up pickup). No combo or double-points interaction.
pub fn apply_bonus(state: ScoreState, points: i64) -> ScoreState {
    ScoreState {
        score: state.score + points,
        ..state
    }
}

pub fn reset_combo(state: ScoreState) -> ScoreState {
    ScoreState { combo: 0, ..state }
}

/// Passive combo decay. Must run every tick.
pub fn tick_combo_timeout(state: ScoreState, now: Millis) -> ScoreState {
    match state.last_scoring_time {
        Some(last) if state.combo > 0 && now.saturating_sub(last) > state.combo_window_ms => {
            reset_combo(state)
        }
        _ => state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn scoring() -> ScoringTuning {
        ScoringTuning::default()
    }

    fn regular_into_trash(time_on_desk_ms: Millis) -> Disposal {
        Disposal::Correct {
            base_points: 10,
            time_limit_ms: 15_000,
            time_on_desk_ms,
        }
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier(0), 1);
        assert_eq!(tier(4), 1);
        assert_eq!(tier(5), 2);
        assert_eq!(tier(9), 2);
        assert_eq!(tier(10), 3);
        assert_eq!(tier(500), 3);
    }

    #[test]
    fn test_time_bonus_floors_and_clamps() {
        assert_eq!(time_bonus(15_000, 4000), 11);
        assert_eq!(time_bonus(15_000, 14_001), 0);
        assert_eq!(time_bonus(15_000, 30_000), 0);
    }

    #[test]
    fn test_wrong_bin_penalty() {
        // Confidential into trash
        let mut state = ScoreState::new(2000);
        state.combo = 4;
        state.last_scoring_time = Some(900);
        let (next, outcome) = apply_score(state, Disposal::WrongBin, 1000, false, &scoring());
        assert_eq!(next.score, -15);
        assert_eq!(next.combo, 0);
        assert_eq!(next.penalties, 1);
        assert_eq!(next.papers_trashed, 0);
        assert_eq!(outcome.points, -15);
        // Wrong bin doesn't refresh the combo clock
        assert_eq!(next.last_scoring_time, Some(900));
    }

    #[test]
    fn test_wrong_bin_not_doubled() {
        let (next, _) = apply_score(ScoreState::new(2000), Disposal::WrongBin, 0, true, &scoring());
        assert_eq!(next.score, -15);
    }

    #[test]
    fn test_tiered_score_with_time_bonus() {
        let mut state = ScoreState::new(2000);
        state.combo = 6;
        state.last_scoring_time = Some(9500);

        let (next, outcome) = apply_score(state, regular_into_trash(4000), 10_000, false, &scoring());
        assert_eq!(next.combo, 7);
        assert_eq!(outcome.multiplier, 2);
        assert_eq!(outcome.points, 31);
        assert_eq!(next.score, 31);
        assert_eq!(next.papers_trashed, 1);
        assert_eq!(next.last_scoring_time, Some(10_000));

        let (doubled, outcome) = apply_score(state, regular_into_trash(4000), 10_000, true, &scoring());
        assert_eq!(outcome.points, 62);
        assert_eq!(doubled.score, 62);
    }

    #[test]
    fn test_first_score_starts_combo_at_zero() {
        let (next, outcome) = apply_score(
            ScoreState::new(2000),
            regular_into_trash(14_500),
            100,
            false,
            &scoring(),
        );
        assert_eq!(next.combo, 0);
        assert_eq!(outcome.points, 10);
    }

    #[test]
    fn test_combo_builds_inside_window_and_restarts_outside() {
        let mut state = ScoreState::new(2000);
        for (i, now) in [1000, 2500, 4000].into_iter().enumerate() {
            state = apply_score(state, regular_into_trash(0), now, false, &scoring()).0;
            assert_eq!(state.combo, i as u32);
        }
        state = apply_score(state, regular_into_trash(0), 6000, false, &scoring()).0;
        assert_eq!(state.combo, 0);
        assert_eq!(state.best_combo, 2);
    }

    #[test]
    fn test_overdue_penalty_keeps_combo() {
        let mut state = ScoreState::new(2000);
        state.combo = 3;
        let next = apply_overdue(state, &scoring());
        assert_eq!(next.score, -5);
        assert_eq!(next.penalties, 1);
        assert_eq!(next.combo, 3);
    }

    #[test]
    fn test_expiry_penalty_floors_at_zero() {
        let mut state = ScoreState::new(2000);
        state.score = 3;
        state.combo = 2;
        let next = apply_expiry(state, &scoring());
        assert_eq!(next.score, 0);
        assert_eq!(next.combo, 0);

        state.score = 50;
        assert_eq!(apply_expiry(state, &scoring()).score, 45);

        // Already negative from wrong bins: the floor lifts it to zero
        state.score = -30;
        assert_eq!(apply_expiry(state, &scoring()).score, 0);
    }

    #[test]
    fn test_bonus_is_flat() {
        let mut state = ScoreState::new(2000);
        state.combo = 12;
        let next = apply_bonus(state, 5);
        assert_eq!(next.score, 5);
        assert_eq!(next.combo, 12);
    }

    #[test]
    fn test_combo_timeout() {
        let mut state = ScoreState::new(2000);
        state.combo = 4;
        state.last_scoring_time = Some(1000);
        assert_eq!(tick_combo_timeout(state, 3000).combo, 4);
        assert_eq!(tick_combo_timeout(state, 3001).combo, 0);
        // No scoring yet - nothing to decay
        assert_eq!(tick_combo_timeout(ScoreState::new(2000), 99_999).combo, 0);
    }

    proptest! {
        #[test]
        fn prop_tier_is_monotonic(a in 0u32..1000, b in 0u32..1000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(tier(lo) <= tier(hi));
            prop_assert!((1..=3).contains(&tier(a)));
        }

        #[test]
        fn prop_wrong_bin_always_resets_combo(combo in 0u32..50, last in 0u64..10_000, now in 0u64..20_000) {
            let mut state = ScoreState::new(2000);
            state.combo = combo;
            state.last_scoring_time = Some(last);
            let (next, _) = apply_score(state, Disposal::WrongBin, now, false, &ScoringTuning::default());
            prop_assert_eq!(next.combo, 0);
            prop_assert_eq!(next.score, state.score - 15);
        }

        #[test]
        fn prop_correct_disposal_never_loses_points(
            base in 1i64..50, limit in 0u64..30_000, on_desk in 0u64..60_000, doubled: bool,
        ) {
            let disposal = Disposal::Correct { base_points: base, time_limit_ms: limit, time_on_desk_ms: on_desk };
            let (next, outcome) = apply_score(ScoreState::new(2000), disposal, 0, doubled, &ScoringTuning::default());
            prop_assert!(outcome.points >= base);
            prop_assert_eq!(next.score, outcome.points);
        }
    }
}
