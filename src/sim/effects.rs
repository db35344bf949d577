//! Power-up effect scheduler
//!
//! Timed effects (slow-motion, magnet, double points) move through
//! `Inactive -> Active { expires_at } -> Inactive`. Vacuum and freeze are
//! one-shot and never enter this table; the tick applies them directly.

use serde::{Deserialize, Serialize};

use super::entity::PowerUpKind;
use crate::Millis;
use crate::tuning::EffectTuning;

/// State of one timed effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EffectState {
    #[default]
    Inactive,
    Active { expires_at: Millis },
}

impl EffectState {
    pub fn is_active(&self) -> bool {
        matches!(self, EffectState::Active { .. })
    }
}

/// Active timed effects and the global time scale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub slowmo: EffectState,
    pub magnet: EffectState,
    pub double_points: EffectState,
    /// 1.0 normally, reduced while slow-motion runs
    pub time_scale: f32,
    duration_ms: Millis,
    slowmo_scale: f32,
}

impl Default for ActiveEffects {
    fn default() -> Self {
        Self::new(&EffectTuning::default())
    }
}

impl ActiveEffects {
    pub fn new(tuning: &EffectTuning) -> Self {
        Self {
            slowmo: EffectState::Inactive,
            magnet: EffectState::Inactive,
            double_points: EffectState::Inactive,
            time_scale: 1.0,
            duration_ms: tuning.duration_ms,
            slowmo_scale: tuning.slowmo_scale,
        }
    }

    fn slot_mut(&mut self, kind: PowerUpKind) -> Option<&mut EffectState> {
        match kind {
            PowerUpKind::SlowMo => Some(&mut self.slowmo),
            PowerUpKind::Magnet => Some(&mut self.magnet),
            PowerUpKind::DoublePoints => Some(&mut self.double_points),
            PowerUpKind::Vacuum | PowerUpKind::Freeze => None,
        }
    }

    /// Start (or refresh) a timed effect. Returns false for one-shot kinds,
    /// which have nothing to schedule.
    pub fn activate(&mut self, kind: PowerUpKind, now: Millis) -> bool {
        let expires_at = now.saturating_add(self.duration_ms);
        let Some(slot) = self.slot_mut(kind) else {
            return false;
        };
        *slot = EffectState::Active { expires_at };
        if kind == PowerUpKind::SlowMo {
            self.time_scale = self.slowmo_scale;
        }
        true
    }

    /// Expire finished effects. Returns the kinds that just switched off.
    pub fn tick(&mut self, now: Millis) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        for kind in [
            PowerUpKind::SlowMo,
            PowerUpKind::Magnet,
            PowerUpKind::DoublePoints,
        ] {
            let Some(slot) = self.slot_mut(kind) else {
                continue;
            };
            if let EffectState::Active { expires_at } = *slot {
                if now > expires_at {
                    *slot = EffectState::Inactive;
                    expired.push(kind);
                }
            }
        }
        if expired.contains(&PowerUpKind::SlowMo) {
            self.time_scale = 1.0;
        }
        expired
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        match kind {
            PowerUpKind::SlowMo => self.slowmo.is_active(),
            PowerUpKind::Magnet => self.magnet.is_active(),
            PowerUpKind::DoublePoints => self.double_points.is_active(),
            PowerUpKind::Vacuum | PowerUpKind::Freeze => false,
        }
    }

    pub fn magnet_active(&self) -> bool {
        self.magnet.is_active()
    }

    pub fn double_points_active(&self) -> bool {
        self.double_points.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slowmo_window() {
        let mut effects = ActiveEffects::default();
        assert!(effects.activate(PowerUpKind::SlowMo, 0));
        assert_eq!(effects.time_scale, 0.3);

        assert!(effects.tick(4000).is_empty());
        assert!(effects.tick(8000).is_empty());
        assert_eq!(effects.time_scale, 0.3);

        assert_eq!(effects.tick(8001), vec![PowerUpKind::SlowMo]);
        assert_eq!(effects.time_scale, 1.0);

        // Exactly once
        assert!(effects.tick(8002).is_empty());
        assert!(effects.tick(20_000).is_empty());
        assert_eq!(effects.time_scale, 1.0);
    }

    #[test]
    fn test_reactivation_refreshes_expiry() {
        let mut effects = ActiveEffects::default();
        effects.activate(PowerUpKind::Magnet, 0);
        effects.activate(PowerUpKind::Magnet, 5000);
        assert!(effects.tick(9000).is_empty());
        assert!(effects.magnet_active());
        assert_eq!(effects.tick(13_001), vec![PowerUpKind::Magnet]);
    }

    #[test]
    fn test_one_shots_are_not_scheduled() {
        let mut effects = ActiveEffects::default();
        assert!(!effects.activate(PowerUpKind::Vacuum, 0));
        assert!(!effects.activate(PowerUpKind::Freeze, 0));
        assert!(!effects.is_active(PowerUpKind::Vacuum));
        assert_eq!(effects.time_scale, 1.0);
    }

    #[test]
    fn test_independent_expiry() {
        let mut effects = ActiveEffects::default();
        effects.activate(PowerUpKind::DoublePoints, 0);
        effects.activate(PowerUpKind::SlowMo, 3000);
        assert_eq!(effects.tick(8001), vec![PowerUpKind::DoublePoints]);
        assert_eq!(effects.time_scale, 0.3);
        assert!(!effects.double_points_active());
        assert_eq!(effects.tick(11_001), vec![PowerUpKind::SlowMo]);
    }

    #[test]
    fn test_endless_duration_saturates() {
        let tuning = EffectTuning {
            duration_ms: Millis::MAX,
            ..EffectTuning::default()
        };
        let mut effects = ActiveEffects::new(&tuning);
        effects.activate(PowerUpKind::Magnet, 5000);
        assert_eq!(effects.magnet, EffectState::Active { expires_at: Millis::MAX });
        assert!(effects.tick(Millis::MAX).is_empty());
    }
}
