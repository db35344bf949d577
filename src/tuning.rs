//! Data-driven game balance
//!
//! Every number that shapes difficulty lives here so it can be tweaked from a
//! JSON file without recompiling. Missing sections and fields fall back to the
//! defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Millis;
use crate::sim::PaperSource;

/// Interval ramp for one spawner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnerTuning {
    /// Interval at session start (ms)
    pub initial_ms: Millis,
    /// Interval never drops below this (ms)
    pub floor_ms: Millis,
    /// Interval shrinks by this much every time the spawner fires (ms)
    pub step_ms: Millis,
}

impl SpawnerTuning {
    pub const fn new(initial_ms: Millis, floor_ms: Millis, step_ms: Millis) -> Self {
        Self {
            initial_ms,
            floor_ms,
            step_ms,
        }
    }
}

/// Desk capacity and cleanup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskTuning {
    /// Maximum papers on the desk at once
    pub max_desk_space: usize,
    /// Maximum uncollected power-ups on the desk at once
    pub max_power_ups: usize,
    /// Uncollected power-ups vanish after this long (ms)
    pub power_up_ttl_ms: Millis,
    /// Papers this far below the bottom edge are lost
    pub lost_margin: f32,
    /// Whether a lost paper costs points and breaks the combo
    pub penalize_lost_papers: bool,
}

impl Default for DeskTuning {
    fn default() -> Self {
        Self {
            max_desk_space: 15,
            max_power_ups: 3,
            power_up_ttl_ms: 20_000,
            lost_margin: 100.0,
            penalize_lost_papers: false,
        }
    }
}

/// Difficulty ramps for all spawners
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerRamps {
    pub paper: SpawnerTuning,
    pub printer: SpawnerTuning,
    pub fax: SpawnerTuning,
    pub power_up: SpawnerTuning,
    pub wind: SpawnerTuning,
}

impl Default for SpawnerRamps {
    fn default() -> Self {
        Self {
            paper: SpawnerTuning::new(2000, 800, 10),
            printer: SpawnerTuning::new(3000, 1500, 50),
            fax: SpawnerTuning::new(4500, 2000, 100),
            power_up: SpawnerTuning::new(12_000, 6000, 500),
            wind: SpawnerTuning::new(8000, 4000, 200),
        }
    }
}

/// Points, penalties and the combo window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    /// Consecutive correct disposals within this window build the combo (ms)
    pub combo_window_ms: Millis,
    /// Points for dropping a paper into a bin it doesn't belong in
    pub wrong_bin_penalty: i64,
    /// One-time penalty when a paper goes overdue
    pub overdue_penalty: i64,
    /// Penalty when an overdue paper is finally cleared off the desk
    pub expiry_penalty: i64,
    /// How long past its time limit a paper lingers before it's removed (ms)
    pub expiry_grace_ms: Millis,
    /// Flat bonus for collecting a power-up
    pub power_up_bonus: i64,
    pub trash_points: i64,
    pub recycle_points: i64,
    pub shred_points: i64,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            combo_window_ms: 2000,
            wrong_bin_penalty: -15,
            overdue_penalty: -5,
            expiry_penalty: -5,
            expiry_grace_ms: 5000,
            power_up_bonus: 5,
            trash_points: 10,
            recycle_points: 15,
            shred_points: 20,
        }
    }
}

/// Power-up strengths and durations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    /// How long slow-motion, magnet and double points last (ms)
    pub duration_ms: Millis,
    /// Time scale while slow-motion is active
    pub slowmo_scale: f32,
    /// Speed papers are sucked toward the center by vacuum
    pub vacuum_speed: f32,
    /// Magnet pull per unit of distance from the center
    pub magnet_strength: f32,
    /// No magnet pull inside this radius
    pub magnet_deadzone: f32,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            duration_ms: 8000,
            slowmo_scale: 0.3,
            vacuum_speed: 8.0,
            magnet_strength: 0.002,
            magnet_deadzone: 50.0,
        }
    }
}

/// Wind gust pulses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindTuning {
    /// Pulses per gust
    pub pulses: u32,
    /// Time between pulses (ms)
    pub pulse_interval_ms: Millis,
    /// Strength never fades below this
    pub min_strength: f32,
    /// Random velocity kick per axis, +/- this much
    pub jitter: f32,
}

impl Default for WindTuning {
    fn default() -> Self {
        Self {
            pulses: 8,
            pulse_interval_ms: 150,
            min_strength: 0.2,
            jitter: 1.0,
        }
    }
}

/// Velocity damping and walls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTuning {
    /// Air drag for papers flying in from the edges
    pub edge_drag: f32,
    /// Air drag for printer paper
    pub printer_drag: f32,
    /// Air drag for fax paper
    pub fax_drag: f32,
    /// Bounciness of the left, top and right walls, per source
    pub edge_restitution: f32,
    pub printer_restitution: f32,
    pub fax_restitution: f32,
}

impl MotionTuning {
    /// Wall bounciness for a paper from `source`
    pub fn restitution(&self, source: PaperSource) -> f32 {
        match source {
            PaperSource::Edge => self.edge_restitution,
            PaperSource::Printer => self.printer_restitution,
            PaperSource::Fax => self.fax_restitution,
        }
    }
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            edge_drag: 0.02,
            printer_drag: 0.03,
            fax_drag: 0.04,
            edge_restitution: 0.4,
            printer_restitution: 0.3,
            fax_restitution: 0.2,
        }
    }
}

/// Complete balance configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub desk: DeskTuning,
    pub spawners: SpawnerRamps,
    pub scoring: ScoringTuning,
    pub effects: EffectTuning,
    pub wind: WindTuning,
    pub motion: MotionTuning,
}

impl Tuning {
    /// Parse tuning from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Tuning>(json).map(Tuning::sanitized)
    }

    /// Load tuning from a JSON file, falling back to defaults if it can't be read
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    return tuning;
                }
                Err(e) => log::warn!("Bad tuning file {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Can't read tuning file {}: {}", path.display(), e),
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Clamp values that would break the simulation's invariants
    pub fn sanitized(mut self) -> Self {
        for ramp in [
            &mut self.spawners.paper,
            &mut self.spawners.printer,
            &mut self.spawners.fax,
            &mut self.spawners.power_up,
            &mut self.spawners.wind,
        ] {
            ramp.floor_ms = ramp.floor_ms.max(1);
            ramp.initial_ms = ramp.initial_ms.max(ramp.floor_ms);
        }

        self.effects.slowmo_scale = self.effects.slowmo_scale.clamp(0.01, 1.0);
        self.effects.magnet_deadzone = self.effects.magnet_deadzone.max(0.0);
        self.wind.pulses = self.wind.pulses.max(1);
        self.wind.min_strength = self.wind.min_strength.clamp(0.0, 1.0);
        self.wind.jitter = self.wind.jitter.max(0.0);
        for restitution in [
            &mut self.motion.edge_restitution,
            &mut self.motion.printer_restitution,
            &mut self.motion.fax_restitution,
        ] {
            *restitution = restitution.clamp(0.0, 1.0);
        }
        for drag in [
            &mut self.motion.edge_drag,
            &mut self.motion.printer_drag,
            &mut self.motion.fax_drag,
        ] {
            *drag = drag.clamp(0.0, 0.99);
        }
        self.desk.lost_margin = self.desk.lost_margin.max(0.0);
        self
    }

    /// Serialize to pretty JSON (for writing a starter tuning file)
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_desk_rules() {
        let tuning = Tuning::default();
        assert_eq!(tuning.desk.max_desk_space, 15);
        assert_eq!(tuning.desk.power_up_ttl_ms, 20_000);
        assert_eq!(tuning.scoring.combo_window_ms, 2000);
        assert_eq!(tuning.spawners.paper, SpawnerTuning::new(2000, 800, 10));
        assert_eq!(tuning.spawners.wind, SpawnerTuning::new(8000, 4000, 200));
        assert!(!tuning.desk.penalize_lost_papers);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "desk": { "max_desk_space": 5 } }"#).unwrap();
        assert_eq!(tuning.desk.max_desk_space, 5);
        assert_eq!(tuning.desk.power_up_ttl_ms, 20_000);
        assert_eq!(tuning.scoring.wrong_bin_penalty, -15);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("{ not json").is_err());
    }

    #[test]
    fn test_sanitize_lifts_initial_to_floor() {
        let json = r#"{ "spawners": { "paper": { "initial_ms": 100, "floor_ms": 800, "step_ms": 10 } } }"#;
        let tuning = Tuning::from_json(json).unwrap();
        assert_eq!(tuning.spawners.paper.initial_ms, 800);
    }

    #[test]
    fn test_sanitize_clamps_scales() {
        let mut tuning = Tuning::default();
        tuning.effects.slowmo_scale = -2.0;
        tuning.wind.pulses = 0;
        tuning.motion.fax_restitution = 3.0;
        let tuning = tuning.sanitized();
        assert!(tuning.effects.slowmo_scale > 0.0);
        assert_eq!(tuning.wind.pulses, 1);
        assert_eq!(tuning.motion.restitution(PaperSource::Fax), 1.0);
        assert_eq!(tuning.motion.restitution(PaperSource::Printer), 0.3);
    }

    #[test]
    fn test_json_round_trip_of_defaults() {
        let json = Tuning::default().to_json();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.spawners.fax, Tuning::default().spawners.fax);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let tuning = Tuning::load(Path::new("/definitely/not/here.json"));
        assert_eq!(tuning.desk.max_desk_space, 15);
    }
}
