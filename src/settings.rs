//! Run configuration
//!
//! Supplied when a [`crate::sim::GameState`] is built and fixed for the
//! duration of a run. Loaded from JSON on native builds.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::MIN_SPAWN_INTERVAL;

/// How the delay until the next obstacle batch is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SpawnMode {
    /// Base interval plus bounded uniform jitter
    #[default]
    UniformJitter,
    /// Exponential inter-arrival times around the base interval
    Poisson,
}

impl SpawnMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpawnMode::UniformJitter => "uniform_jitter",
            SpawnMode::Poisson => "poisson",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "uniform_jitter" | "uniform" | "jitter" => Some(SpawnMode::UniformJitter),
            "poisson" => Some(SpawnMode::Poisson),
            _ => None,
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Spawning ===
    /// Shortest delay between obstacle batches (seconds)
    pub spawn_interval_min: f64,
    /// Longest nominal delay between obstacle batches (seconds)
    pub spawn_interval_max: f64,
    pub spawn_mode: SpawnMode,
    /// Chance that a batch holds two obstacles instead of one
    pub double_spawn_chance: f64,
    /// Chance that a spawned obstacle is a platform rather than a hazard
    pub platform_chance: f64,
    /// Platform width (pixels)
    pub platform_width: f32,
    /// Shrink spawn delays as the scroll speed rises
    pub scale_spawn_with_speed: bool,

    // === Physics ===
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Initial upward velocity of a jump (pixels/s)
    pub jump_velocity: f32,

    // === Scrolling ===
    /// Scroll speed at the start of a run (pixels/s)
    pub scroll_speed: f32,
    /// Scroll speed cap (pixels/s)
    pub max_scroll_speed: f32,
    /// Speed gained per second of play (pixels/s²)
    pub speed_ramp: f32,

    // === Progression ===
    /// Score at which the boss fight begins
    pub boss_score_threshold: u64,
    pub boss_hp: u32,
    pub start_hp: u32,
    /// Invulnerability after taking a hit (seconds)
    pub invuln_secs: f64,
    /// Length of the pre-run countdown (0 skips it)
    pub countdown_secs: f32,
    /// Scores that trigger a fever (temporary invincibility)
    pub fever_scores: Vec<u64>,
    /// Fever length (seconds)
    pub fever_secs: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            spawn_interval_min: 1.0,
            spawn_interval_max: 3.0,
            spawn_mode: SpawnMode::UniformJitter,
            double_spawn_chance: 0.3,
            platform_chance: 0.3,
            platform_width: 150.0,
            scale_spawn_with_speed: false,

            gravity: 1500.0,
            jump_velocity: 700.0,

            scroll_speed: 300.0,
            max_scroll_speed: 600.0,
            speed_ramp: 3.0,

            boss_score_threshold: 10,
            boss_hp: 5,
            start_hp: 1,
            invuln_secs: 1.0,
            countdown_secs: 3.0,
            fever_scores: vec![5],
            fever_secs: 5.0,
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::normalized)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Malformed settings in {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Cannot read {}: {} - using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Repair inconsistent values instead of rejecting them
    pub fn normalized(mut self) -> Self {
        self.replace_non_finite();

        if self.spawn_interval_min > self.spawn_interval_max {
            log::warn!(
                "spawn_interval_min {} > spawn_interval_max {}, swapping",
                self.spawn_interval_min,
                self.spawn_interval_max
            );
            std::mem::swap(&mut self.spawn_interval_min, &mut self.spawn_interval_max);
        }
        if self.spawn_interval_min.is_nan() || self.spawn_interval_min < MIN_SPAWN_INTERVAL {
            log::warn!(
                "spawn_interval_min {} raised to {}",
                self.spawn_interval_min,
                MIN_SPAWN_INTERVAL
            );
            self.spawn_interval_min = MIN_SPAWN_INTERVAL;
        }
        self.spawn_interval_max = self.spawn_interval_max.max(self.spawn_interval_min);

        if self.gravity < 0.0 {
            log::warn!("gravity {} given as a signed value, using its magnitude", self.gravity);
            self.gravity = -self.gravity;
        }
        self.jump_velocity = self.jump_velocity.abs();
        self.scroll_speed = self.scroll_speed.abs();
        self.speed_ramp = self.speed_ramp.max(0.0);
        if self.max_scroll_speed < self.scroll_speed {
            log::warn!(
                "max_scroll_speed {} below scroll_speed {}, raising",
                self.max_scroll_speed,
                self.scroll_speed
            );
            self.max_scroll_speed = self.scroll_speed;
        }

        self.double_spawn_chance = clamp_chance(self.double_spawn_chance);
        self.platform_chance = clamp_chance(self.platform_chance);
        self.platform_width = self.platform_width.max(1.0);

        self.boss_hp = self.boss_hp.max(1);
        self.start_hp = self.start_hp.max(1);
        self.invuln_secs = self.invuln_secs.max(0.0);
        self.countdown_secs = self.countdown_secs.max(0.0);

        self.fever_secs = self.fever_secs.max(0.0);
        self.fever_scores.retain(|&s| s > 0);
        self.fever_scores.sort_unstable();
        self.fever_scores.dedup();
        self
    }

    /// NaN and infinite floats fall back to their defaults
    fn replace_non_finite(&mut self) {
        let defaults = Settings::default();
        macro_rules! finite_or_default {
            ($s:ident, $d:ident, $($field:ident),+ $(,)?) => {
                $(
                    if !$s.$field.is_finite() {
                        log::warn!(
                            "{} is {}, using default {}",
                            stringify!($field),
                            $s.$field,
                            $d.$field
                        );
                        $s.$field = $d.$field;
                    }
                )+
            };
        }
        let settings = self;
        finite_or_default!(
            settings,
            defaults,
            spawn_interval_min,
            spawn_interval_max,
            double_spawn_chance,
            platform_chance,
            platform_width,
            gravity,
            jump_velocity,
            scroll_speed,
            max_scroll_speed,
            speed_ramp,
            invuln_secs,
            countdown_secs,
            fever_secs,
        );
    }
}

fn clamp_chance(p: f64) -> f64 {
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swaps_inverted_interval() {
        let settings = Settings {
            spawn_interval_min: 3.0,
            spawn_interval_max: 1.5,
            ..Default::default()
        }
        .normalized();
        assert_eq!(settings.spawn_interval_min, 1.5);
        assert_eq!(settings.spawn_interval_max, 3.0);
    }

    #[test]
    fn test_floors_spawn_interval_and_fixes_signs() {
        let settings = Settings {
            spawn_interval_min: 0.01,
            spawn_interval_max: 0.05,
            gravity: -900.0,
            double_spawn_chance: 4.0,
            boss_hp: 0,
            max_scroll_speed: 10.0,
            ..Default::default()
        }
        .normalized();
        assert_eq!(settings.spawn_interval_min, MIN_SPAWN_INTERVAL);
        assert_eq!(settings.spawn_interval_max, MIN_SPAWN_INTERVAL);
        assert_eq!(settings.gravity, 900.0);
        assert_eq!(settings.double_spawn_chance, 1.0);
        assert_eq!(settings.boss_hp, 1);
        assert_eq!(settings.max_scroll_speed, settings.scroll_speed);
    }

    #[test]
    fn test_non_finite_values_fall_back_to_defaults() {
        let defaults = Settings::default();
        let settings = Settings {
            spawn_interval_max: f64::INFINITY,
            gravity: f32::NAN,
            jump_velocity: f32::NEG_INFINITY,
            scroll_speed: f32::NAN,
            max_scroll_speed: f32::INFINITY,
            platform_chance: f64::NAN,
            invuln_secs: f64::INFINITY,
            fever_secs: f64::NAN,
            ..Default::default()
        }
        .normalized();
        assert_eq!(settings, defaults);
    }

    #[test]
    fn test_normalized_floats_are_all_finite() {
        let settings = Settings {
            spawn_interval_min: f64::NAN,
            spawn_interval_max: f64::NEG_INFINITY,
            speed_ramp: f32::INFINITY,
            countdown_secs: f32::NAN,
            platform_width: f32::INFINITY,
            ..Default::default()
        }
        .normalized();
        assert!(settings.spawn_interval_min.is_finite());
        assert!(settings.spawn_interval_max >= settings.spawn_interval_min);
        assert!(settings.speed_ramp.is_finite());
        assert!(settings.countdown_secs.is_finite());
        assert!(settings.platform_width.is_finite());
    }

    #[test]
    fn test_fever_scores_sorted_and_deduplicated() {
        let settings = Settings {
            fever_scores: vec![20, 0, 10, 20],
            fever_secs: -1.0,
            ..Default::default()
        }
        .normalized();
        assert_eq!(settings.fever_scores, vec![10, 20]);
        assert_eq!(settings.fever_secs, 0.0);
    }

    #[test]
    fn test_default_is_already_normal() {
        assert_eq!(Settings::default().normalized(), Settings::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings =
            Settings::from_json(r#"{ "boss_score_threshold": 25, "spawn_mode": "poisson" }"#)
                .unwrap();
        assert_eq!(settings.boss_score_threshold, 25);
        assert_eq!(settings.spawn_mode, SpawnMode::Poisson);
        assert_eq!(settings.gravity, Settings::default().gravity);
    }

    #[test]
    fn test_json_is_normalized() {
        let settings =
            Settings::from_json(r#"{ "spawn_interval_min": 4.0, "spawn_interval_max": 2.0 }"#)
                .unwrap();
        assert_eq!(settings.spawn_interval_min, 2.0);
        assert_eq!(settings.spawn_interval_max, 4.0);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Settings::from_json("{ gravity: }").is_err());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let settings = Settings::load(Path::new("/definitely/not/here/settings.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_spawn_mode_names() {
        assert_eq!(SpawnMode::from_str("Poisson"), Some(SpawnMode::Poisson));
        assert_eq!(SpawnMode::from_str("uniform"), Some(SpawnMode::UniformJitter));
        assert_eq!(SpawnMode::from_str("burst"), None);
        assert_eq!(SpawnMode::Poisson.as_str(), "poisson");
    }
}
