//! Fugu Runner - a side-scrolling jump-and-stomp runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (body physics, obstacle stream, boss fight, game modes)
//! - `settings`: Run configuration and normalization
//! - `highscores`: Session leaderboard of finished runs
//!
//! Rendering, audio playback and screen management are left to the host;
//! the simulation only emits [`sim::GameEvent`]s describing what should happen.

pub mod highscores;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use settings::{Settings, SpawnMode};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (y-up, origin bottom-left)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    /// Height of the ground plane
    pub const GROUND_Y: f32 = 40.0;

    /// Player body
    pub const BODY_X: f32 = 100.0;
    pub const BODY_SIZE: f32 = 80.0;

    /// Obstacles
    pub const OBSTACLE_SIZE: f32 = 60.0;
    pub const PLATFORM_HEIGHT: f32 = 30.0;
    /// Vertical position of each spawn lane (bottom edge)
    pub const LANE_Y: [f32; 3] = [GROUND_Y, GROUND_Y + 180.0, GROUND_Y + 320.0];
    /// Live obstacle cap
    pub const MAX_OBSTACLES: usize = 48;
    /// Absolute floor for any spawn delay (seconds)
    pub const MIN_SPAWN_INTERVAL: f64 = 0.2;

    /// Boss
    pub const BOSS_WIDTH: f32 = 150.0;
    pub const BOSS_HEIGHT: f32 = 120.0;
    /// Boss hover height above the ground
    pub const BOSS_HOVER: f32 = 20.0;
    /// Horizontal stop point when the boss finishes entering (distance from right edge)
    pub const BOSS_TARGET_INSET: f32 = 200.0;
    pub const BOSS_ENTER_SPEED: f32 = 120.0;
    /// Slow creep toward the player once fighting
    pub const BOSS_ADVANCE_SPEED: f32 = 40.0;
    /// Retreat speed after defeat
    pub const BOSS_EXIT_SPEED: f32 = 600.0;
    /// Delay between entering the boss fight and the boss appearing (seconds)
    pub const BOSS_SPAWN_DELAY: f64 = 1.0;
    /// Window after a stomp during which boss overlap is ignored (seconds)
    pub const STOMP_COOLDOWN: f64 = 0.3;

    /// Contact bands (pixels below a top edge that still count as "on top")
    pub const STOMP_BAND: f32 = 20.0;
    pub const LAND_BAND: f32 = 15.0;

    /// Bounce after a stomp, relative to jump velocity
    pub const STOMP_BOUNCE_FACTOR: f32 = 0.7;
    /// Launch when the boss fight starts, relative to jump velocity
    pub const BOSS_LAUNCH_FACTOR: f32 = 1.5;

    /// Projectiles
    pub const PROJECTILE_SPEED: f32 = 1320.0;
    pub const PROJECTILE_SIZE: f32 = 60.0;
    pub const MAX_PROJECTILES: usize = 16;

    /// Scoring
    pub const SCORE_PER_PASS: u64 = 1;
    pub const SCORE_PER_BOSS_HIT: u64 = 1;

    /// Terminal sequence timings (seconds after entering the mode)
    pub const GAME_OVER_SCREAM_DELAY: f64 = 2.0;
    pub const GAME_OVER_JEER_DELAY: f64 = 2.5;
    pub const GAME_OVER_RESULTS_DELAY: f64 = 2.6;
    pub const CLEARED_RESULTS_DELAY: f64 = 5.0;
}
