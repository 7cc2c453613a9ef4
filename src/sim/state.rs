//! Game state and core simulation types
//!
//! `GameState` is the single simulation context: the host owns it and passes
//! it to [`super::tick`] every frame. Nothing here is global.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::boss::Boss;
use super::obstacle::{ObstacleStream, SpawnPolicy};
use super::projectile::Projectile;
use super::timer::TimerQueue;
use crate::settings::Settings;

/// Current mode of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start
    Title,
    /// Short "get ready" count before a run
    Countdown,
    /// Running and jumping over the obstacle stream
    Playing,
    /// Obstacles cleared, boss on its way or on screen
    BossFight,
    /// Run lost
    GameOver,
    /// Boss beaten
    Cleared,
}

impl GamePhase {
    /// GameOver and Cleared: no physics, only restart/home
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Cleared)
    }
}

/// Sound cues the host maps to assets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    Jump,
    /// Body or boss took damage
    Hit,
    Stomp,
    Fire,
    BossAppear,
    BossDown,
    GameOver,
    Scream,
    Jeer,
    Clear,
}

/// Screens the host can be asked to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    Home,
    Game,
    Results,
}

/// Signals emitted for the host (rendering, audio, navigation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    PlaySound(SoundCue),
    StartMusic,
    StopMusic,
    ShowGameOver { final_score: u64, cleared: bool },
    Navigate(Screen),
    ScoreChanged(u64),
    BossHp { remaining: u32, max: u32 },
    /// Whole seconds left before the run starts
    CountdownTick(u32),
    /// Score milestone reached: invincible for `secs`
    FeverStarted { secs: f64 },
    FeverEnded,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    settings: Settings,
    pub(crate) rng: Pcg32,
    /// Current mode
    pub phase: GamePhase,
    /// Frozen by the pause toggle
    pub paused: bool,
    /// Simulation clock (seconds since creation, stops while paused)
    pub clock: f64,
    /// Seconds of play in the current run (drives difficulty)
    pub elapsed: f64,
    /// Seconds left in the countdown
    pub countdown: f32,
    pub score: u64,
    /// Score latched on the terminal transition
    pub final_score: Option<u64>,
    /// Clock time at which the current fever ends
    pub fever_until: Option<f64>,
    /// Runs started so far
    pub run: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub body: Body,
    pub stream: ObstacleStream,
    pub boss: Option<Boss>,
    pub projectiles: Vec<Projectile>,
    pub timers: TimerQueue,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game on the title screen
    pub fn new(settings: Settings, seed: u64) -> Self {
        let settings = settings.normalized();
        let policy = SpawnPolicy::from_settings(&settings);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Title,
            paused: false,
            clock: 0.0,
            elapsed: 0.0,
            countdown: settings.countdown_secs,
            score: 0,
            final_score: None,
            fever_until: None,
            run: 0,
            time_ticks: 0,
            body: Body::new(settings.start_hp),
            stream: ObstacleStream::new(policy),
            boss: None,
            projectiles: Vec::new(),
            timers: TimerQueue::new(),
            events: Vec::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Swap settings between runs. Refused while a run is in progress.
    pub fn reconfigure(&mut self, settings: Settings) -> bool {
        if !(self.phase == GamePhase::Title || self.phase.is_terminal()) {
            log::warn!("Ignoring reconfigure during {:?}", self.phase);
            return false;
        }
        self.settings = settings.normalized();
        self.stream = ObstacleStream::new(SpawnPolicy::from_settings(&self.settings));
        log::info!("Settings updated");
        true
    }

    /// Put every per-run value back to its starting point
    pub fn reset_run(&mut self) {
        self.body = Body::new(self.settings.start_hp);
        self.stream = ObstacleStream::new(SpawnPolicy::from_settings(&self.settings));
        let speed = self.settings.scroll_speed;
        self.stream.reset(speed, &mut self.rng);
        self.boss = None;
        self.projectiles.clear();
        self.timers.clear();
        self.score = 0;
        self.final_score = None;
        self.fever_until = None;
        self.elapsed = 0.0;
        self.countdown = self.settings.countdown_secs;
        self.paused = false;
        self.run += 1;
    }

    /// Scroll speed for the current run time: ramps up, then holds at the cap
    pub fn scroll_speed(&self) -> f32 {
        let s = &self.settings;
        let ramped = s.scroll_speed + s.speed_ramp * self.elapsed as f32;
        ramped.min(s.max_scroll_speed)
    }

    /// Score to display: frozen once the run has ended
    pub fn display_score(&self) -> u64 {
        self.final_score.unwrap_or(self.score)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events emitted since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
