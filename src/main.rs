//! Fugu Runner entry point
//!
//! Headless native driver: loads settings, then plays the game on autopilot
//! through a fixed-step accumulator and prints the session leaderboard.
//!
//! Usage: `fugu-runner [config.json] [--seed N] [--secs S] [--spawn-mode MODE]`

use std::path::PathBuf;

use fugu_runner::consts::*;
use fugu_runner::sim::{GameEvent, GamePhase, GameState, Screen, TickInput, tick};
use fugu_runner::{HighScores, Settings, SpawnMode};

/// Frame pacing the driver pretends to render at: mostly 60 fps with the
/// occasional long frame so the accumulator has to catch up
const FRAME_TIMES: [f32; 8] = [
    1.0 / 60.0,
    1.0 / 60.0,
    1.0 / 30.0,
    1.0 / 60.0,
    1.0 / 144.0,
    1.0 / 60.0,
    0.25,
    1.0 / 60.0,
];

#[derive(Debug)]
struct Options {
    config: Option<PathBuf>,
    seed: u64,
    secs: f32,
    spawn_mode: Option<SpawnMode>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            config: None,
            seed: 0x5eed,
            secs: 120.0,
            spawn_mode: None,
        }
    }
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => {
                let value = args.next().ok_or("--seed needs a value")?;
                options.seed = value.parse().map_err(|_| format!("bad seed: {value}"))?;
            }
            "--secs" => {
                let value = args.next().ok_or("--secs needs a value")?;
                let secs: f32 = value.parse().map_err(|_| format!("bad duration: {value}"))?;
                if !secs.is_finite() || secs < 0.0 {
                    return Err(format!("bad duration: {value}"));
                }
                options.secs = secs;
            }
            "--spawn-mode" => {
                let value = args.next().ok_or("--spawn-mode needs a value")?;
                let mode = SpawnMode::from_str(&value)
                    .ok_or_else(|| format!("unknown spawn mode: {value}"))?;
                options.spawn_mode = Some(mode);
            }
            "-h" | "--help" => {
                return Err(String::new());
            }
            _ if arg.starts_with('-') => return Err(format!("unknown flag: {arg}")),
            _ => options.config = Some(PathBuf::from(arg)),
        }
    }
    Ok(options)
}

/// Game instance driven by the frame loop
struct Runner {
    state: GameState,
    accumulator: f32,
    input: TickInput,
    scores: HighScores,
    runs_finished: u32,
}

impl Runner {
    fn new(settings: Settings, seed: u64) -> Self {
        Self {
            state: GameState::new(settings, seed),
            accumulator: 0.0,
            input: TickInput {
                autopilot: true,
                ..Default::default()
            },
            scores: HighScores::new(),
            runs_finished: 0,
        }
    }

    /// Run simulation ticks for one frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.clone();
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.start = false;
            self.input.restart = false;
            self.input.navigate_home = false;
            self.input.pause = false;

            self.handle_events();
        }
    }

    /// React to simulation events the way a front end would
    fn handle_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::ShowGameOver {
                    final_score,
                    cleared,
                } => {
                    self.runs_finished += 1;
                    let elapsed = self.state.elapsed;
                    match self.scores.add_score(final_score, cleared, elapsed) {
                        Some(rank) => log::info!("Score {} ranks #{}", final_score, rank),
                        None => log::info!("Score {} did not place", final_score),
                    }
                }
                GameEvent::Navigate(Screen::Results) => {
                    // Results screen shown; go again
                    self.input.restart = true;
                }
                GameEvent::PhaseChanged { to, .. } if to == GamePhase::Playing => {
                    log::debug!("Run {} under way", self.state.run);
                }
                GameEvent::FeverStarted { secs } => {
                    log::debug!("Fever for {:.1}s at score {}", secs, self.state.score);
                }
                GameEvent::PlaySound(cue) => log::trace!("sound {:?}", cue),
                other => log::debug!("{:?}", other),
            }
        }
    }
}

fn main() {
    env_logger::init();

    let options = match parse_args() {
        Ok(options) => options,
        Err(message) => {
            if !message.is_empty() {
                eprintln!("{message}");
            }
            eprintln!(
                "Usage: fugu-runner [config.json] [--seed N] [--secs S] [--spawn-mode uniform_jitter|poisson]"
            );
            std::process::exit(2);
        }
    };

    let mut settings = match &options.config {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if let Some(mode) = options.spawn_mode {
        settings.spawn_mode = mode;
    }

    log::info!(
        "Fugu Runner (headless) starting: seed {}, {:.0}s, {} spawns",
        options.seed,
        options.secs,
        settings.spawn_mode.as_str()
    );

    let mut runner = Runner::new(settings, options.seed);
    let mut simulated = 0.0f32;
    let mut frame = 0usize;
    while simulated < options.secs {
        let dt = FRAME_TIMES[frame % FRAME_TIMES.len()];
        runner.update(dt);
        simulated += dt;
        frame += 1;
    }

    log::info!(
        "Finished {} run(s) in {} frames; best score {:?}",
        runner.runs_finished,
        frame,
        runner.scores.top_score()
    );

    match serde_json::to_string_pretty(&runner.scores) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Failed to serialize leaderboard: {}", e);
            std::process::exit(1);
        }
    }
}
