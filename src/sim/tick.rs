//! Simulation tick
//!
//! One call to [`tick`] advances the game by `dt` seconds: run due timers,
//! then dispatch on the current mode. Mode changes go through [`transition`],
//! which cancels the old mode's timers and runs the new mode's entry action
//! exactly once.

use glam::Vec2;

use super::boss::{Boss, BossOutcome};
use super::collision::{Contact, HazardKind, overlaps, resolve_contact};
use super::obstacle::ObstacleKind;
use super::projectile::Projectile;
use super::state::{GameEvent, GamePhase, GameState, Screen, SoundCue};
use super::timer::TimedAction;
use crate::consts::*;

/// Commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Leave the title screen
    pub start: bool,
    pub jump: bool,
    /// Shoot toward a playfield position (boss fight only)
    pub fire: Option<Vec2>,
    /// Start over from GameOver/Cleared
    pub restart: bool,
    /// Back to the title from GameOver/Cleared
    pub navigate_home: bool,
    /// Pause toggle
    pub pause: bool,
    /// Let the simulation play itself
    pub autopilot: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    assert!(dt.is_finite() && dt >= 0.0, "tick called with invalid dt {dt}");

    if input.pause && !matches!(state.phase, GamePhase::Title) && !state.phase.is_terminal() {
        state.paused = !state.paused;
        log::info!("{}", if state.paused { "Paused" } else { "Resumed" });
    }
    if state.paused {
        return;
    }

    let mut input = input.clone();
    if input.autopilot {
        autopilot(state, &mut input);
    }
    let input = &input;

    state.time_ticks += 1;
    state.clock += f64::from(dt);

    run_due_timers(state);
    if !state.phase.is_terminal() {
        expire_fever(state);
    }

    match state.phase {
        GamePhase::Title => {
            if input.start {
                start_run(state);
            }
        }
        GamePhase::Countdown => tick_countdown(state, dt),
        GamePhase::Playing => tick_playing(state, input, dt),
        GamePhase::BossFight => tick_boss_fight(state, input, dt),
        GamePhase::GameOver | GamePhase::Cleared => {
            if input.restart {
                start_run(state);
            } else if input.navigate_home {
                transition(state, GamePhase::Title);
            }
        }
    }
}

/// Switch modes, running the new mode's entry action once
pub fn transition(state: &mut GameState, to: GamePhase) {
    let from = state.phase;
    if from == to {
        return;
    }

    let cancelled = state.timers.cancel_owned_by(from);
    if cancelled > 0 {
        log::debug!("Cancelled {} timer(s) owned by {:?}", cancelled, from);
    }

    log::info!("{:?} -> {:?} (score {})", from, to, state.score);
    state.phase = to;
    state.push_event(GameEvent::PhaseChanged { from, to });

    match to {
        GamePhase::Title => {
            state.push_event(GameEvent::Navigate(Screen::Home));
        }
        GamePhase::Countdown => {
            let shown = state.countdown.ceil() as u32;
            state.push_event(GameEvent::CountdownTick(shown));
        }
        GamePhase::Playing => {
            state.push_event(GameEvent::StartMusic);
        }
        GamePhase::BossFight => enter_boss_fight(state),
        GamePhase::GameOver => enter_game_over(state),
        GamePhase::Cleared => enter_cleared(state),
    }
}

/// Reset everything and begin a run (via the countdown if configured)
fn start_run(state: &mut GameState) {
    state.reset_run();
    log::info!("Run {} starting (seed {})", state.run, state.seed);
    state.push_event(GameEvent::Navigate(Screen::Game));
    state.push_event(GameEvent::ScoreChanged(0));

    if state.settings().countdown_secs > 0.0 {
        transition(state, GamePhase::Countdown);
    } else {
        transition(state, GamePhase::Playing);
    }
}

fn enter_boss_fight(state: &mut GameState) {
    log::info!("Boss fight begins at score {}", state.score);

    state.stream.clear();
    state.stream.halt();
    state.projectiles.clear();

    let due = state.clock + BOSS_SPAWN_DELAY;
    state.timers.schedule(due, GamePhase::BossFight, TimedAction::SpawnBoss);

    let launch = state.settings().jump_velocity * BOSS_LAUNCH_FACTOR;
    state.body.bounce(launch);
}

fn enter_game_over(state: &mut GameState) {
    finish_run(state, false);
    state.push_event(GameEvent::PlaySound(SoundCue::GameOver));

    let now = state.clock;
    let owner = GamePhase::GameOver;
    state.timers.schedule(
        now + GAME_OVER_SCREAM_DELAY,
        owner,
        TimedAction::PlaySound(SoundCue::Scream),
    );
    state.timers.schedule(
        now + GAME_OVER_JEER_DELAY,
        owner,
        TimedAction::PlaySound(SoundCue::Jeer),
    );
    state.timers.schedule(
        now + GAME_OVER_RESULTS_DELAY,
        owner,
        TimedAction::Navigate(Screen::Results),
    );
}

fn enter_cleared(state: &mut GameState) {
    finish_run(state, true);
    state.push_event(GameEvent::PlaySound(SoundCue::Clear));
    state.timers.schedule(
        state.clock + CLEARED_RESULTS_DELAY,
        GamePhase::Cleared,
        TimedAction::Navigate(Screen::Results),
    );
}

/// Latch the final score and clear the playfield
fn finish_run(state: &mut GameState, cleared: bool) {
    let final_score = state.score;
    state.final_score = Some(final_score);
    state.stream.clear();
    state.stream.halt();
    state.boss = None;
    state.projectiles.clear();
    state.fever_until = None;

    log::info!(
        "Run {} {} with score {} after {:.1}s",
        state.run,
        if cleared { "cleared" } else { "over" },
        final_score,
        state.elapsed
    );
    state.push_event(GameEvent::StopMusic);
    state.push_event(GameEvent::ShowGameOver { final_score, cleared });
}

fn run_due_timers(state: &mut GameState) {
    while let Some(timer) = state.timers.pop_due(state.clock) {
        if timer.owner != state.phase {
            log::debug!("Dropping stale {:?} from {:?}", timer.action, timer.owner);
            continue;
        }
        match timer.action {
            TimedAction::SpawnBoss => spawn_boss(state),
            TimedAction::PlaySound(cue) => state.push_event(GameEvent::PlaySound(cue)),
            TimedAction::Navigate(screen) => state.push_event(GameEvent::Navigate(screen)),
        }
    }
}

fn spawn_boss(state: &mut GameState) {
    if state.boss.is_some() {
        return;
    }
    let boss = Boss::new(state.settings().boss_hp);
    log::info!("Boss appears with {} hp", boss.hp);
    state.push_event(GameEvent::PlaySound(SoundCue::BossAppear));
    state.push_event(GameEvent::BossHp {
        remaining: boss.hp,
        max: boss.max_hp,
    });
    state.boss = Some(boss);
}

fn tick_countdown(state: &mut GameState, dt: f32) {
    let before = state.countdown.ceil() as u32;
    state.countdown -= dt;
    if state.countdown <= 0.0 {
        state.countdown = 0.0;
        transition(state, GamePhase::Playing);
        return;
    }
    let after = state.countdown.ceil() as u32;
    if after != before {
        state.push_event(GameEvent::CountdownTick(after));
    }
}

fn try_jump(state: &mut GameState) {
    let velocity = state.settings().jump_velocity;
    if state.body.jump(velocity) {
        state.push_event(GameEvent::PlaySound(SoundCue::Jump));
    }
}

fn award(state: &mut GameState, points: u64) {
    if points == 0 {
        return;
    }
    let before = state.score;
    state.score += points;
    let after = state.score;
    state.push_event(GameEvent::ScoreChanged(after));

    let milestone = state
        .settings()
        .fever_scores
        .iter()
        .any(|&m| before < m && m <= after);
    if milestone {
        start_fever(state);
    }
}

/// Temporary invincibility after a score milestone
fn start_fever(state: &mut GameState) {
    let secs = state.settings().fever_secs;
    if secs <= 0.0 {
        return;
    }
    let until = state.clock + secs;
    state.body.invuln_until = state.body.invuln_until.max(until);
    state.fever_until = Some(until);
    log::info!("Fever at score {} for {:.1}s", state.score, secs);
    state.push_event(GameEvent::FeverStarted { secs });
}

fn expire_fever(state: &mut GameState) {
    if let Some(until) = state.fever_until {
        if state.clock >= until {
            state.fever_until = None;
            state.push_event(GameEvent::FeverEnded);
        }
    }
}

fn tick_playing(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.jump {
        try_jump(state);
    }
    if input.fire.is_some() {
        log::debug!("Fire ignored outside the boss fight");
    }

    state.elapsed += f64::from(dt);
    let speed = state.scroll_speed();
    let gravity = state.settings().gravity;

    state.body.apply_gravity_and_integrate(dt, gravity);
    let update = state.stream.update(dt, speed, &mut state.rng);

    // Hazards that scrolled past count even if this tick ends the run
    award(state, u64::from(update.passed) * SCORE_PER_PASS);

    if resolve_obstacle_contacts(state) {
        return;
    }

    if state.score >= state.settings().boss_score_threshold {
        transition(state, GamePhase::BossFight);
    }
}

/// Land on platforms and take hits from hazards. Returns true on game over.
fn resolve_obstacle_contacts(state: &mut GameState) -> bool {
    let now = state.clock;
    let invuln = state.settings().invuln_secs;
    let body_rect = state.body.rect();
    let vel_y = state.body.vel_y;

    let mut landing: Option<f32> = None;
    let mut hit = false;
    for obstacle in state.stream.obstacles_mut() {
        if !obstacle.alive {
            continue;
        }
        match resolve_contact(&body_rect, vel_y, &obstacle.rect(), obstacle.kind.hazard_kind()) {
            Contact::Land { top } => {
                landing = Some(landing.map_or(top, |t| t.max(top)));
            }
            Contact::Lethal => {
                if state.body.take_hit(now, invuln) {
                    obstacle.alive = false;
                    hit = true;
                }
            }
            Contact::Stomp | Contact::Miss => {}
        }
    }

    if let Some(top) = landing {
        state.body.land_on(top);
    }
    state.stream.retain_alive();

    if hit {
        state.push_event(GameEvent::PlaySound(SoundCue::Hit));
        if state.body.hp == 0 {
            transition(state, GamePhase::GameOver);
            return true;
        }
    }
    false
}

fn fire(state: &mut GameState, target: Vec2) {
    if state.projectiles.len() >= MAX_PROJECTILES {
        return;
    }
    let projectile = Projectile::aimed(state.body.center(), target);
    state.projectiles.push(projectile);
    state.push_event(GameEvent::PlaySound(SoundCue::Fire));
}

/// Damage dealt to the boss this tick, applied after the boss borrow ends
#[derive(Default)]
struct BossDamage {
    hits: u32,
    stomped: bool,
    defeated: bool,
    lethal: bool,
}

fn tick_boss_fight(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.jump {
        try_jump(state);
    }
    if let Some(target) = input.fire {
        fire(state, target);
    }

    state.elapsed += f64::from(dt);
    let gravity = state.settings().gravity;
    state.body.apply_gravity_and_integrate(dt, gravity);

    for projectile in &mut state.projectiles {
        projectile.update(dt);
    }
    state.projectiles.retain(|p| !p.is_off_screen());

    let now = state.clock;
    let body_rect = state.body.rect();
    let vel_y = state.body.vel_y;

    let damage = {
        let Some(boss) = state.boss.as_mut() else {
            return;
        };

        match boss.update(dt) {
            BossOutcome::Continue => {}
            BossOutcome::Escaped => {
                log::info!("Boss escaped with {} hp left", boss.hp);
                transition(state, GamePhase::GameOver);
                return;
            }
            BossOutcome::Exited => {
                state.boss = None;
                transition(state, GamePhase::Cleared);
                return;
            }
        }

        let mut damage = BossDamage::default();

        // Each projectile is consumed by its hit, so it counts once
        let boss_rect = boss.rect();
        state.projectiles.retain(|p| {
            if boss.is_hittable() && overlaps(&p.rect(), &boss_rect) {
                damage.defeated |= boss.register_hit();
                damage.hits += 1;
                false
            } else {
                true
            }
        });

        match resolve_contact(&body_rect, vel_y, &boss.rect(), HazardKind::Boss) {
            Contact::Stomp => {
                if boss.can_be_stomped(now) {
                    damage.defeated |= boss.register_stomp(now);
                    damage.hits += 1;
                    damage.stomped = true;
                }
            }
            Contact::Lethal => {
                if boss.is_hittable() && now >= boss.stomp_cooldown_until {
                    damage.lethal = true;
                }
            }
            Contact::Land { .. } | Contact::Miss => {}
        }
        damage
    };

    if damage.stomped {
        let bounce = state.settings().jump_velocity * STOMP_BOUNCE_FACTOR;
        state.body.bounce(bounce);
        state.push_event(GameEvent::PlaySound(SoundCue::Stomp));
    }

    if damage.hits > 0 {
        award(state, u64::from(damage.hits) * SCORE_PER_BOSS_HIT);
        state.push_event(GameEvent::PlaySound(SoundCue::Hit));
        if let Some(boss) = &state.boss {
            let event = GameEvent::BossHp {
                remaining: boss.hp,
                max: boss.max_hp,
            };
            state.push_event(event);
        }
    }

    if damage.defeated {
        log::info!("Boss down");
        state.push_event(GameEvent::PlaySound(SoundCue::BossDown));
    }

    if damage.lethal {
        let invuln = state.settings().invuln_secs;
        if state.body.take_hit(now, invuln) {
            state.push_event(GameEvent::PlaySound(SoundCue::Hit));
            if state.body.hp == 0 {
                transition(state, GamePhase::GameOver);
            }
        }
    }
}

/// Fill in commands for demo/idle play
fn autopilot(state: &GameState, input: &mut TickInput) {
    let body = state.body.rect();
    match state.phase {
        GamePhase::Title => input.start = true,
        GamePhase::Playing => {
            // Jump when a ground hazard is about to reach us
            let lead = state.scroll_speed() * 0.25;
            let threat = state.stream.obstacles().iter().any(|o| {
                o.alive
                    && o.kind == ObstacleKind::Hazard
                    && o.pos.y < body.top()
                    && o.pos.y + o.size.y > body.bottom()
                    && o.pos.x >= body.max.x
                    && o.pos.x - body.max.x <= lead
            });
            input.jump |= threat;
        }
        GamePhase::BossFight => {
            if let Some(boss) = &state.boss {
                if boss.is_hittable() {
                    if state.projectiles.is_empty() {
                        input.fire = Some(boss.rect().center());
                    }
                    let gap = boss.pos.x - body.max.x;
                    input.jump |= (0.0..=60.0).contains(&gap);
                }
            }
        }
        GamePhase::Countdown | GamePhase::GameOver | GamePhase::Cleared => {}
    }
}
