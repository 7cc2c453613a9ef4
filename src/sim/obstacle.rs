//! Obstacles and the stream that spawns, scrolls and retires them

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::collision::{HazardKind, Rect};
use crate::consts::*;
use crate::settings::{Settings, SpawnMode};

/// Slack for comparing the accumulated spawn timer against its delay
const SPAWN_EPSILON: f64 = 1e-6;

/// Obstacle flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Kills on contact; scores when it scrolls past
    Hazard,
    /// Ledge to stand on
    Platform,
}

impl ObstacleKind {
    pub fn hazard_kind(&self) -> HazardKind {
        match self {
            ObstacleKind::Hazard => HazardKind::Spike,
            ObstacleKind::Platform => HazardKind::Platform,
        }
    }
}

/// A scrolling obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub lane: usize,
    /// Bottom-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub alive: bool,
}

impl Obstacle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.pos + self.size)
    }

    /// Trailing (left) edge has passed the left side of the screen
    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.size.x < 0.0
    }
}

/// Spawn parameters, captured from [`Settings`] when a run starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnPolicy {
    pub mode: SpawnMode,
    pub interval_min: f64,
    pub interval_max: f64,
    pub double_spawn_chance: f64,
    pub platform_chance: f64,
    pub platform_width: f32,
    /// Speed at which delays are unscaled
    pub base_speed: f32,
    pub scale_with_speed: bool,
}

impl SpawnPolicy {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            mode: settings.spawn_mode,
            interval_min: settings.spawn_interval_min,
            interval_max: settings.spawn_interval_max,
            double_spawn_chance: settings.double_spawn_chance,
            platform_chance: settings.platform_chance,
            platform_width: settings.platform_width,
            base_speed: settings.scroll_speed,
            scale_with_speed: settings.scale_spawn_with_speed,
        }
    }

    /// Draw the delay until the next batch
    pub fn next_delay(&self, speed: f32, rng: &mut impl Rng) -> f64 {
        let base = (self.interval_min + self.interval_max) / 2.0;
        let raw = match self.mode {
            SpawnMode::UniformJitter => {
                let jitter = (self.interval_max - self.interval_min) / 2.0;
                base + rng.random_range(-jitter..=jitter)
            }
            SpawnMode::Poisson => {
                let lambda = 1.0 / base.max(0.001);
                let u: f64 = rng.random();
                -(1.0 - u).ln() / lambda
            }
        };
        let mut delay = raw.max(self.interval_min);

        if self.scale_with_speed && speed > self.base_speed && self.base_speed > 0.0 {
            delay *= f64::from(self.base_speed / speed);
        }

        delay.max(MIN_SPAWN_INTERVAL)
    }
}

/// What happened to the stream during one update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamUpdate {
    pub spawned: u32,
    /// Live hazards that scrolled off the trailing edge
    pub passed: u32,
    /// Everything removed for being off-screen
    pub removed: u32,
}

/// Ordered set of live obstacles plus the spawn timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleStream {
    policy: SpawnPolicy,
    obstacles: Vec<Obstacle>,
    /// Time accumulated toward the next spawn
    timer: f64,
    /// Scheduled delay; `None` while spawning is halted
    next_delay: Option<f64>,
    next_id: u32,
    spawned_total: u64,
    batches: u64,
}

impl ObstacleStream {
    /// An empty stream with nothing scheduled
    pub fn new(policy: SpawnPolicy) -> Self {
        Self {
            policy,
            obstacles: Vec::new(),
            timer: 0.0,
            next_delay: None,
            next_id: 1,
            spawned_total: 0,
            batches: 0,
        }
    }

    pub fn policy(&self) -> &SpawnPolicy {
        &self.policy
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn obstacles_mut(&mut self) -> &mut [Obstacle] {
        &mut self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn is_scheduled(&self) -> bool {
        self.next_delay.is_some()
    }

    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    /// Spawn batches since the last reset
    pub fn batches_spawned(&self) -> u64 {
        self.batches
    }

    /// Empty the stream and schedule a fresh first spawn
    pub fn reset(&mut self, speed: f32, rng: &mut impl Rng) {
        self.obstacles.clear();
        self.timer = 0.0;
        self.next_delay = None;
        self.spawned_total = 0;
        self.batches = 0;
        self.schedule_next_spawn(speed, rng);
    }

    /// Draw and store the delay until the next batch
    pub fn schedule_next_spawn(&mut self, speed: f32, rng: &mut impl Rng) -> f64 {
        let delay = self.policy.next_delay(speed, rng);
        self.next_delay = Some(delay);
        delay
    }

    /// Stop spawning until rescheduled
    pub fn halt(&mut self) {
        self.next_delay = None;
        self.timer = 0.0;
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    /// Drop obstacles whose `alive` flag was cleared (consumed by a hit)
    pub fn retain_alive(&mut self) -> u32 {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.alive);
        (before - self.obstacles.len()) as u32
    }

    /// Scroll, retire and spawn for one tick
    pub fn update(&mut self, dt: f32, scroll_speed: f32, rng: &mut impl Rng) -> StreamUpdate {
        let mut result = StreamUpdate::default();

        let shift = scroll_speed * dt;
        for obstacle in &mut self.obstacles {
            obstacle.pos.x -= shift;
        }

        let before = self.obstacles.len();
        let mut passed = 0u32;
        self.obstacles.retain(|o| {
            if o.is_off_screen() {
                if o.alive && o.kind == ObstacleKind::Hazard {
                    passed += 1;
                }
                false
            } else {
                true
            }
        });
        result.removed = (before - self.obstacles.len()) as u32;
        result.passed = passed;

        let Some(mut delay) = self.next_delay else {
            return result;
        };

        self.timer += f64::from(dt);
        while self.timer + SPAWN_EPSILON >= delay {
            self.timer -= delay;
            self.batches += 1;
            result.spawned += self.spawn_batch(rng);
            delay = self.schedule_next_spawn(scroll_speed, rng);
        }

        result
    }

    /// Spawn one or two obstacles at distinct lanes on the leading edge
    fn spawn_batch(&mut self, rng: &mut impl Rng) -> u32 {
        let count = if rng.random_bool(self.policy.double_spawn_chance) { 2 } else { 1 };
        let mut lanes: Vec<usize> = (0..LANE_Y.len()).collect();
        lanes.shuffle(rng);

        let mut spawned = 0;
        for &lane in lanes.iter().take(count) {
            if self.obstacles.len() >= MAX_OBSTACLES {
                log::debug!("Obstacle cap reached, skipping spawn");
                break;
            }

            let placed = if rng.random_bool(self.policy.platform_chance) {
                let max_y = SCREEN_HEIGHT / 2.0 - PLATFORM_HEIGHT;
                let y = rng.random_range(GROUND_Y + 50.0..=max_y);
                self.place(ObstacleKind::Platform, lane, Vec2::new(SCREEN_WIDTH, y))
            } else {
                self.place(ObstacleKind::Hazard, lane, Vec2::new(SCREEN_WIDTH, LANE_Y[lane]))
            };
            if placed.is_some() {
                spawned += 1;
            }
        }
        spawned
    }

    /// Add an obstacle at `pos`, sized for its kind. Returns its id, or
    /// `None` if the stream is full.
    pub fn place(&mut self, kind: ObstacleKind, lane: usize, pos: Vec2) -> Option<u32> {
        if self.obstacles.len() >= MAX_OBSTACLES {
            return None;
        }
        let size = match kind {
            ObstacleKind::Hazard => Vec2::splat(OBSTACLE_SIZE),
            ObstacleKind::Platform => Vec2::new(self.policy.platform_width, PLATFORM_HEIGHT),
        };
        let id = self.next_id;
        self.next_id += 1;
        self.spawned_total += 1;
        self.obstacles.push(Obstacle {
            id,
            kind,
            lane,
            pos,
            size,
            alive: true,
        });
        log::debug!("Spawned {:?} #{} in lane {}", kind, id, lane);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn fixed_policy(interval: f64) -> SpawnPolicy {
        SpawnPolicy {
            mode: SpawnMode::UniformJitter,
            interval_min: interval,
            interval_max: interval,
            double_spawn_chance: 0.0,
            platform_chance: 0.0,
            platform_width: 150.0,
            base_speed: 300.0,
            scale_with_speed: false,
        }
    }

    fn hazard_at(id: u32, x: f32) -> Obstacle {
        Obstacle {
            id,
            kind: ObstacleKind::Hazard,
            lane: 0,
            pos: Vec2::new(x, GROUND_Y),
            size: Vec2::splat(OBSTACLE_SIZE),
            alive: true,
        }
    }

    fn count_spawns(dt: f32, seconds: f32) -> u64 {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut stream = ObstacleStream::new(fixed_policy(1.0));
        stream.reset(300.0, &mut rng);
        let ticks = (seconds / dt).round() as usize;
        for _ in 0..ticks {
            stream.update(dt, 300.0, &mut rng);
        }
        stream.spawned_total()
    }

    #[test]
    fn test_fixed_interval_independent_of_dt() {
        assert_eq!(count_spawns(1.0 / 60.0, 10.0), 10);
        assert_eq!(count_spawns(0.1, 10.0), 10);
        assert_eq!(count_spawns(0.25, 10.0), 10);
        assert_eq!(count_spawns(0.3, 9.9), 9);
    }

    #[test]
    fn test_default_settings_spawn_one_batch_per_interval() {
        let settings = Settings {
            spawn_interval_min: 1.0,
            spawn_interval_max: 1.0,
            ..Default::default()
        }
        .normalized();
        let mut rng = Pcg32::seed_from_u64(23);
        let mut stream = ObstacleStream::new(SpawnPolicy::from_settings(&settings));
        stream.reset(settings.scroll_speed, &mut rng);

        // Scroll speed ramps the way it does during a run
        let dt = 1.0 / 60.0;
        for i in 0..1200 {
            let t = i as f32 * dt;
            let speed =
                (settings.scroll_speed + settings.speed_ramp * t).min(settings.max_scroll_speed);
            stream.update(dt, speed, &mut rng);
        }
        assert_eq!(stream.batches_spawned(), 20);
        assert!(stream.spawned_total() >= 20);
    }

    #[test]
    fn test_large_dt_spawns_every_missed_batch() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut stream = ObstacleStream::new(fixed_policy(1.0));
        stream.reset(0.0, &mut rng);
        let update = stream.update(3.5, 0.0, &mut rng);
        assert_eq!(update.spawned, 3);
        assert_eq!(stream.len(), 3);
    }

    #[test]
    fn test_uniform_jitter_bounds() {
        let mut rng = Pcg32::seed_from_u64(3);
        let policy = SpawnPolicy {
            interval_min: 1.0,
            interval_max: 3.0,
            ..fixed_policy(1.0)
        };
        for _ in 0..1000 {
            let delay = policy.next_delay(300.0, &mut rng);
            assert!((1.0..=3.0).contains(&delay), "delay {delay}");
        }
    }

    #[test]
    fn test_poisson_floor_and_mean() {
        let mut rng = Pcg32::seed_from_u64(11);
        let policy = SpawnPolicy {
            mode: SpawnMode::Poisson,
            interval_min: 0.5,
            interval_max: 1.5,
            ..fixed_policy(1.0)
        };
        let n = 5000;
        let mut total = 0.0;
        for _ in 0..n {
            let delay = policy.next_delay(300.0, &mut rng);
            assert!(delay >= 0.5);
            total += delay;
        }
        // Exponential with mean 1.0, floored at 0.5, has mean 0.5 + e^-0.5 ≈ 1.107
        let mean = total / n as f64;
        assert!((mean - 1.107).abs() < 0.08, "mean {mean}");
    }

    #[test]
    fn test_speed_scaling_shrinks_delay() {
        let mut rng = Pcg32::seed_from_u64(5);
        let policy = SpawnPolicy {
            scale_with_speed: true,
            ..fixed_policy(2.0)
        };
        assert_eq!(policy.next_delay(300.0, &mut rng), 2.0);
        assert_eq!(policy.next_delay(600.0, &mut rng), 1.0);
        // Floor still applies at extreme speeds
        assert_eq!(policy.next_delay(300_000.0, &mut rng), MIN_SPAWN_INTERVAL);
    }

    #[test]
    fn test_offscreen_hazards_are_removed_and_passed() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut stream = ObstacleStream::new(fixed_policy(1.0));
        stream.obstacles.push(hazard_at(1, -50.0));
        stream.obstacles.push(hazard_at(2, 200.0));
        stream.obstacles.push(hazard_at(3, -55.0));
        stream.obstacles.push(hazard_at(4, 400.0));

        let update = stream.update(0.1, 100.0, &mut rng);
        // -50 -> -60: trailing edge exactly at 0 is still on screen
        // -55 -> -65: gone
        assert_eq!(update.removed, 1);
        assert_eq!(update.passed, 1);
        assert_eq!(update.spawned, 0);
        let ids: Vec<u32> = stream.obstacles().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);
    }

    #[test]
    fn test_removed_obstacles_never_return() {
        let mut rng = Pcg32::seed_from_u64(21);
        let policy = SpawnPolicy {
            double_spawn_chance: 0.5,
            platform_chance: 0.3,
            ..fixed_policy(0.4)
        };
        let mut stream = ObstacleStream::new(policy);
        stream.reset(300.0, &mut rng);
        let mut retired = std::collections::HashSet::new();
        for _ in 0..2000 {
            let before: Vec<u32> = stream.obstacles().iter().map(|o| o.id).collect();
            let len_before = before.len();
            let update = stream.update(1.0 / 60.0, 300.0, &mut rng);
            let after: Vec<u32> = stream.obstacles().iter().map(|o| o.id).collect();
            assert_eq!(
                after.len(),
                len_before + update.spawned as usize - update.removed as usize
            );
            for id in &before {
                if !after.contains(id) {
                    retired.insert(*id);
                }
            }
            assert!(after.iter().all(|id| !retired.contains(id)));
            // Relative order is preserved
            assert!(after.windows(2).all(|w| w[0] < w[1]));
        }
        assert!(!retired.is_empty());
    }

    #[test]
    fn test_double_spawns_use_distinct_lanes() {
        let mut rng = Pcg32::seed_from_u64(13);
        let policy = SpawnPolicy {
            double_spawn_chance: 1.0,
            ..fixed_policy(1.0)
        };
        let mut stream = ObstacleStream::new(policy);
        stream.reset(300.0, &mut rng);
        let update = stream.update(1.0, 300.0, &mut rng);
        assert_eq!(update.spawned, 2);
        let lanes: Vec<usize> = stream.obstacles().iter().map(|o| o.lane).collect();
        assert_ne!(lanes[0], lanes[1]);
        assert!(stream.obstacles().iter().all(|o| o.pos.x == SCREEN_WIDTH));
    }

    #[test]
    fn test_halt_stops_spawning() {
        let mut rng = Pcg32::seed_from_u64(17);
        let mut stream = ObstacleStream::new(fixed_policy(1.0));
        stream.reset(300.0, &mut rng);
        stream.halt();
        assert!(!stream.is_scheduled());
        for _ in 0..600 {
            stream.update(1.0 / 60.0, 300.0, &mut rng);
        }
        assert_eq!(stream.spawned_total(), 0);
    }

    #[test]
    fn test_spawn_cap() {
        let mut rng = Pcg32::seed_from_u64(19);
        let mut stream = ObstacleStream::new(fixed_policy(MIN_SPAWN_INTERVAL));
        stream.reset(0.0, &mut rng);
        // Nothing scrolls at speed 0, so everything piles up
        for _ in 0..200 {
            stream.update(0.2, 0.0, &mut rng);
        }
        assert_eq!(stream.len(), MAX_OBSTACLES);
    }
}
