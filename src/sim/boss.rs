//! Boss entity
//!
//! The boss glides in from the right, stops, then creeps toward the player.
//! Knocking its hit points to zero sends it fleeing off the left edge
//! (the run is cleared once it is gone); letting it reach the left edge
//! undefeated means it escaped.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;

/// Boss sub-state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    /// Sliding in from the leading edge
    Entering,
    /// In position and advancing on the player
    Fighting,
    /// Out of hit points, retreating off-screen
    Defeated,
    /// Reached the trailing edge undefeated
    Escaped,
}

/// Result of a boss update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossOutcome {
    Continue,
    /// Undefeated boss crossed the trailing edge
    Escaped,
    /// Defeated boss has fully left the screen
    Exited,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    /// Bottom-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub hp: u32,
    pub max_hp: u32,
    pub phase: BossPhase,
    /// x at which entering stops
    pub target_x: f32,
    /// Stomps are ignored until this simulation time
    pub stomp_cooldown_until: f64,
}

impl Boss {
    pub fn new(max_hp: u32) -> Self {
        Self {
            pos: Vec2::new(SCREEN_WIDTH + 10.0, GROUND_Y + BOSS_HOVER),
            size: Vec2::new(BOSS_WIDTH, BOSS_HEIGHT),
            hp: max_hp,
            max_hp,
            phase: BossPhase::Entering,
            target_x: SCREEN_WIDTH - BOSS_TARGET_INSET,
            stomp_cooldown_until: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.pos + self.size)
    }

    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    /// Can still take damage
    pub fn is_hittable(&self) -> bool {
        matches!(self.phase, BossPhase::Entering | BossPhase::Fighting) && !self.is_defeated()
    }

    pub fn can_be_stomped(&self, now: f64) -> bool {
        self.is_hittable() && now >= self.stomp_cooldown_until
    }

    /// Take one point of damage. Returns true if this hit defeated the boss.
    pub fn register_hit(&mut self) -> bool {
        if !self.is_hittable() {
            return false;
        }
        self.hp -= 1;
        if self.hp == 0 {
            self.phase = BossPhase::Defeated;
            true
        } else {
            false
        }
    }

    /// Register a stomp and open the cooldown window
    pub fn register_stomp(&mut self, now: f64) -> bool {
        self.stomp_cooldown_until = now + STOMP_COOLDOWN;
        self.register_hit()
    }

    pub fn update(&mut self, dt: f32) -> BossOutcome {
        match self.phase {
            BossPhase::Entering => {
                self.pos.x -= BOSS_ENTER_SPEED * dt;
                if self.pos.x <= self.target_x {
                    self.pos.x = self.target_x;
                    self.phase = BossPhase::Fighting;
                    log::debug!("Boss in position");
                }
                BossOutcome::Continue
            }
            BossPhase::Fighting => {
                self.pos.x -= BOSS_ADVANCE_SPEED * dt;
                if self.pos.x < 0.0 {
                    self.phase = BossPhase::Escaped;
                    return BossOutcome::Escaped;
                }
                BossOutcome::Continue
            }
            BossPhase::Defeated => {
                self.pos.x -= BOSS_EXIT_SPEED * dt;
                if self.pos.x + self.size.x < 0.0 {
                    return BossOutcome::Exited;
                }
                BossOutcome::Continue
            }
            BossPhase::Escaped => BossOutcome::Escaped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enters_then_fights() {
        let mut boss = Boss::new(5);
        assert_eq!(boss.phase, BossPhase::Entering);
        for _ in 0..600 {
            boss.update(SIM_DT);
            if boss.phase == BossPhase::Fighting {
                break;
            }
        }
        assert_eq!(boss.phase, BossPhase::Fighting);
        assert!(boss.pos.x <= boss.target_x);
    }

    #[test]
    fn test_hit_points_never_go_negative() {
        let mut boss = Boss::new(2);
        assert!(!boss.register_hit());
        assert!(boss.register_hit());
        assert_eq!(boss.hp, 0);
        assert_eq!(boss.phase, BossPhase::Defeated);
        assert!(!boss.register_hit());
        assert_eq!(boss.hp, 0);
    }

    #[test]
    fn test_stomp_cooldown() {
        let mut boss = Boss::new(5);
        assert!(boss.can_be_stomped(1.0));
        boss.register_stomp(1.0);
        assert!(!boss.can_be_stomped(1.1));
        assert!(boss.can_be_stomped(1.0 + STOMP_COOLDOWN));
        assert_eq!(boss.hp, 4);
    }

    #[test]
    fn test_undefeated_boss_escapes() {
        let mut boss = Boss::new(5);
        boss.phase = BossPhase::Fighting;
        boss.pos.x = 1.0;
        assert_eq!(boss.update(0.1), BossOutcome::Escaped);
        assert_eq!(boss.phase, BossPhase::Escaped);
    }

    #[test]
    fn test_defeated_boss_exits() {
        let mut boss = Boss::new(1);
        boss.phase = BossPhase::Fighting;
        boss.register_hit();
        let mut outcome = BossOutcome::Continue;
        for _ in 0..600 {
            outcome = boss.update(SIM_DT);
            if outcome != BossOutcome::Continue {
                break;
            }
        }
        assert_eq!(outcome, BossOutcome::Exited);
    }
}
