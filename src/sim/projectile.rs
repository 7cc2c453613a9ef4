//! Shots fired at the boss

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, overlaps};
use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    /// Center
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Projectile {
    /// Fire from `origin` toward `target`. A zero-length aim shoots forward.
    pub fn aimed(origin: Vec2, target: Vec2) -> Self {
        let dir = (target - origin).try_normalize().unwrap_or(Vec2::X);
        Self {
            pos: origin,
            vel: dir * PROJECTILE_SPEED,
            size: Vec2::splat(PROJECTILE_SIZE),
        }
    }

    pub fn rect(&self) -> Rect {
        let half = self.size * 0.5;
        Rect::new(self.pos - half, self.pos + half)
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// Entirely outside the playfield
    pub fn is_off_screen(&self) -> bool {
        let screen = Rect::new(Vec2::ZERO, Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT));
        !overlaps(&self.rect(), &screen)
    }
}
