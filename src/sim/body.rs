//! The player's body: a single box under constant gravity

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;

/// Player-controlled body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Bottom-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity (pixels/s, positive is up)
    pub vel_y: f32,
    pub grounded: bool,
    pub hp: u32,
    /// Simulation time until which hits are ignored
    pub invuln_until: f64,
    /// Lowest y the body may reach
    pub ground: f32,
}

impl Body {
    /// A body standing on the ground at the start position
    pub fn new(hp: u32) -> Self {
        Self {
            pos: Vec2::new(BODY_X, GROUND_Y),
            size: Vec2::splat(BODY_SIZE),
            vel_y: 0.0,
            grounded: true,
            hp,
            invuln_until: 0.0,
            ground: GROUND_Y,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.pos + self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Apply gravity for one step and move, clamping to ground and ceiling
    pub fn apply_gravity_and_integrate(&mut self, dt: f32, gravity: f32) {
        self.vel_y -= gravity * dt;
        self.pos.y += self.vel_y * dt;

        if self.pos.y < self.ground {
            self.pos.y = self.ground;
            self.vel_y = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
        }

        let ceiling = SCREEN_HEIGHT - self.size.y;
        if self.pos.y > ceiling {
            self.pos.y = ceiling;
            self.vel_y = self.vel_y.min(0.0);
        }
    }

    /// Start a jump. Ignored while airborne.
    pub fn jump(&mut self, initial_velocity: f32) -> bool {
        if !self.grounded {
            return false;
        }
        self.vel_y = initial_velocity;
        self.grounded = false;
        true
    }

    /// Lose one hit point unless invulnerable or already down.
    ///
    /// Returns true when the hit landed.
    pub fn take_hit(&mut self, now: f64, invuln_duration: f64) -> bool {
        if self.is_invulnerable(now) || self.hp == 0 {
            return false;
        }
        self.hp -= 1;
        self.invuln_until = now + invuln_duration;
        true
    }

    pub fn is_invulnerable(&self, now: f64) -> bool {
        now < self.invuln_until
    }

    /// Stand on top of a platform
    pub fn land_on(&mut self, top: f32) {
        self.pos.y = top.max(self.ground);
        self.vel_y = 0.0;
        self.grounded = true;
    }

    /// Upward kick that ignores the grounded check (stomps, boss launch)
    pub fn bounce(&mut self, velocity: f32) {
        self.vel_y = velocity;
        self.grounded = false;
    }
}
