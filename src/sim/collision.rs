//! Axis-aligned collision tests
//!
//! Everything in the runner is a rectangle. The interesting part is telling
//! a stomp (landing on top of the boss) apart from running into it: a body
//! coming down on the boss also overlaps its box, so the stomp test has to
//! run first.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{LAND_BAND, STOMP_BAND};

/// Axis-aligned rectangle given by its min and max corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Build from bottom-left position and size
    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + w, y + h),
        }
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.max.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }
}

/// True when the two rectangles share interior area.
///
/// Touching edges do not count: if either rectangle's edge lies at or beyond
/// the other's opposite edge on any axis, they are separated.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    !(a.max.x <= b.min.x || b.max.x <= a.min.x || a.max.y <= b.min.y || b.max.y <= a.min.y)
}

/// What the body can run into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    /// Ordinary obstacle, kills on contact
    Spike,
    /// Harmless ledge the body can stand on
    Platform,
    /// Kills on contact unless stomped from above
    Boss,
}

impl HazardKind {
    pub fn is_lethal(&self) -> bool {
        matches!(self, HazardKind::Spike | HazardKind::Boss)
    }

    pub fn is_stompable(&self) -> bool {
        matches!(self, HazardKind::Boss)
    }

    pub fn is_landable(&self) -> bool {
        matches!(self, HazardKind::Platform)
    }
}

/// Outcome of a body/hazard contact check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    /// No overlap, or a harmless one
    Miss,
    /// Came down on top of a stompable hazard
    Stomp,
    /// Came down on a platform; stand at `top`
    Land { top: f32 },
    /// Any other overlap with a lethal hazard
    Lethal,
}

/// Classify the contact between the body and another rectangle.
///
/// Priority order is stomp, land, lethal.
pub fn resolve_contact(body: &Rect, vel_y: f32, other: &Rect, kind: HazardKind) -> Contact {
    if !overlaps(body, other) {
        return Contact::Miss;
    }

    let descending = vel_y <= 0.0;
    let depth = other.top() - body.bottom();

    if kind.is_stompable() && descending && depth <= STOMP_BAND {
        return Contact::Stomp;
    }

    if kind.is_landable() && descending && depth <= LAND_BAND {
        return Contact::Land { top: other.top() };
    }

    if kind.is_lethal() {
        return Contact::Lethal;
    }

    Contact::Miss
}
