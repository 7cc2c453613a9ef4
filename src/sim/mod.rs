//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies; the host reacts to events

pub mod body;
pub mod boss;
pub mod collision;
pub mod obstacle;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod timer;

pub use body::Body;
pub use boss::{Boss, BossOutcome, BossPhase};
pub use collision::{Contact, HazardKind, Rect, overlaps, resolve_contact};
pub use obstacle::{Obstacle, ObstacleKind, ObstacleStream, SpawnPolicy, StreamUpdate};
pub use projectile::Projectile;
pub use state::{GameEvent, GamePhase, GameState, Screen, SoundCue};
pub use tick::{TickInput, tick, transition};
pub use timer::{TimedAction, Timer, TimerQueue};
