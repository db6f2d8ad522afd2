//! Deterministic gameplay simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-frame stepping only
//! - Seeded RNG only
//! - Stable iteration order (entities pushed with monotonically increasing ids)
//! - No rendering or platform dependencies; side effects surface as `GameEvent`s

pub mod collision;
pub mod difficulty;
pub mod spawn;
pub mod state;
pub mod tick;

pub use difficulty::{Tier, TierParams};
pub use state::{
    Bullet, Enemy, EnemyKind, EnemyState, EngineRate, GameConfig, GameEvent, GamePhase, GameState,
    MoveSchedule, Plane, PlaneState, WallSegment,
};
pub use tick::{TickInput, tick};
