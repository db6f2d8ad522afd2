//! Game state and core simulation types
//!
//! One `GameState` lives for one run of the Play screen. All mutation goes
//! through `tick` and the collision handlers; reactions the host shell must
//! perform (sounds, one-shot animations) surface as `GameEvent`s.

use std::collections::HashMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{lerp, ms_to_ticks};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the start signal; the update loop is a no-op
    Ready,
    /// Active gameplay
    Running,
    /// Run ended at the finish line
    Won,
    /// Run ended with no lives left
    GameOver,
}

/// Engine sound playback rate, derived from the scroll speed inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EngineRate {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl EngineRate {
    /// Playback-rate multiplier for the looping engine sound
    pub fn rate(self) -> f32 {
        match self {
            EngineRate::Slow => 0.5,
            EngineRate::Normal => 1.0,
            EngineRate::Fast => 1.5,
        }
    }
}

/// Player plane state - input is suppressed while the explosion plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneState {
    Flying,
    Exploding { ticks_left: u32 },
}

/// The player's plane
#[derive(Debug, Clone)]
pub struct Plane {
    /// Sprite center; y stays fixed near the bottom of the screen
    pub pos: Vec2,
    pub vel: Vec2,
    pub state: PlaneState,
}

impl Plane {
    pub fn at_start() -> Self {
        Self {
            pos: Vec2::new(GAME_WIDTH / 2.0, GAME_HEIGHT - PLANE_HEIGHT),
            vel: Vec2::ZERO,
            state: PlaneState::Flying,
        }
    }

    pub fn is_exploding(&self) -> bool {
        matches!(self.state, PlaneState::Exploding { .. })
    }

    /// Animation key for the current frame, given the held directional inputs
    pub fn anim_key(&self, left: bool, right: bool) -> &'static str {
        if self.is_exploding() {
            "plane-explode"
        } else if left {
            "plane-move-left"
        } else if right {
            "plane-move-right"
        } else {
            "plane-move-forward"
        }
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Battleship,
    Helicopter,
    Airplane,
}

impl EnemyKind {
    pub fn sprite_key(self) -> &'static str {
        match self {
            EnemyKind::Battleship => "battleship",
            EnemyKind::Helicopter => "helicopter",
            EnemyKind::Airplane => "airplane",
        }
    }

    pub fn explode_anim(self) -> &'static str {
        match self {
            EnemyKind::Battleship => "battleship-explode",
            EnemyKind::Helicopter => "helicopter-explode",
            EnemyKind::Airplane => "airplane-explode",
        }
    }

    /// Sprite size (collision body)
    pub fn size(self) -> Vec2 {
        match self {
            EnemyKind::Battleship => Vec2::new(128.0, 32.0),
            EnemyKind::Helicopter => Vec2::new(64.0, 40.0),
            EnemyKind::Airplane => Vec2::new(64.0, 25.0),
        }
    }

    /// One-shot explosion animation length in simulation frames
    pub fn explode_ticks(self) -> u32 {
        match self {
            EnemyKind::Battleship => ms_to_ticks(BATTLESHIP_EXPLODE_MS),
            EnemyKind::Helicopter => ms_to_ticks(HELICOPTER_EXPLODE_MS),
            EnemyKind::Airplane => ms_to_ticks(AIRPLANE_EXPLODE_MS),
        }
    }

    /// Airplanes spawn off-screen and traverse once instead of oscillating
    pub fn is_airborne(self) -> bool {
        matches!(self, EnemyKind::Airplane)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    Alive,
    Exploding { ticks_left: u32 },
}

/// An enemy actor
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    /// Sprite faces right when spawned on the right lane
    pub flip_x: bool,
    pub state: EnemyState,
    /// Cleared the instant the enemy is hit; the sole guard against an enemy
    /// being scored by both the bullet and the plane in the same frame
    pub body_enabled: bool,
}

impl Enemy {
    pub fn is_exploding(&self) -> bool {
        matches!(self.state, EnemyState::Exploding { .. })
    }
}

/// The plane's single bullet
#[derive(Debug, Clone)]
pub struct Bullet {
    pub pos: Vec2,
    /// Firing is locked out while the upward flight is running
    pub in_flight: bool,
    from_y: f32,
    ticks_left: u32,
}

impl Bullet {
    pub fn at(pos: Vec2) -> Self {
        Self {
            pos,
            in_flight: false,
            from_y: pos.y,
            ticks_left: 0,
        }
    }

    /// Start the upward flight from the plane's position
    pub fn fire(&mut self, plane_pos: Vec2) {
        self.in_flight = true;
        self.pos = plane_pos;
        self.from_y = plane_pos.y;
        self.ticks_left = ms_to_ticks(BULLET_FLIGHT_MS);
    }

    /// Advance the flight one frame; resets to the plane when it completes
    pub fn advance(&mut self, plane_pos: Vec2) {
        if !self.in_flight {
            return;
        }
        self.ticks_left = self.ticks_left.saturating_sub(1);
        let total = ms_to_ticks(BULLET_FLIGHT_MS);
        let t = 1.0 - self.ticks_left as f32 / total as f32;
        self.pos.y = lerp(self.from_y, -BULLET_HEIGHT, t);
        if self.ticks_left == 0 {
            self.reset_to(plane_pos);
        }
    }

    /// Force-complete the flight (bullet hit something)
    pub fn reset_to(&mut self, plane_pos: Vec2) {
        self.in_flight = false;
        self.pos = plane_pos;
        self.from_y = plane_pos.y;
        self.ticks_left = 0;
    }
}

/// A timed horizontal traversal assigned to an enemy at spawn
///
/// Ground/sea kinds oscillate (yoyo, repeating) between their lane and the
/// mirrored lane; airplanes traverse once and keep their final position.
#[derive(Debug, Clone)]
pub struct MoveSchedule {
    pub from_x: f32,
    pub to_x: f32,
    pub duration_ticks: u32,
    pub delay_ticks: u32,
    pub elapsed_ticks: u32,
    pub yoyo: bool,
    pub repeat: bool,
}

impl MoveSchedule {
    /// Advance one frame. Returns the new x, or `None` while the start delay
    /// has not elapsed or the one-shot traversal has finished.
    pub fn advance(&mut self) -> Option<f32> {
        self.elapsed_ticks += 1;
        if self.elapsed_ticks <= self.delay_ticks {
            return None;
        }
        if self.duration_ticks == 0 {
            return Some(self.to_x);
        }
        let active = self.elapsed_ticks - self.delay_ticks;
        if self.yoyo && self.repeat {
            // Triangle wave over a 2x-duration period
            let phase = active % (2 * self.duration_ticks);
            let (back, t) = if phase < self.duration_ticks {
                (false, phase)
            } else {
                (true, phase - self.duration_ticks)
            };
            let frac = t as f32 / self.duration_ticks as f32;
            Some(if back {
                lerp(self.to_x, self.from_x, frac)
            } else {
                lerp(self.from_x, self.to_x, frac)
            })
        } else {
            if active > self.duration_ticks {
                return None;
            }
            let frac = active as f32 / self.duration_ticks as f32;
            Some(lerp(self.from_x, self.to_x, frac))
        }
    }
}

/// A 256px river wall tile pair (left and right bank) at one scroll row
#[derive(Debug, Clone, Copy)]
pub struct WallSegment {
    pub y: f32,
    /// Tile centers
    pub left_x: f32,
    pub right_x: f32,
}

/// Decorative shore prop; no collision body
#[derive(Debug, Clone, Copy)]
pub struct Prop {
    pub pos: Vec2,
    pub flip_x: bool,
}

/// Reactions the host shell translates into sounds and animations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    Started,
    BulletFired,
    ExplosionSound,
    EnemySpawned { kind: EnemyKind },
    /// Restart the continuous fly animation across all live helicopters
    HelicoptersFly,
    EnemyDestroyed { kind: EnemyKind },
    PlaneExploding,
    LifeLost { remaining: u8 },
    EngineRate(EngineRate),
    Won { score: u32 },
    Lost { score: u32 },
}

/// Run configuration - collapses the historical scene variants into one
/// parameterized state machine
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub enemy_kinds: Vec<EnemyKind>,
    pub starting_lives: u8,
    pub wall_count: u32,
    pub scoring_enabled: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            enemy_kinds: vec![
                EnemyKind::Battleship,
                EnemyKind::Helicopter,
                EnemyKind::Airplane,
            ],
            starting_lives: 3,
            wall_count: 300,
            scoring_enabled: true,
        }
    }
}

impl GameConfig {
    /// The early short-river variant: two enemy kinds, no scoring
    pub fn trainer() -> Self {
        Self {
            enemy_kinds: vec![EnemyKind::Battleship, EnemyKind::Helicopter],
            wall_count: 30,
            scoring_enabled: false,
            ..Self::default()
        }
    }
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub plane: Plane,
    pub bullet: Bullet,
    pub enemies: Vec<Enemy>,
    /// Active movement schedule per live enemy id, removed atomically with
    /// the enemy
    pub schedules: HashMap<u32, MoveSchedule>,
    pub walls: Vec<WallSegment>,
    pub props: Vec<Prop>,
    /// Finish-line (bridge) y position, scrolled with the walls
    pub finish_y: f32,
    /// Lead wall segment y beyond which the run is won
    pub finish_threshold: f32,
    pub score: u32,
    pub lives: u8,
    /// Score accrual gate; off between a life loss and the post-reset resume
    pub counting: bool,
    pub frame_counter: u64,
    pub key_hold: u32,
    /// Scroll speed computed by the last frame (px/frame)
    pub scroll_speed: f32,
    /// Remaining frames of the post-reset scene freeze
    pub freeze_ticks: u32,
    pub engine_rate: EngineRate,
    /// Drained by the shell once per rendered frame
    pub events: Vec<GameEvent>,
    next_enemy_id: u32,
}

impl GameState {
    /// Create a fresh run from a seed and configuration. The world (walls,
    /// props, finish line) is generated up front; one enemy is spawned
    /// immediately, matching the scene setup of the original game.
    pub fn new(seed: u64, config: GameConfig) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut walls = Vec::with_capacity(config.wall_count as usize);
        let mut props = Vec::new();
        for i in 0..config.wall_count {
            let y = GAME_HEIGHT - i as f32 * WALL_TILE;
            let left_x = rng.random_range(-100.0..=100.0f32);
            let right_x = GAME_WIDTH - rng.random_range(-100.0..=WALL_TILE / 2.0);
            walls.push(WallSegment { y, left_x, right_x });

            // Shore props only where the bank reaches far enough inland
            if left_x >= 80.0 {
                props.push(Prop {
                    pos: Vec2::new(
                        rng.random_range(left_x..left_x + WALL_TILE / 2.0),
                        rng.random_range(y..y + 157.0),
                    ),
                    flip_x: false,
                });
            }
            if right_x < GAME_WIDTH - 80.0 {
                props.push(Prop {
                    pos: Vec2::new(
                        rng.random_range(right_x..right_x + WALL_TILE / 2.0),
                        rng.random_range(y..y + 157.0),
                    ),
                    flip_x: true,
                });
            }
        }

        let finish_threshold =
            config.wall_count as f32 * WALL_TILE + FINISH_MARGIN + GAME_HEIGHT / 2.0;
        let finish_y = GAME_HEIGHT - (config.wall_count - 1) as f32 * WALL_TILE - WALL_TILE / 2.0;

        let plane = Plane::at_start();
        let bullet = Bullet::at(plane.pos);
        let lives = config.starting_lives;

        let mut state = Self {
            config,
            seed,
            rng,
            phase: GamePhase::Ready,
            plane,
            bullet,
            enemies: Vec::new(),
            schedules: HashMap::new(),
            walls,
            props,
            finish_y,
            finish_threshold,
            score: 0,
            lives,
            counting: false,
            frame_counter: 0,
            key_hold: 0,
            scroll_speed: BASE_SCROLL_SPEED,
            freeze_ticks: 0,
            engine_rate: EngineRate::Normal,
            events: Vec::new(),
            next_enemy_id: 1,
        };

        let params = super::Tier::for_score(0).params();
        super::spawn::spawn_enemy(&mut state, &params);

        state
    }

    /// Allocate the next enemy id. Ids are unique for the whole run, so no
    /// two simultaneously-alive enemies can ever share one.
    pub fn next_enemy_id(&mut self) -> u32 {
        let id = self.next_enemy_id;
        self.next_enemy_id += 1;
        id
    }

    /// Remove an enemy and its movement schedule in one step
    pub fn remove_enemy(&mut self, id: u32) {
        self.enemies.retain(|e| e.id != id);
        self.schedules.remove(&id);
    }

    /// Award score if accrual is currently enabled
    pub fn add_score(&mut self, amount: u32) {
        if self.counting && self.config.scoring_enabled {
            self.score += amount;
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand the buffered events to the shell
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
