//! Per-frame gameplay update
//!
//! Advances one run of the Play screen by one frame in the fixed order:
//! score accrual, difficulty, lateral movement, speed ramp, enemy movement
//! and culling, world scroll, win check, spawn throttle, bullet handling,
//! collisions.

use glam::Vec2;
use rand::Rng;

use super::collision;
use super::difficulty::Tier;
use super::spawn;
use super::state::{EngineRate, EnemyState, GameEvent, GamePhase, GameState, PlaneState};
use crate::consts::*;
use crate::ms_to_ticks;

/// Held input flags for a single frame. `start` is edge-triggered by the
/// shell; everything else is level-sampled.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Forward accelerate (up)
    pub accelerate: bool,
    /// Brake (down)
    pub brake: bool,
    pub fire: bool,
    pub start: bool,
}

impl TickInput {
    fn any_directional(&self) -> bool {
        self.left || self.right || self.accelerate
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase == GamePhase::Ready {
        if input.start {
            state.phase = GamePhase::Running;
            state.counting = true;
            state.push_event(GameEvent::Started);
        }
        return;
    }
    if state.phase != GamePhase::Running {
        return;
    }

    // Post-reset freeze: the whole scene holds still, then scoring resumes
    if state.freeze_ticks > 0 {
        state.freeze_ticks -= 1;
        if state.freeze_ticks == 0 {
            state.counting = true;
        }
        return;
    }

    state.add_score(FRAME_SCORE);

    // Difficulty is re-read from the live score every frame so a boundary
    // crossing changes spawn behavior immediately
    let params = Tier::for_score(state.score).params();

    // Lateral movement; input is ignored while the explosion plays but the
    // velocity is still zeroed
    state.plane.vel = Vec2::ZERO;
    if !state.plane.is_exploding() {
        if input.left {
            state.plane.vel.x = -PLANE_LATERAL_SPEED;
        }
        if input.right {
            state.plane.vel.x = PLANE_LATERAL_SPEED;
        }
    }
    let half = PLANE_WIDTH / 2.0;
    state.plane.pos.x =
        (state.plane.pos.x + state.plane.vel.x * FRAME_DT).clamp(half, GAME_WIDTH - half);

    // Speed ramp: holding accelerate winds the key-hold counter up, releasing
    // every directional key snaps it back to zero
    let mut rate = state.engine_rate;
    if input.accelerate {
        state.key_hold += KEY_HOLD_STEP;
        rate = EngineRate::Fast;
    } else if !input.any_directional() {
        state.key_hold = 0;
        rate = EngineRate::Normal;
    }
    let mut speed = (BASE_SCROLL_SPEED + state.key_hold as f32 / 100.0)
        .clamp(BASE_SCROLL_SPEED, MAX_SCROLL_SPEED);
    if input.brake {
        speed = BRAKE_SCROLL_SPEED;
        rate = EngineRate::Slow;
    }
    if rate != state.engine_rate {
        state.engine_rate = rate;
        state.push_event(GameEvent::EngineRate(rate));
    }
    state.scroll_speed = speed;

    state.frame_counter += 1;

    // Enemy movement: horizontal per schedule, vertical with the scroll.
    // Explosion timers count down toward removal.
    let mut destroyed = Vec::new();
    for enemy in state.enemies.iter_mut() {
        match enemy.state {
            EnemyState::Exploding { ref mut ticks_left } => {
                *ticks_left = ticks_left.saturating_sub(1);
                if *ticks_left == 0 {
                    destroyed.push((enemy.id, enemy.kind));
                }
            }
            EnemyState::Alive => {
                if let Some(schedule) = state.schedules.get_mut(&enemy.id)
                    && let Some(x) = schedule.advance()
                {
                    if x != enemy.pos.x {
                        enemy.flip_x = x > enemy.pos.x;
                    }
                    enemy.pos.x = x;
                }
            }
        }
        enemy.pos.y += speed;
    }
    for (id, kind) in destroyed {
        state.remove_enemy(id);
        state.push_event(GameEvent::EnemyDestroyed { kind });
    }
    // Enemies that scroll past the bottom leave unscored
    let culled: Vec<u32> = state
        .enemies
        .iter()
        .filter(|e| e.pos.y >= ENEMY_CULL_Y)
        .map(|e| e.id)
        .collect();
    for id in culled {
        state.remove_enemy(id);
    }

    // Plane explosion completion: lose a life, then either reset-and-freeze
    // or end the run
    if let PlaneState::Exploding { ref mut ticks_left } = state.plane.state {
        *ticks_left = ticks_left.saturating_sub(1);
        if *ticks_left == 0 {
            state.counting = false;
            state.lives = state.lives.saturating_sub(1);
            state.push_event(GameEvent::LifeLost {
                remaining: state.lives,
            });
            if state.lives == 0 {
                state.phase = GamePhase::GameOver;
                state.push_event(GameEvent::Lost { score: state.score });
                return;
            }
            state.plane = super::Plane::at_start();
            state.bullet.reset_to(state.plane.pos);
            state.freeze_ticks = ms_to_ticks(RESET_FREEZE_MS);
            // The scene holds still from the reset until the delayed resume;
            // in particular no collision pass may see the reset plane
            return;
        }
    }

    // World scroll: walls, props and the finish line move together
    for wall in state.walls.iter_mut() {
        wall.y += speed;
    }
    for prop in state.props.iter_mut() {
        prop.pos.y += speed;
    }
    state.finish_y += speed;

    // Win check against the lead wall segment
    if let Some(first) = state.walls.first()
        && first.y > state.finish_threshold
    {
        state.phase = GamePhase::Won;
        state.push_event(GameEvent::Won { score: state.score });
        return;
    }

    // Spawn throttle: a freshly drawn divisor per frame; lower tiers draw
    // from a wider range, so enemies appear less often
    let divisor = state
        .rng
        .random_range(params.spawn_chance_floor..=100u32) as u64;
    if state.frame_counter % divisor == 0 {
        spawn::spawn_enemy(state, &params);
    }

    // Fire, advance the flight, and keep the bullet locked to the plane's x
    if input.fire && !state.bullet.in_flight && state.bullet.pos.y > 0.0 {
        state.bullet.fire(state.plane.pos);
        state.push_event(GameEvent::BulletFired);
    }
    state.bullet.advance(state.plane.pos);
    state.bullet.pos.x = state.plane.pos.x;

    collision::resolve(state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Enemy, EnemyKind, GameConfig};

    fn started_state() -> GameState {
        let mut state = GameState::new(21, GameConfig::default());
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
        );
        state.drain_events();
        state
    }

    #[test]
    fn test_no_update_before_start() {
        let mut state = GameState::new(21, GameConfig::default());
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.frame_counter, 0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_start_signal_begins_run() {
        let mut state = GameState::new(21, GameConfig::default());
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.counting);
        assert!(state.drain_events().contains(&GameEvent::Started));
    }

    #[test]
    fn test_score_accrues_per_frame() {
        let mut state = started_state();
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.score, 10 * FRAME_SCORE);
    }

    #[test]
    fn test_trainer_config_never_scores() {
        let mut state = GameState::new(21, GameConfig::trainer());
        tick(
            &mut state,
            &TickInput {
                start: true,
                ..Default::default()
            },
        );
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_speed_ramp_and_clamp() {
        let mut state = started_state();
        let hold = TickInput {
            accelerate: true,
            ..Default::default()
        };
        tick(&mut state, &hold);
        assert_eq!(state.scroll_speed, BASE_SCROLL_SPEED + 0.1);

        // 200 frames of accelerating pins the speed at the cap. Enemies are
        // swept out each frame so a stray collision can't freeze the scene.
        for _ in 0..200 {
            tick(&mut state, &hold);
            state.enemies.clear();
            state.schedules.clear();
        }
        assert_eq!(state.scroll_speed, MAX_SCROLL_SPEED);

        // Releasing everything resets the ramp
        tick(&mut state, &TickInput::default());
        assert_eq!(state.scroll_speed, BASE_SCROLL_SPEED);
        assert_eq!(state.key_hold, 0);
    }

    #[test]
    fn test_brake_overrides_speed() {
        let mut state = started_state();
        state.drain_events();
        tick(
            &mut state,
            &TickInput {
                brake: true,
                ..Default::default()
            },
        );
        assert_eq!(state.scroll_speed, BRAKE_SCROLL_SPEED);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::EngineRate(EngineRate::Slow))
        );
    }

    #[test]
    fn test_lateral_movement_and_bounds() {
        let mut state = started_state();
        let x0 = state.plane.pos.x;
        tick(
            &mut state,
            &TickInput {
                left: true,
                ..Default::default()
            },
        );
        assert!(state.plane.pos.x < x0);

        // Push the banks out of the way so the clamp, not a bank crash,
        // is what stops the plane
        for wall in state.walls.iter_mut() {
            wall.left_x = -2000.0;
            wall.right_x = GAME_WIDTH + 2000.0;
        }

        // Hold right long enough to hit the world bound
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..300 {
            tick(&mut state, &right);
            state.enemies.clear();
            state.schedules.clear();
        }
        assert_eq!(state.plane.pos.x, GAME_WIDTH - PLANE_WIDTH / 2.0);
    }

    #[test]
    fn test_enemy_culled_past_bottom_without_score() {
        let mut state = started_state();
        state.enemies.clear();
        state.schedules.clear();
        let id = state.next_enemy_id();
        state.enemies.push(Enemy {
            id,
            kind: EnemyKind::Battleship,
            pos: glam::Vec2::new(256.0, ENEMY_CULL_Y - 1.0),
            flip_x: false,
            state: EnemyState::Alive,
            body_enabled: true,
        });
        let before = state.score;
        tick(&mut state, &TickInput::default());
        assert!(state.enemies.iter().all(|e| e.id != id));
        assert_eq!(state.score, before + FRAME_SCORE);
    }

    #[test]
    fn test_bullet_fire_locked_while_in_flight() {
        let mut state = started_state();
        state.enemies.clear();
        state.schedules.clear();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire);
        tick(&mut state, &fire);
        let fired = state
            .drain_events()
            .iter()
            .filter(|e| **e == GameEvent::BulletFired)
            .count();
        assert_eq!(fired, 1);
        assert!(state.bullet.in_flight);
        // Horizontal lock follows the plane
        assert_eq!(state.bullet.pos.x, state.plane.pos.x);
    }

    #[test]
    fn test_win_fires_exactly_once() {
        let mut state = started_state();
        for wall in state.walls.iter_mut() {
            wall.y = state.finish_threshold;
        }
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Won);
        let won = state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Won { .. }))
            .count();
        assert_eq!(won, 1);

        // Further frames are no-ops
        let frame = state.frame_counter;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.frame_counter, frame);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_life_loss_resets_and_freezes() {
        let mut state = started_state();
        state.plane.state = PlaneState::Exploding { ticks_left: 1 };
        state.plane.pos.x = 100.0;
        tick(&mut state, &TickInput::default());

        assert_eq!(state.lives, 2);
        assert_eq!(state.plane.pos, super::super::Plane::at_start().pos);
        assert!(!state.plane.is_exploding());
        assert!(state.freeze_ticks > 0);
        assert!(!state.counting);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::LifeLost { remaining: 2 })
        );

        // The freeze suspends the whole scene, then scoring resumes
        let frame = state.frame_counter;
        let freeze = state.freeze_ticks;
        for _ in 0..freeze {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.frame_counter, frame);
        assert!(state.counting);
    }

    #[test]
    fn test_reset_frame_holds_scene_still() {
        let mut state = started_state();
        state.enemies.clear();
        state.schedules.clear();
        // An enemy parked on the reset position must not re-explode the
        // freshly reset plane on the frame the reset happens
        let id = state.next_enemy_id();
        state.enemies.push(Enemy {
            id,
            kind: EnemyKind::Helicopter,
            pos: super::super::Plane::at_start().pos,
            flip_x: false,
            state: EnemyState::Alive,
            body_enabled: true,
        });
        state.plane.state = PlaneState::Exploding { ticks_left: 1 };
        tick(&mut state, &TickInput::default());

        assert_eq!(state.lives, 2);
        assert!(state.freeze_ticks > 0);
        assert!(!state.plane.is_exploding());
    }

    #[test]
    fn test_last_life_routes_to_game_over_once() {
        let mut state = started_state();
        state.lives = 1;
        state.score = 4321;
        state.plane.state = PlaneState::Exploding { ticks_left: 1 };
        tick(&mut state, &TickInput::default());

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        // Scoring still runs during the explosion frame itself
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Lost {
            score: 4321 + FRAME_SCORE
        }));

        tick(&mut state, &TickInput::default());
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_spawn_throttle_eventually_spawns() {
        let mut state = started_state();
        // Divisors are drawn from [70, 100] at Easy; a few hundred frames
        // are plenty to hit at least one multiple
        let mut spawned = 0;
        for _ in 0..400 {
            tick(&mut state, &TickInput::default());
            spawned += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::EnemySpawned { .. }))
                .count();
            state.enemies.clear();
            state.schedules.clear();
        }
        assert!(spawned > 0);
    }
}
