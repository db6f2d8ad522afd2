//! Enemy spawner
//!
//! Creates one enemy with randomized lane, vertical jitter and movement
//! schedule, and registers the schedule in the id-keyed registry.

use glam::Vec2;
use rand::Rng;

use super::difficulty::TierParams;
use super::state::{Enemy, EnemyKind, EnemyState, GameEvent, GameState, MoveSchedule};
use crate::consts::*;
use crate::ms_to_ticks;

/// Spawn lane x positions for a kind: in-bounds for ground/sea kinds,
/// just outside the viewport for airplanes
fn lanes(kind: EnemyKind) -> (f32, f32) {
    if kind.is_airborne() {
        (-AIR_LANE_OFFSET, GAME_WIDTH + AIR_LANE_OFFSET)
    } else {
        (GROUND_LANE_INSET, GAME_WIDTH - GROUND_LANE_INSET)
    }
}

/// Create a new enemy under the current tier parameters and append it to the
/// live set
pub fn spawn_enemy(state: &mut GameState, params: &TierParams) {
    let kind_idx = state.rng.random_range(0..state.config.enemy_kinds.len());
    let kind = state.config.enemy_kinds[kind_idx];
    let on_right = state.rng.random_bool(0.5);

    let (left, right) = lanes(kind);
    let (lane_x, mirror_x) = if on_right { (right, left) } else { (left, right) };

    let mut y = state.rng.random_range(0..=params.max_y_jitter) as f32;
    if kind.is_airborne() {
        // Second independent draw from the same bound, airplanes only.
        // Redundant-looking but kept: the original rolled twice here.
        y = state.rng.random_range(0..=params.max_y_jitter) as f32;
    }

    let duration_ms = state
        .rng
        .random_range(params.min_move_ms..=params.max_move_ms);
    let delay_ms = if kind.is_airborne() {
        state.rng.random_range(0..=AIRPLANE_MAX_DELAY_MS)
    } else {
        state.rng.random_range(0..=params.max_start_delay_ms)
    };

    let id = state.next_enemy_id();
    state.schedules.insert(
        id,
        MoveSchedule {
            from_x: lane_x,
            to_x: mirror_x,
            duration_ticks: ms_to_ticks(duration_ms),
            delay_ticks: ms_to_ticks(delay_ms),
            elapsed_ticks: 0,
            yoyo: !kind.is_airborne(),
            repeat: !kind.is_airborne(),
        },
    );

    state.enemies.push(Enemy {
        id,
        kind,
        pos: Vec2::new(lane_x, y),
        flip_x: on_right,
        state: EnemyState::Alive,
        body_enabled: true,
    });

    state.push_event(GameEvent::EnemySpawned { kind });
    if kind == EnemyKind::Helicopter {
        state.push_event(GameEvent::HelicoptersFly);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Tier;
    use crate::sim::state::GameConfig;

    fn config_with(kinds: Vec<EnemyKind>) -> GameConfig {
        GameConfig {
            enemy_kinds: kinds,
            ..GameConfig::default()
        }
    }

    #[test]
    fn test_ids_unique_among_live_enemies() {
        let mut state = GameState::new(11, GameConfig::default());
        let params = Tier::Easy.params();
        for _ in 0..50 {
            spawn_enemy(&mut state, &params);
        }
        let mut ids: Vec<u32> = state.enemies.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), state.enemies.len());
    }

    #[test]
    fn test_ground_kind_oscillates_between_lanes() {
        let mut state = GameState::new(3, config_with(vec![EnemyKind::Battleship]));
        let params = Tier::Easy.params();
        spawn_enemy(&mut state, &params);
        let enemy = state.enemies.last().unwrap();
        assert!(enemy.pos.x == GROUND_LANE_INSET || enemy.pos.x == GAME_WIDTH - GROUND_LANE_INSET);

        let schedule = &state.schedules[&enemy.id];
        assert!(schedule.yoyo && schedule.repeat);
        assert_eq!(schedule.from_x + schedule.to_x, GAME_WIDTH);
        assert!(schedule.duration_ticks >= ms_to_ticks(params.min_move_ms));
        assert!(schedule.duration_ticks <= ms_to_ticks(params.max_move_ms));
        assert!(schedule.delay_ticks <= ms_to_ticks(params.max_start_delay_ms));
    }

    #[test]
    fn test_airplane_traverses_once_from_off_screen() {
        let mut state = GameState::new(3, config_with(vec![EnemyKind::Airplane]));
        let params = Tier::Easy.params();
        spawn_enemy(&mut state, &params);
        let enemy = state.enemies.last().unwrap();
        assert!(enemy.pos.x < 0.0 || enemy.pos.x > GAME_WIDTH);

        let schedule = &state.schedules[&enemy.id];
        assert!(!schedule.yoyo && !schedule.repeat);
        assert!(schedule.delay_ticks <= ms_to_ticks(AIRPLANE_MAX_DELAY_MS));
    }

    #[test]
    fn test_alien_tier_pins_spawn_to_top() {
        let mut state = GameState::new(9, config_with(vec![EnemyKind::Battleship]));
        // Drop the scene-setup spawn, which rolled easy-tier jitter
        state.enemies.clear();
        state.schedules.clear();
        let params = Tier::Alien.params();
        for _ in 0..10 {
            spawn_enemy(&mut state, &params);
        }
        assert!(state.enemies.iter().all(|e| e.pos.y == 0.0));
    }

    #[test]
    fn test_helicopter_spawn_restarts_fly_animation() {
        let mut state = GameState::new(5, config_with(vec![EnemyKind::Helicopter]));
        state.drain_events();
        let params = Tier::Easy.params();
        spawn_enemy(&mut state, &params);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::HelicoptersFly));
    }

    #[test]
    fn test_airplane_y_uses_second_roll() {
        // Airplanes roll their vertical jitter twice and keep the second
        // draw. Replay the spawner's draw sequence on a cloned RNG and check
        // the spawned y matches the second roll, not the first.
        let params = Tier::Easy.params();
        for seed in 0..20 {
            let mut state = GameState::new(seed, config_with(vec![EnemyKind::Airplane]));
            let mut replay = state.rng.clone();
            spawn_enemy(&mut state, &params);

            let _kind: usize = replay.random_range(0..1);
            let _side = replay.random_bool(0.5);
            let first: u32 = replay.random_range(0..=params.max_y_jitter);
            let second: u32 = replay.random_range(0..=params.max_y_jitter);
            if first == second {
                continue;
            }
            let enemy = state.enemies.last().unwrap();
            assert_eq!(enemy.pos.y, second as f32);
            return;
        }
        panic!("no seed produced distinct jitter rolls");
    }
}
