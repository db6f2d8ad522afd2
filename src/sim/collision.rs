//! Collision detection and explosion handling
//!
//! AABB overlap tests over the plane, bullet, enemy and wall bodies, and the
//! two collision entry points (bullet-hits-enemy, plane-hits-enemy) plus the
//! wall crash. Each entry point is idempotent: `body_enabled` is cleared the
//! moment an enemy is struck, so the same enemy can never be processed - or
//! scored - twice, even when both paths would fire in one frame.

use glam::Vec2;

use super::state::{EnemyState, GameEvent, GameState, PlaneState};
use crate::consts::*;
use crate::ms_to_ticks;

/// Center/size AABB overlap test
pub fn overlaps(pos_a: Vec2, size_a: Vec2, pos_b: Vec2, size_b: Vec2) -> bool {
    (pos_a.x - pos_b.x).abs() * 2.0 < size_a.x + size_b.x
        && (pos_a.y - pos_b.y).abs() * 2.0 < size_a.y + size_b.y
}

/// Put an enemy into its one-shot explosion: cancel the movement schedule,
/// turn off the collision body, start the timer. Returns false if the enemy
/// is unknown or already exploding.
fn start_enemy_explosion(state: &mut GameState, id: u32) -> bool {
    state.schedules.remove(&id);
    let Some(enemy) = state.enemies.iter_mut().find(|e| e.id == id) else {
        return false;
    };
    if enemy.is_exploding() {
        return false;
    }
    enemy.state = EnemyState::Exploding {
        ticks_left: enemy.kind.explode_ticks(),
    };
    enemy.body_enabled = false;
    true
}

/// Bullet struck an enemy
pub fn bullet_hits_enemy(state: &mut GameState, id: u32) {
    // Force-complete the flight so the next shot is available immediately
    state.bullet.reset_to(state.plane.pos);

    if start_enemy_explosion(state, id) {
        state.push_event(GameEvent::ExplosionSound);
        state.add_score(KILL_SCORE);
    }
}

/// Plane collided with an enemy: the enemy explodes (once) and the plane
/// starts its own explosion unless one is already playing
pub fn plane_hits_enemy(state: &mut GameState, id: u32) {
    // The schedule is still cancelled by the guard path, but an enemy whose
    // explosion already started is not re-processed and the plane is spared.
    if !start_enemy_explosion(state, id) {
        return;
    }
    state.add_score(KILL_SCORE);
    explode_plane(state);
}

/// Plane ran into a river wall
pub fn plane_crash(state: &mut GameState) {
    explode_plane(state);
}

fn explode_plane(state: &mut GameState) {
    if state.plane.is_exploding() {
        return;
    }
    state.plane.state = PlaneState::Exploding {
        ticks_left: ms_to_ticks(PLANE_EXPLODE_MS),
    };
    state.push_event(GameEvent::PlaneExploding);
    state.push_event(GameEvent::ExplosionSound);
}

/// Run all overlap checks for the frame. Bullet hits resolve before plane
/// hits so a bullet kill in the same physics step wins the enemy.
pub fn resolve(state: &mut GameState) {
    let bullet_size = Vec2::new(BULLET_WIDTH, BULLET_HEIGHT);
    let plane_size = Vec2::new(PLANE_WIDTH, PLANE_HEIGHT);
    let wall_size = Vec2::new(WALL_TILE, WALL_TILE);

    if state.bullet.in_flight {
        let hit = state
            .enemies
            .iter()
            .find(|e| {
                e.body_enabled && overlaps(state.bullet.pos, bullet_size, e.pos, e.kind.size())
            })
            .map(|e| e.id);
        if let Some(id) = hit {
            bullet_hits_enemy(state, id);
        }
    }

    let plane_pos = state.plane.pos;
    let struck: Vec<u32> = state
        .enemies
        .iter()
        .filter(|e| e.body_enabled && overlaps(plane_pos, plane_size, e.pos, e.kind.size()))
        .map(|e| e.id)
        .collect();
    for id in struck {
        plane_hits_enemy(state, id);
    }

    let crashed = state.walls.iter().any(|w| {
        overlaps(plane_pos, plane_size, Vec2::new(w.left_x, w.y), wall_size)
            || overlaps(plane_pos, plane_size, Vec2::new(w.right_x, w.y), wall_size)
    });
    if crashed {
        plane_crash(state);
    }
}
