//! Per-frame render snapshot
//!
//! The embedding page owns the asset pipeline and the actual drawing; this
//! module only names sprite and animation identifiers it expects the page to
//! resolve, mirroring the scene graph the simulation maintains.

use serde::Serialize;

use crate::consts::*;
use crate::sim::{EnemyKind, GamePhase, GameState, TickInput, Tier};

/// One sprite to draw this frame
#[derive(Debug, Clone, Serialize)]
pub struct SpriteView {
    /// Asset identifier (texture / spritesheet key)
    pub key: &'static str,
    pub x: f32,
    pub y: f32,
    pub flip_x: bool,
    /// Animation to be playing, if any
    pub anim: Option<&'static str>,
}

/// HUD numbers
#[derive(Debug, Clone, Serialize)]
pub struct HudView {
    pub score: u32,
    pub lives: u8,
    pub high_score: u32,
    pub tier: &'static str,
}

/// Everything the page needs to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameView {
    pub phase: &'static str,
    pub sprites: Vec<SpriteView>,
    pub hud: HudView,
}

fn on_screen(y: f32, margin: f32) -> bool {
    y > -margin && y < GAME_HEIGHT + margin
}

/// Build the snapshot for the current frame. Off-screen world tiles are
/// skipped; the page never needs more than a couple of scroll rows.
pub fn frame_view(state: &GameState, input: &TickInput, high_score: u32) -> FrameView {
    let mut sprites = Vec::new();

    for wall in &state.walls {
        if !on_screen(wall.y, WALL_TILE) {
            continue;
        }
        sprites.push(SpriteView {
            key: "walls",
            x: wall.left_x,
            y: wall.y,
            flip_x: false,
            anim: None,
        });
        sprites.push(SpriteView {
            key: "walls",
            x: wall.right_x,
            y: wall.y,
            flip_x: true,
            anim: None,
        });
    }

    for prop in &state.props {
        if !on_screen(prop.pos.y, WALL_TILE) {
            continue;
        }
        sprites.push(SpriteView {
            key: "prop",
            x: prop.pos.x,
            y: prop.pos.y,
            flip_x: prop.flip_x,
            anim: None,
        });
    }

    if on_screen(state.finish_y, WALL_TILE) {
        sprites.push(SpriteView {
            key: "bridge",
            x: GAME_WIDTH / 2.0,
            y: state.finish_y,
            flip_x: false,
            anim: None,
        });
    }

    for enemy in &state.enemies {
        let anim = if enemy.is_exploding() {
            Some(enemy.kind.explode_anim())
        } else if enemy.kind == EnemyKind::Helicopter {
            Some("helicopter-fly")
        } else {
            None
        };
        sprites.push(SpriteView {
            key: enemy.kind.sprite_key(),
            x: enemy.pos.x,
            y: enemy.pos.y,
            flip_x: enemy.flip_x,
            anim,
        });
    }

    if state.bullet.in_flight {
        sprites.push(SpriteView {
            key: "bullet",
            x: state.bullet.pos.x,
            y: state.bullet.pos.y,
            flip_x: false,
            anim: None,
        });
    }

    sprites.push(SpriteView {
        key: "plane",
        x: state.plane.pos.x,
        y: state.plane.pos.y,
        flip_x: false,
        anim: Some(state.plane.anim_key(input.left, input.right)),
    });

    FrameView {
        phase: match state.phase {
            GamePhase::Ready => "ready",
            GamePhase::Running => "running",
            GamePhase::Won => "won",
            GamePhase::GameOver => "game-over",
        },
        sprites,
        hud: HudView {
            score: state.score,
            lives: state.lives,
            high_score,
            tier: Tier::for_score(state.score).as_str(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameConfig;

    #[test]
    fn test_frame_view_names_expected_assets() {
        let state = GameState::new(4, GameConfig::default());
        let view = frame_view(&state, &TickInput::default(), 500);

        assert_eq!(view.phase, "ready");
        assert_eq!(view.hud.high_score, 500);
        assert_eq!(view.hud.tier, "easy");
        // The plane is always drawn, on top
        assert_eq!(view.sprites.last().unwrap().key, "plane");
        // Only a handful of the 300 wall rows are in view
        let wall_sprites = view.sprites.iter().filter(|s| s.key == "walls").count();
        assert!(wall_sprites > 0 && wall_sprites < 20);
    }

    #[test]
    fn test_bullet_drawn_only_in_flight() {
        let mut state = GameState::new(4, GameConfig::default());
        let view = frame_view(&state, &TickInput::default(), 0);
        assert!(view.sprites.iter().all(|s| s.key != "bullet"));

        state.bullet.fire(state.plane.pos);
        let view = frame_view(&state, &TickInput::default(), 0);
        assert!(view.sprites.iter().any(|s| s.key == "bullet"));
    }

    #[test]
    fn test_exploding_enemy_uses_explode_anim() {
        let mut state = GameState::new(4, GameConfig::default());
        let id = state.enemies[0].id;
        crate::sim::collision::bullet_hits_enemy(&mut state, id);

        let view = frame_view(&state, &TickInput::default(), 0);
        let enemy = view
            .sprites
            .iter()
            .find(|s| s.anim.is_some_and(|a| a.ends_with("-explode")))
            .expect("exploding enemy sprite");
        assert!(enemy.key == "battleship" || enemy.key == "helicopter" || enemy.key == "airplane");
    }
}
