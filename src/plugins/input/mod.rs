//! Keyboard → `PlayerIntent`, plus the session intents (pause, reset).
//!
//! Sampling happens in `Update` at display rate. Movement, fire and slow are
//! levels and overwrite the intent every sample. Bomb, pause and reset are
//! edges and latch until consumed, so a press between two fixed frames is
//! never lost.

use bevy::prelude::*;

use crate::common::state::{GameState, Session};
use crate::plugins::player::PlayerIntent;

pub fn plugin(app: &mut App) {
    app.add_systems(Update, (gather_keyboard, apply_session_intents).chain());
}

fn axis(keys: &ButtonInput<KeyCode>, neg: [KeyCode; 2], pos: [KeyCode; 2]) -> i32 {
    i32::from(keys.any_pressed(pos)) - i32::from(keys.any_pressed(neg))
}

/// Headless apps have no keyboard resource; intents then come from whoever
/// writes `PlayerIntent` directly.
pub fn gather_keyboard(keys: Option<Res<ButtonInput<KeyCode>>>, mut intent: ResMut<PlayerIntent>) {
    let Some(keys) = keys else {
        return;
    };

    intent.axis = IVec2::new(
        axis(&keys, [KeyCode::ArrowLeft, KeyCode::KeyA], [KeyCode::ArrowRight, KeyCode::KeyD]),
        axis(&keys, [KeyCode::ArrowUp, KeyCode::KeyW], [KeyCode::ArrowDown, KeyCode::KeyS]),
    );
    intent.fire = keys.any_pressed([KeyCode::KeyZ, KeyCode::Space]);
    intent.slow = keys.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);

    intent.bomb |= keys.just_pressed(KeyCode::KeyX);
    intent.pause |= keys.any_just_pressed([KeyCode::KeyP, KeyCode::Escape]);
    intent.reset |= keys.any_just_pressed([KeyCode::KeyR, KeyCode::Enter]);
}

/// Pause toggles a live run; reset is honored only once the run has ended.
pub fn apply_session_intents(
    mut intent: ResMut<PlayerIntent>,
    mut session: ResMut<Session>,
    mut next: ResMut<NextState<GameState>>,
) {
    if std::mem::take(&mut intent.pause) && !session.is_finished() {
        let paused = session.toggle_pause();
        info!("{}", if paused { "paused" } else { "resumed" });
    }

    if std::mem::take(&mut intent.reset) && session.is_finished() {
        info!("reset requested");
        next.set(GameState::Resetting);
    }
}
