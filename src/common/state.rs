//! Global state machine.
//!
//! Two layers of state:
//! - `GameState` scopes entities. Every simulation entity carries
//!   `DespawnOnExit(GameState::InGame)`, so leaving `InGame` tears the run down.
//! - `Session` tracks run progress (playing, paused, over, clear) without
//!   touching entity scoping, so pausing never despawns anything.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
    /// Transit state used by a reset request: `InGame -> Resetting -> InGame`.
    Resetting,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum RunStatus {
    #[default]
    Playing,
    Paused,
    /// Player health reached zero. Terminal until a reset.
    GameOver,
    /// Final stage cleared. Terminal until a reset.
    GameClear,
}

#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct Session {
    pub status: RunStatus,
}

impl Session {
    #[inline]
    pub fn is_playing(&self) -> bool {
        self.status == RunStatus::Playing
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self.status, RunStatus::GameOver | RunStatus::GameClear)
    }

    /// Flip between playing and paused. Finished runs ignore the toggle.
    /// Returns the new paused flag.
    pub fn toggle_pause(&mut self) -> bool {
        self.status = match self.status {
            RunStatus::Playing => RunStatus::Paused,
            RunStatus::Paused => RunStatus::Playing,
            other => other,
        };
        self.status == RunStatus::Paused
    }

    /// Enter a terminal status. Only a playing run can finish.
    pub fn finish(&mut self, status: RunStatus) -> bool {
        if self.status != RunStatus::Playing {
            return false;
        }
        self.status = status;
        true
    }
}

/// Run condition for the fixed-step simulation pipeline.
pub fn sim_running(state: Option<Res<State<GameState>>>, session: Option<Res<Session>>) -> bool {
    let in_game = state.is_some_and(|s| *s.get() == GameState::InGame);
    let playing = session.is_some_and(|s| s.is_playing());
    in_game && playing
}
