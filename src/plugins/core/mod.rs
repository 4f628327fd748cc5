//! Core plugin: shared resources, the fixed tick, and the frame pipeline order.
//!
//! One `FixedUpdate` run is one logical frame. Its systems are grouped into
//! chained sets, so every step sees the mutations of the steps before it:
//!
//! ```text
//! Clock → Spawn → Act → Allocate → Advance → Cull → Index → Resolve → Reclaim → Publish
//! ```
//!
//! Everything up to `Reclaim` only runs while the session is playing.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::common::state::{sim_running, GameState, Session};
use crate::common::tunables::{Tunables, TICK_HZ};

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Advance the frame counter.
    Clock,
    /// Stage director issues new enemies.
    Spawn,
    /// Movement and firing of player, enemies and bosses.
    Act,
    /// Shot requests become pooled projectiles.
    Allocate,
    /// Projectile and item motion.
    Advance,
    /// Off-field reaping.
    Cull,
    /// Spatial index rebuild.
    Index,
    /// Collisions, pickups, deaths.
    Resolve,
    /// Pool returns and despawns.
    Reclaim,
    /// Presentation snapshot. Not gated by the pause.
    Publish,
}

/// Monotonic count of simulated frames in the current run.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameClock(pub u64);

/// Seeded randomness for everything in the simulation.
#[derive(Resource, Debug, Deref, DerefMut)]
pub struct SimRng(pub Pcg32);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(Pcg32::seed_from_u64(seed))
    }
}

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Score {
    pub total: u64,
}

impl Score {
    #[inline]
    pub fn award(&mut self, points: u32) {
        self.total += u64::from(points);
    }
}

pub fn plugin(app: &mut App) {
    let tunables = checked_tunables(app.world().get_resource::<Tunables>().cloned());

    app.insert_resource(Time::<Fixed>::from_hz(f64::from(TICK_HZ)))
        .insert_resource(ClearColor(Color::srgb(0.03, 0.03, 0.08)))
        .insert_resource(SimRng::seeded(tunables.seed))
        .insert_resource(tunables)
        .init_resource::<FrameClock>()
        .init_resource::<Score>()
        .init_resource::<Session>();

    app.configure_sets(
        FixedUpdate,
        (
            SimSet::Clock,
            SimSet::Spawn,
            SimSet::Act,
            SimSet::Allocate,
            SimSet::Advance,
            SimSet::Cull,
            SimSet::Index,
            SimSet::Resolve,
            SimSet::Reclaim,
        )
            .chain()
            .run_if(sim_running),
    );
    // Presentation keeps publishing while paused or finished so the flags stay current.
    app.configure_sets(
        FixedUpdate,
        SimSet::Publish
            .after(SimSet::Reclaim)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(FixedUpdate, advance_clock.in_set(SimSet::Clock))
        .add_systems(OnEnter(GameState::InGame), begin_run)
        .add_systems(OnEnter(GameState::Resetting), finish_reset);
}

/// Keep a pre-inserted configuration if it validates, otherwise fall back to defaults.
fn checked_tunables(provided: Option<Tunables>) -> Tunables {
    let Some(tunables) = provided else {
        return Tunables::default();
    };
    match tunables.validate() {
        Ok(()) => tunables,
        Err(err) => {
            error!("invalid tunables ({err}); using defaults");
            Tunables::default()
        }
    }
}

fn advance_clock(mut clock: ResMut<FrameClock>) {
    clock.0 += 1;
}

/// Fresh run state. Entities were already despawned on leaving `InGame`.
fn begin_run(
    tunables: Res<Tunables>,
    mut clock: ResMut<FrameClock>,
    mut score: ResMut<Score>,
    mut session: ResMut<Session>,
    mut rng: ResMut<SimRng>,
) {
    *clock = FrameClock::default();
    *score = Score::default();
    *session = Session::default();
    *rng = SimRng::seeded(tunables.seed);
    info!("run started (seed {:#x})", tunables.seed);
}

fn finish_reset(mut next: ResMut<NextState<GameState>>) {
    next.set(GameState::InGame);
}
