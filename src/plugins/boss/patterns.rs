//! Emission procedures.
//!
//! Every procedure is a function of the pattern timer, the boss position and
//! the pattern's scratch memory. It appends shot requests to `out` and never
//! touches the world.
//!
//! Positions follow the boss sprite: `center` is the body center and
//! `bottom()` the lower edge where most volleys leave from.

use std::f32::consts::{PI, TAU};

use bevy::prelude::*;
use rand::Rng;

use crate::common::motion::{aim, fan, from_degrees, DOWN};
use crate::plugins::projectiles::components::{ShotKind, ShotRequest};

use super::table::PatternSlot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternId {
    /// Wait between attacks. Emits nothing.
    Idle,
    WaveSpread,
    BurstRing,
    ScatterShot,
    AimedShot,
    DoubleHelix,
    RadialVortex,
    LaserSweep,
    /// Wind-up, sword sweep, then follow-through thrusts while dashing.
    Laevateinn,
    /// One burst of frozen shards released one after another.
    IcicleFall,
}

const SPECIAL_TINT: Color = Color::srgb(1.0, 0.85, 0.2);
const LASER_TINT: Color = Color::srgb(1.0, 0.2, 1.0);
const ICE_TINT: Color = Color::srgb(0.65, 0.9, 1.0);

const LAEVATEINN_WINDUP: u32 = 60;
const LAEVATEINN_SWEEP_SHARE: f32 = 0.6;
const SWORD_SEGMENTS: usize = 18;
const SWORD_SPACING: f32 = 28.0;

const ICICLE_COUNT: usize = 48;
const ICICLE_BASE_DELAY: u32 = 60;
const ICICLE_STAGGER: u32 = 4;

/// Where the boss is and who it aims at this frame.
#[derive(Debug, Clone, Copy)]
pub struct PatternContext {
    pub center: Vec2,
    pub half_extent: f32,
    pub target: Option<Vec2>,
}

impl PatternContext {
    #[inline]
    pub fn bottom(&self) -> Vec2 {
        Vec2::new(self.center.x, self.center.y + self.half_extent)
    }
}

/// Scratch state carried across frames by the patterns of one boss.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternMemory {
    pub angle: f32,
    pub vortex_angle: f32,
    /// Degrees; 90 is straight down.
    pub laser_angle: f32,
    pub laser_sweep: f32,
    /// Swing direction of the next sword sweep (+1 or -1).
    pub sword_dir: f32,
    /// Set during the sword follow-through; the boss dashes sideways.
    pub lateral_dash: Option<f32>,
    /// Charge-up highlight requested for this frame.
    pub charge_overlay: bool,
    /// Pattern timer value before which the current pattern may not end.
    pub hold_until: Option<u32>,
}

impl PatternMemory {
    pub fn new(rng: &mut impl Rng) -> Self {
        Self {
            angle: 0.0,
            vortex_angle: 0.0,
            laser_angle: 90.0,
            laser_sweep: 1.0,
            sword_dir: if rng.random_bool(0.5) { 1.0 } else { -1.0 },
            lateral_dash: None,
            charge_overlay: false,
            hold_until: None,
        }
    }

    #[inline]
    pub fn holds(&self, timer: u32) -> bool {
        self.hold_until.is_some_and(|until| timer < until)
    }

    /// Clear per-pattern flags when the boss switches patterns.
    pub fn on_transition(&mut self) {
        self.lateral_dash = None;
        self.charge_overlay = false;
        self.hold_until = None;
    }
}

/// Run one frame of `slot` at pattern timer `t`.
pub fn emit(
    slot: PatternSlot,
    t: u32,
    duration: u32,
    ctx: &PatternContext,
    mem: &mut PatternMemory,
    out: &mut Vec<ShotRequest>,
) {
    mem.charge_overlay = false;

    match slot.id {
        PatternId::Idle => {}
        PatternId::Laevateinn => laevateinn(t, duration, ctx, mem, out),
        PatternId::IcicleFall => icicle_fall(t, ctx, mem, out),
        PatternId::LaserSweep => {
            if t % slot.cadence.max(1) == 0 {
                laser_shot(ctx, mem, out);
            }
            // The beam angle sweeps every frame, not only when it fires.
            mem.laser_angle += 0.6 * mem.laser_sweep;
            if !(20.0 < mem.laser_angle && mem.laser_angle < 160.0) {
                mem.laser_sweep = -mem.laser_sweep;
            }
        }
        id => {
            if slot.echo.is_some_and(|echo| echo > 0 && t % echo == 0) {
                aimed_shot(ctx, out);
            }
            if t % slot.cadence.max(1) != 0 {
                return;
            }
            match id {
                PatternId::WaveSpread => wave_spread(ctx, mem, out),
                PatternId::BurstRing => burst_ring(ctx, out),
                PatternId::ScatterShot => scatter_shot(ctx, out),
                PatternId::AimedShot => aimed_shot(ctx, out),
                PatternId::DoubleHelix => double_helix(ctx, mem, out),
                PatternId::RadialVortex => radial_vortex(t, ctx, mem, out),
                _ => {}
            }
        }
    }
}

/// Vertical column of five shots swinging sideways.
fn wave_spread(ctx: &PatternContext, mem: &mut PatternMemory, out: &mut Vec<ShotRequest>) {
    let offset = mem.angle.sin() * 80.0;
    let base = ctx.bottom() + Vec2::new(offset, 6.0);
    for i in -2..=2 {
        let origin = base + Vec2::new(i as f32 * 20.0, 0.0);
        out.push(ShotRequest::enemy(origin, DOWN, 1.5 + i as f32 * 0.1));
    }
    mem.angle += 0.18;
}

/// Horizontal line under the boss; outer shots are faster.
fn burst_ring(ctx: &PatternContext, out: &mut Vec<ShotRequest>) {
    for i in -6i32..=6 {
        let origin = ctx.center + Vec2::new(i as f32 * 14.0, 10.0);
        out.push(ShotRequest::enemy(origin, DOWN, 1.8 + i.abs() as f32 * 0.08));
    }
}

/// Seven-way fan over 80 degrees.
fn scatter_shot(ctx: &PatternContext, out: &mut Vec<ShotRequest>) {
    for dir in fan(90.0, 80.0, 7) {
        out.push(ShotRequest::enemy(ctx.bottom(), dir, 2.8));
    }
}

fn aimed_shot(ctx: &PatternContext, out: &mut Vec<ShotRequest>) {
    let origin = ctx.bottom();
    out.push(ShotRequest::enemy(origin, aim(origin, ctx.target), 3.0));
}

/// Two interleaved sine columns whose center drifts.
fn double_helix(ctx: &PatternContext, mem: &mut PatternMemory, out: &mut Vec<ShotRequest>) {
    const AMPLITUDE: f32 = 90.0;
    let bottom = ctx.bottom();
    let center_x = bottom.x + (mem.angle * 0.5).cos() * 40.0;

    for phase in [0.0, PI] {
        let x = center_x + AMPLITUDE * (mem.angle + phase).sin();
        out.push(ShotRequest::enemy(Vec2::new(x, bottom.y), DOWN, 2.5));
    }
    mem.angle += 0.15;
}

/// Six arms turning clockwise plus six slower ones counter-clockwise.
fn radial_vortex(t: u32, ctx: &PatternContext, mem: &mut PatternMemory, out: &mut Vec<ShotRequest>) {
    const ARMS: usize = 6;

    if t % 60 == 0 {
        out.push(
            ShotRequest::enemy(ctx.center, aim(ctx.center, ctx.target), 2.5)
                .radius(16.0)
                .tint(SPECIAL_TINT),
        );
    }

    for i in 0..ARMS {
        let offset = TAU / ARMS as f32 * i as f32;
        let cw = Vec2::from_angle(mem.vortex_angle + offset);
        let ccw = Vec2::from_angle(-mem.vortex_angle + offset);
        out.push(ShotRequest::enemy(ctx.center, cw, 1.5).kind(ShotKind::Vortex));
        out.push(ShotRequest::enemy(ctx.center, ccw, 1.0).kind(ShotKind::Vortex));
    }
    mem.vortex_angle += 0.07;
}

fn laser_shot(ctx: &PatternContext, mem: &PatternMemory, out: &mut Vec<ShotRequest>) {
    out.push(
        ShotRequest::enemy(ctx.center, from_degrees(mem.laser_angle), 2.0)
            .radius(32.0)
            .laser(150.0)
            .tint(LASER_TINT),
    );
}

/// A line of shots along `dir`, growing larger and faster towards the tip.
fn sword(origin: Vec2, dir: Vec2, out: &mut Vec<ShotRequest>) {
    for i in 0..SWORD_SEGMENTS {
        let f = i as f32 / SWORD_SEGMENTS as f32;
        let tint = Color::srgb((150.0 + f * 105.0) / 255.0, 50.0 / 255.0, 20.0 / 255.0);
        out.push(
            ShotRequest::enemy(origin + dir * (i as f32 * SWORD_SPACING), dir, 2.0 + f * 3.0)
                .radius(10.0 + f * 12.0)
                .tint(tint),
        );
    }
}

fn laevateinn(
    t: u32,
    duration: u32,
    ctx: &PatternContext,
    mem: &mut PatternMemory,
    out: &mut Vec<ShotRequest>,
) {
    if t == 1 {
        // Alternate the swing side between uses.
        mem.sword_dir = -mem.sword_dir;
        mem.lateral_dash = None;
    }

    let sweep_frames = duration as f32 * LAEVATEINN_SWEEP_SHARE;

    if t < LAEVATEINN_WINDUP {
        mem.charge_overlay = t % 10 < 5;
        return;
    }

    let since = t - LAEVATEINN_WINDUP;
    if (since as f32) < sweep_frames {
        if since % 8 == 0 {
            let progress = since as f32 / sweep_frames;
            let dir = from_degrees(90.0 - 80.0 * progress * mem.sword_dir);
            sword(ctx.center, dir, out);
        }
        return;
    }

    mem.lateral_dash = Some(mem.sword_dir);
    if t % 12 == 0 {
        sword(ctx.center, DOWN, out);
    }
}

/// Two rings of shards around the boss, each frozen a little longer than the
/// last and aimed at the player's position at spawn time.
fn icicle_fall(t: u32, ctx: &PatternContext, mem: &mut PatternMemory, out: &mut Vec<ShotRequest>) {
    if t != 1 {
        return;
    }

    let per_ring = ICICLE_COUNT / 2;
    let mut last_delay = 0;

    for i in 0..ICICLE_COUNT {
        let ring = if i < per_ring { 70.0 } else { 110.0 };
        let slot = (i % per_ring) as f32;
        let angle = TAU * slot / per_ring as f32 + if i < per_ring { 0.0 } else { PI / per_ring as f32 };
        let origin = ctx.center + Vec2::from_angle(angle) * ring;
        let delay = ICICLE_BASE_DELAY + ICICLE_STAGGER * i as u32;
        last_delay = delay;

        out.push(
            ShotRequest::enemy(origin, aim(origin, ctx.target), 2.2)
                .kind(ShotKind::Ice)
                .tint(ICE_TINT)
                .frozen(delay),
        );
    }

    mem.hold_until = Some(t + last_delay + 1);
}
