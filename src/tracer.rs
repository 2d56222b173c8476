// tracer.rs
// Re-traces every field line for the current charge configuration:
// seeds a ring of start points around each charged source, stitches
// forward/backward half-traces, extends lines that end in open space
// until they approach a neighboring charge, and flattens everything
// into one render-ready buffer.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use ultraviolet::Vec2;

use crate::charge::{Charge, ChargeId};
use crate::config::TraceConfig;
use crate::configuration::ChargeConfiguration;
use crate::integrator::{self, Direction};
use crate::profile_scope;

/// Everything a renderer needs from one full retrace.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FieldLineSet {
    /// One point sequence per surviving seed, for arrow placement
    pub polylines: Vec<Vec<Vec2>>,
    /// x,y,z triples (z = 0) of every polyline in order, with a
    /// NaN,NaN,NaN triple after each one so the renderer can draw the
    /// buffer as disjoint segments without extra metadata
    pub buffer: Vec<f32>,
}

/// Seed points evenly spaced on the seed circle around `charge`.
fn seed_ring(charge: &Charge, cfg: &TraceConfig) -> SmallVec<[Vec2; 8]> {
    let n = cfg.seeds_per_charge;
    let mut ring = SmallVec::with_capacity(n);
    for i in 0..n {
        let angle = (i as f32 / n as f32) * std::f32::consts::TAU;
        ring.push(charge.pos() + Vec2::new(angle.cos(), angle.sin()) * cfg.seed_radius);
    }
    ring
}

fn near_other_charge(
    configuration: &ChargeConfiguration,
    source: ChargeId,
    p: Vec2,
    eps: f32,
) -> bool {
    configuration
        .charges()
        .any(|(id, charge)| id != source && (charge.pos() - p).mag_sq() <= eps * eps)
}

/// Append extension batches at the trace's tail until it comes within
/// `proximity_eps` of a charge other than `source`, or the extension
/// step ceiling is spent. A truncated batch means the tail blew up near
/// a singularity; there is nothing left to extend from.
fn extend_toward_neighbor(
    configuration: &ChargeConfiguration,
    source: ChargeId,
    line: &mut Vec<Vec2>,
    cfg: &TraceConfig,
) {
    let mut remaining = cfg.extension_ceiling;
    while remaining > 0 {
        let tail = match line.last() {
            Some(&p) => p,
            None => return,
        };
        if near_other_charge(configuration, source, tail, cfg.proximity_eps) {
            return;
        }

        let batch = cfg.extension_batch.min(remaining);
        let more = integrator::trace(configuration, tail, batch, Direction::Forward, cfg);
        // an empty batch makes no progress (zero batch size, or the
        // tail blew up right away); a short one hit a singularity
        if more.is_empty() {
            return;
        }
        let truncated = more.len() < batch;
        remaining -= more.len();
        line.extend(more);
        if truncated {
            return;
        }
    }
}

/// One stitched trace: reverse(backward) + seed + forward, plus any
/// extension toward a neighboring charge.
fn trace_seed(
    configuration: &ChargeConfiguration,
    source: ChargeId,
    seed: Vec2,
    cfg: &TraceConfig,
) -> Vec<Vec2> {
    let forward = integrator::trace(configuration, seed, cfg.step_budget, Direction::Forward, cfg);
    let backward = integrator::trace(configuration, seed, cfg.step_budget, Direction::Backward, cfg);

    let mut line = Vec::with_capacity(backward.len() + forward.len() + 1);
    line.extend(backward.iter().rev().copied());
    line.push(seed);
    line.extend(forward);

    extend_toward_neighbor(configuration, source, &mut line, cfg);
    line
}

/// Trace every field line of the configuration.
///
/// Charges with zero magnitude contribute no traces; stitched traces
/// shorter than 2 points are dropped. Seeds are independent, so they
/// fan out over rayon against the shared configuration; results are
/// collected in seed order and the call returns only when every trace
/// is done, keeping the output deterministic and the call synchronous.
pub fn trace_all_field_lines(
    configuration: &ChargeConfiguration,
    cfg: &TraceConfig,
) -> FieldLineSet {
    profile_scope!("retrace");

    let mut jobs: Vec<(ChargeId, Vec2)> = Vec::new();
    for (id, charge) in configuration.charges() {
        if charge.magnitude() == 0.0 {
            continue;
        }
        jobs.extend(seed_ring(charge, cfg).into_iter().map(|seed| (id, seed)));
    }

    let polylines: Vec<Vec<Vec2>> = jobs
        .par_iter()
        .map(|&(source, seed)| trace_seed(configuration, source, seed, cfg))
        .filter(|line| line.len() >= 2)
        .collect();

    let mut buffer = Vec::with_capacity(polylines.iter().map(|line| (line.len() + 1) * 3).sum());
    for line in &polylines {
        for p in line {
            buffer.extend_from_slice(&[p.x, p.y, 0.0]);
        }
        buffer.extend_from_slice(&[f32::NAN, f32::NAN, f32::NAN]);
    }

    FieldLineSet { polylines, buffer }
}

#[cfg(test)]
#[path = "tracer/tests/stitching.rs"]
mod stitching;

#[cfg(test)]
#[path = "tracer/tests/extension.rs"]
mod extension;

#[cfg(test)]
#[path = "tracer/tests/buffer.rs"]
mod buffer;
