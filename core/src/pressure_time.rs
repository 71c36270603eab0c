//! Pressure-time integration between profile samples.
//!
//! Pressure-time is ambient pressure multiplied by elapsed time. Gas
//! consumption at a constant breathing rate is proportional to it, which
//! makes it a good weight for spreading an unknown pressure drop over a
//! stretch of the dive. The units cancel out wherever it is used.

use crate::environment::{DiveEnvironment, SURFACE_THRESHOLD_MM};
use crate::models::ProfileSample;

/// Pressure-time (mbar·s) of the interval from `a` to `b`.
///
/// Intervals whose average depth is at the surface contribute nothing.
/// `b` must not be earlier than `a`.
pub fn pressure_time(env: &DiveEnvironment, a: &ProfileSample, b: &ProfileSample) -> i64 {
    debug_assert!(b.t_sec >= a.t_sec, "samples out of order");
    let time = (b.t_sec - a.t_sec) as i64;
    let depth = (a.depth_mm + b.depth_mm) / 2;

    if depth <= SURFACE_THRESHOLD_MM {
        return 0;
    }

    env.depth_to_mbar(depth) as i64 * time
}
