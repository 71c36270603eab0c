//! Pressure interpolation for samples without a reading.
//!
//! Once a segment's boundary pressures are resolved, the pressure at a sample
//! inside it follows from how much of the segment's pressure-time has been
//! used up by that sample. The per-sample pressure-time values written during
//! track construction are summed again over the segment's window, starting
//! over whenever a reading re-anchors the start pressure.

use crate::models::{GasSource, ProfileSample};
use crate::track::Segment;

/// What is needed to interpolate one sample inside one segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InterpolationContext {
    pub start: Option<i32>,
    pub end: Option<i32>,
    /// Pressure-time from the last anchor up to and including the sample.
    pub acc_pressure_time: i64,
    /// Pressure-time from the last anchor to the end of the segment.
    pub pressure_time: i64,
}

impl InterpolationContext {
    /// Collect the context for `samples[cur]`, which lies inside `segment`.
    pub fn gather(
        segment: &Segment,
        samples: &[ProfileSample],
        cur: usize,
        source: GasSource,
    ) -> Self {
        let mut ctx = Self {
            start: segment.start_pressure,
            end: segment.end_pressure,
            ..Self::default()
        };

        for (i, entry) in samples.iter().enumerate().skip(segment.first_sample) {
            let pressure = source.sensed(entry);

            if entry.t_sec < segment.t_start {
                continue;
            }
            if entry.t_sec >= segment.t_end {
                ctx.pressure_time += entry.pressure_time;
                break;
            }
            if entry.t_sec == segment.t_start {
                ctx.acc_pressure_time = 0;
                ctx.pressure_time = 0;
                if pressure.is_some() {
                    ctx.start = pressure;
                }
                continue;
            }
            if i < cur {
                if pressure.is_some() {
                    ctx.start = pressure;
                    ctx.acc_pressure_time = 0;
                    ctx.pressure_time = 0;
                } else {
                    ctx.acc_pressure_time += entry.pressure_time;
                    ctx.pressure_time += entry.pressure_time;
                }
                continue;
            }
            if i == cur {
                ctx.acc_pressure_time += entry.pressure_time;
                ctx.pressure_time += entry.pressure_time;
                continue;
            }
            ctx.pressure_time += entry.pressure_time;
            if pressure.is_some() {
                ctx.end = pressure;
                break;
            }
        }

        ctx
    }

    /// Interpolated pressure, rounded half to even.
    ///
    /// `None` when the window carries no pressure-time or either end is
    /// still unknown.
    pub fn interpolate(&self) -> Option<i32> {
        if self.pressure_time == 0 {
            return None;
        }
        let (start, end) = (self.start?, self.end?);
        let magic = (end - start) as f64 / self.pressure_time as f64;
        Some((start as f64 + magic * self.acc_pressure_time as f64).round_ties_even() as i32)
    }
}

/// The segment enclosing `t_sec`.
///
/// A sample on the boundary between two segments belongs to the one it
/// starts.
pub fn find_segment(track: &[Segment], t_sec: i32) -> Option<&Segment> {
    track.iter().rev().find(|segment| segment.contains(t_sec))
}

/// Pressure for `samples[cur]`, which has no reading of its own.
///
/// Falls back to `carried` (the last pressure known for the cylinder) when
/// there is no enclosing segment or nothing to interpolate against.
pub fn interpolate_sample(
    track: &[Segment],
    samples: &[ProfileSample],
    cur: usize,
    source: GasSource,
    carried: Option<i32>,
) -> Option<i32> {
    match find_segment(track, samples[cur].t_sec) {
        Some(segment) if segment.pressure_time != 0 => {
            InterpolationContext::gather(segment, samples, cur, source)
                .interpolate()
                .or(carried)
        }
        _ => carried,
    }
}
