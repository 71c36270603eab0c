//! Per-cylinder segment tracks.
//!
//! A segment covers a stretch of the dive during which one cylinder was in
//! use, together with what is known about its pressure at either end and
//! the pressure-time accumulated over it. Segments are opened on a cylinder
//! switch and when a transmitter starts reporting again after a dropout.

use std::fmt;

use log::trace;

use crate::environment::{DiveEnvironment, MAX_CYLINDERS};
use crate::models::{GasSource, ProfileSample};
use crate::pressure_time::pressure_time;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment {
    /// Pressure (mbar) at `t_start`, `None` until known.
    pub start_pressure: Option<i32>,
    /// Pressure (mbar) at `t_end`, `None` until known.
    pub end_pressure: Option<i32>,
    pub t_start: i32,
    pub t_end: i32,
    /// Accumulated pressure-time (mbar·s), never negative.
    pub pressure_time: i64,
    /// Profile index of the sample that opened the segment.
    pub first_sample: usize,
}

impl Segment {
    fn open(start_pressure: Option<i32>, t_sec: i32, first_sample: usize) -> Self {
        Self {
            start_pressure,
            end_pressure: None,
            t_start: t_sec,
            t_end: t_sec,
            pressure_time: 0,
            first_sample,
        }
    }

    /// Whether `t_sec` falls within the segment, bounds included.
    pub fn contains(&self, t_sec: i32) -> bool {
        self.t_start <= t_sec && t_sec <= self.t_end
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "start {:?} end {:?} t_start {} t_end {} pt {}",
            self.start_pressure, self.end_pressure, self.t_start, self.t_end, self.pressure_time
        )
    }
}

/// Time-ordered segments of a single cylinder.
pub type SegmentTrack = Vec<Segment>;

/// One segment track per cylinder slot, as built by a forward scan.
#[derive(Clone, Debug)]
pub struct TrackSet {
    tracks: [SegmentTrack; MAX_CYLINDERS],
    has_gaps: bool,
}

impl Default for TrackSet {
    fn default() -> Self {
        Self {
            tracks: std::array::from_fn(|_| Vec::new()),
            has_gaps: false,
        }
    }
}

impl TrackSet {
    /// Scan the profile once, building the segment tracks for `source`.
    ///
    /// Writes each sample's `pressure_time` (the interval ending at it; 0 for
    /// the first sample). Cylinder indices must already be validated against
    /// [`MAX_CYLINDERS`].
    pub fn build(samples: &mut [ProfileSample], env: &DiveEnvironment, source: GasSource) -> Self {
        let mut set = TrackSet::default();
        let mut current: Option<usize> = None;

        for i in 0..samples.len() {
            let slot = source.slot(&samples[i]);
            let pressure = source.sensed(&samples[i]);
            let t_sec = samples[i].t_sec;

            samples[i].pressure_time = 0;
            if let Some(open) = current {
                let pt = pressure_time(env, &samples[i - 1], &samples[i]);
                samples[i].pressure_time = pt;
                if let Some(segment) = set.tracks[open].last_mut() {
                    segment.pressure_time += pt;
                    segment.t_end = t_sec;
                }
            }

            if current != Some(slot) {
                if pressure.is_none() {
                    set.has_gaps = true;
                }
                current = Some(slot);
                set.tracks[slot].push(Segment::open(pressure, t_sec, i));
                continue;
            }

            let Some(pressure) = pressure else {
                set.has_gaps = true;
                continue;
            };

            if let Some(segment) = set.tracks[slot].last_mut() {
                segment.end_pressure = Some(pressure);
            }

            if source.sensed(&samples[i - 1]).is_some() {
                continue;
            }

            // transmitter is back after a dropout
            set.tracks[slot].push(Segment::open(Some(pressure), t_sec, i));
        }

        set
    }

    pub fn has_gaps(&self) -> bool {
        self.has_gaps
    }

    pub fn track(&self, slot: usize) -> &[Segment] {
        &self.tracks[slot]
    }

    pub(crate) fn track_mut(&mut self, slot: usize) -> &mut SegmentTrack {
        &mut self.tracks[slot]
    }

    /// Slots with at least one segment.
    pub fn used_slots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..MAX_CYLINDERS).filter(|&slot| !self.tracks[slot].is_empty())
    }

    pub fn segment_count(&self) -> usize {
        self.tracks.iter().map(Vec::len).sum()
    }

    pub(crate) fn dump(&self) {
        for slot in self.used_slots() {
            for segment in &self.tracks[slot] {
                trace!("cyl{slot}: {segment}");
            }
        }
    }
}
