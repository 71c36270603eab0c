//! Gap filling for segment boundary pressures.
//!
//! Many segments carry both boundary pressures. After switching away from a
//! cylinder, or while its transmitter is silent, we may instead know only the
//! pressure at the start of a segment, followed by one or more segments with
//! nothing known, until a segment finally ends with a reading. Such a run of
//! segments gets the known pressure drop spread over it in proportion to the
//! pressure-time of each segment.

use log::debug;

use crate::track::{Segment, TrackSet};

/// Resolve every unknown boundary pressure in one cylinder's track.
///
/// Known pressures are never overwritten. Unknown boundaries between two
/// segments of a run always receive the same value on both sides. A track
/// without a single reading is left untouched.
pub fn fill_missing_segment_pressures(track: &mut [Segment]) {
    let mut previous_end: Option<i32> = None;
    let mut first = 0;

    while first < track.len() {
        let mut last = first;
        let mut pt_sum: i64 = 0;

        let end = loop {
            pt_sum += track[last].pressure_time;
            if let Some(end) = track[last].end_pressure {
                break Some(end);
            }
            match track.get(last + 1) {
                Some(next) if next.start_pressure.is_some() => break next.start_pressure,
                Some(_) => last += 1,
                None => break None,
            }
        };

        let start = track[first].start_pressure.or(previous_end).or(end);
        let end = end.or(start);

        if let (Some(start), Some(end)) = (start, end) {
            apportion(&mut track[first..=last], start, end, pt_sum);
        }

        previous_end = track[last].end_pressure;
        first = last + 1;
    }
}

/// Pressure after `pt` of the run's `pt_sum` pressure-time has been used.
fn pressure_after(start: i32, end: i32, pt: i64, pt_sum: i64) -> i32 {
    if pt_sum == 0 {
        return start;
    }
    (start as f64 - (start - end) as f64 * pt as f64 / pt_sum as f64) as i32
}

fn apportion(run: &mut [Segment], start: i32, end: i32, pt_sum: i64) {
    let last = run.len() - 1;
    let mut pt: i64 = 0;

    run[0].start_pressure.get_or_insert(start);
    for i in 0..last {
        pt += run[i].pressure_time;
        let pressure = pressure_after(start, end, pt, pt_sum);
        run[i].end_pressure = Some(pressure);
        run[i + 1].start_pressure = Some(pressure);
    }
    run[last].end_pressure = Some(end);
}

impl TrackSet {
    /// Run the gap filler on every cylinder that was used.
    pub fn fill_missing_pressures(&mut self) {
        let slots: Vec<usize> = self.used_slots().collect();
        for slot in slots {
            fill_missing_segment_pressures(self.track_mut(slot));
        }
        debug!("filled missing pressures on {} segments", self.segment_count());
    }
}
