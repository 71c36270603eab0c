//! Population of cylinder pressures over a whole dive profile.
//!
//! The driver scans the profile once to build segment tracks for every
//! cylinder. If any sample lacked a reading, the tracks are gap-filled and a
//! second pass writes an interpolated pressure into every sample without a
//! reading of its own. Sensed pressures are never touched.
//!
//! # Example
//!
//! ```
//! use divelog_gas::{populate_profile, DiveEnvironment, ProfileSample};
//!
//! let mut samples = vec![
//!     ProfileSample::new(0, 20_000, 0).with_pressure(200_000),
//!     ProfileSample::new(60, 20_000, 0),
//!     ProfileSample::new(120, 20_000, 0),
//!     ProfileSample::new(180, 20_000, 0).with_pressure(140_000),
//! ];
//! populate_profile(&mut samples, &DiveEnvironment::sea_level(), false)
//!     .expect("profile is well formed");
//!
//! assert_eq!(samples[1].interpolated_pressure_mbar, Some(180_000));
//! assert_eq!(samples[2].interpolated_pressure_mbar, Some(160_000));
//! ```

use log::debug;

use crate::environment::{DiveEnvironment, MAX_CYLINDERS};
use crate::error::PressureError;
use crate::interpolate::interpolate_sample;
use crate::models::{GasSource, ProfileSample};
use crate::track::TrackSet;

/// Fill in the pressure curve of one gas source.
///
/// Writes every sample's `pressure_time`, and the source's interpolated
/// field for samples without a reading. Returns an error, leaving the
/// profile untouched, if a cylinder index is out of range or time runs
/// backwards.
pub fn populate_pressure_information(
    samples: &mut [ProfileSample],
    env: &DiveEnvironment,
    source: GasSource,
) -> Result<(), PressureError> {
    validate(samples)?;

    let mut tracks = TrackSet::build(samples, env, source);
    if !tracks.has_gaps() {
        debug!(
            "{source:?}: readings complete over {} samples, nothing to fill",
            samples.len()
        );
        return Ok(());
    }

    debug!(
        "{source:?}: filling gaps across {} segments on {} cylinders",
        tracks.segment_count(),
        tracks.used_slots().count()
    );
    tracks.fill_missing_pressures();
    tracks.dump();
    fill_missing_tank_pressures(samples, &tracks, source);

    Ok(())
}

/// Fill in the main gas and, for CCR dives, the diluent as well.
pub fn populate_profile(
    samples: &mut [ProfileSample],
    env: &DiveEnvironment,
    is_ccr: bool,
) -> Result<(), PressureError> {
    populate_pressure_information(samples, env, GasSource::Main)?;
    if is_ccr {
        populate_pressure_information(samples, env, GasSource::Diluent)?;
    }
    Ok(())
}

/// Populate pressures for a profile handed over from the app.
#[uniffi::export]
pub fn populate_pressures(
    mut samples: Vec<ProfileSample>,
    environment: DiveEnvironment,
    is_ccr: bool,
) -> Result<Vec<ProfileSample>, PressureError> {
    populate_profile(&mut samples, &environment, is_ccr)?;
    Ok(samples)
}

fn validate(samples: &[ProfileSample]) -> Result<(), PressureError> {
    for (i, sample) in samples.iter().enumerate() {
        if sample.cylinder_index as usize >= MAX_CYLINDERS {
            return Err(PressureError::CylinderOutOfRange {
                index: sample.cylinder_index,
                sample: i as u32,
                max: MAX_CYLINDERS as u32,
            });
        }
        if i > 0 && sample.t_sec < samples[i - 1].t_sec {
            return Err(PressureError::TimeWentBackwards {
                sample: i as u32,
                previous: samples[i - 1].t_sec,
                current: sample.t_sec,
            });
        }
    }
    Ok(())
}

/// Second pass: write a pressure into every sample without a reading.
fn fill_missing_tank_pressures(
    samples: &mut [ProfileSample],
    tracks: &TrackSet,
    source: GasSource,
) {
    // last known pressure per cylinder, seeded with each track's start
    let mut current: [Option<i32>; MAX_CYLINDERS] = [None; MAX_CYLINDERS];
    for slot in tracks.used_slots() {
        current[slot] = tracks.track(slot).first().and_then(|s| s.start_pressure);
    }

    let mut written = 0usize;
    for i in 0..samples.len() {
        let slot = source.slot(&samples[i]);
        if let Some(pressure) = source.sensed(&samples[i]) {
            current[slot] = Some(pressure);
            continue;
        }

        let pressure = interpolate_sample(tracks.track(slot), samples, i, source, current[slot]);
        current[slot] = pressure;
        *source.interpolated_mut(&mut samples[i]) = pressure;
        written += 1;
    }
    debug!("{source:?}: interpolated {written} samples");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::DILUENT_CYLINDER;
    use crate::fill::fill_missing_segment_pressures;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn at(t_sec: i32, depth_mm: i32, cylinder: u32, pressure: Option<i32>) -> ProfileSample {
        ProfileSample {
            sensor_pressure_mbar: pressure,
            ..ProfileSample::new(t_sec, depth_mm, cylinder)
        }
    }

    fn interpolated(samples: &[ProfileSample]) -> Vec<Option<i32>> {
        samples.iter().map(|s| s.interpolated_pressure_mbar).collect()
    }

    /// Two cylinders, surface interval, dropouts and a switch without a reading.
    fn messy_profile() -> Vec<ProfileSample> {
        vec![
            at(0, 0, 0, Some(207_000)),
            at(30, 6_000, 0, Some(206_000)),
            at(60, 18_000, 0, None),
            at(120, 32_000, 0, None),
            at(180, 41_000, 0, Some(181_000)),
            at(240, 40_000, 0, None),
            at(300, 38_000, 1, None),
            at(360, 30_000, 1, Some(196_000)),
            at(420, 24_000, 1, None),
            at(480, 21_000, 0, None),
            at(540, 15_000, 0, None),
            at(600, 9_000, 0, Some(150_000)),
            at(660, 6_000, 1, None),
            at(720, 3_000, 1, None),
            at(780, 500, 1, Some(181_000)),
            at(840, 0, 1, None),
        ]
    }

    #[test]
    fn test_scenario_constant_depth_is_linear() {
        init_logging();
        let mut samples = vec![
            at(0, 20_000, 0, Some(200_000)),
            at(60, 20_000, 0, None),
            at(120, 20_000, 0, None),
            at(180, 20_000, 0, Some(140_000)),
        ];
        populate_profile(&mut samples, &DiveEnvironment::sea_level(), false).unwrap();

        assert_eq!(
            interpolated(&samples),
            vec![None, Some(180_000), Some(160_000), None]
        );
    }

    #[test]
    fn test_scenario_drop_follows_depth() {
        init_logging();
        // deep first interval, surface afterwards
        let mut samples = vec![
            at(0, 40_000, 0, Some(200_000)),
            at(60, 0, 0, None),
            at(120, 0, 0, None),
            at(180, 0, 0, Some(140_000)),
        ];
        populate_profile(&mut samples, &DiveEnvironment::sea_level(), false).unwrap();
        assert_eq!(samples[1].interpolated_pressure_mbar, Some(140_000));
        assert_eq!(samples[2].interpolated_pressure_mbar, Some(140_000));

        // shallower intervals use less of the drop
        let mut samples = vec![
            at(0, 40_000, 0, Some(200_000)),
            at(60, 40_000, 0, None),
            at(120, 10_000, 0, None),
            at(180, 10_000, 0, Some(140_000)),
        ];
        populate_profile(&mut samples, &DiveEnvironment::sea_level(), false).unwrap();
        let p60 = samples[1].interpolated_pressure_mbar.unwrap();
        let p120 = samples[2].interpolated_pressure_mbar.unwrap();
        assert!(200_000 - p60 > p60 - p120, "{p60} {p120}");
        assert!(p60 - p120 > p120 - 140_000, "{p60} {p120}");
    }

    #[test]
    fn test_scenario_full_coverage_writes_nothing() {
        init_logging();
        let mut samples = vec![
            at(0, 10_000, 0, Some(200_000)),
            at(60, 30_000, 0, Some(190_000)),
            at(120, 30_000, 1, Some(205_000)),
            at(180, 20_000, 1, Some(195_000)),
            at(240, 5_000, 0, Some(189_000)),
        ];
        populate_profile(&mut samples, &DiveEnvironment::sea_level(), false).unwrap();

        assert!(interpolated(&samples).iter().all(Option::is_none));
        assert!(samples.iter().all(|s| s.interpolated_diluent_mbar.is_none()));
        assert!(samples[1].pressure_time > 0);
    }

    #[test]
    fn test_scenario_ccr_tracks_stay_separate() {
        init_logging();
        let mut samples = vec![
            at(0, 20_000, 0, Some(200_000)).with_diluent_pressure(190_000),
            at(60, 20_000, 0, None),
            at(120, 20_000, 0, Some(180_000)),
            at(180, 20_000, 0, Some(170_000)).with_diluent_pressure(160_000),
        ];
        populate_profile(&mut samples, &DiveEnvironment::sea_level(), true).unwrap();

        assert_eq!(
            interpolated(&samples),
            vec![None, Some(190_000), None, None]
        );
        let diluent: Vec<_> = samples.iter().map(|s| GasSource::Diluent.interpolated(s)).collect();
        assert_eq!(diluent, vec![None, Some(180_000), Some(170_000), None]);
    }

    #[test]
    fn test_diluent_only_when_ccr() {
        let mut samples = vec![
            at(0, 20_000, 0, Some(200_000)).with_diluent_pressure(190_000),
            at(60, 20_000, 0, Some(195_000)),
            at(120, 20_000, 0, Some(190_000)).with_diluent_pressure(180_000),
        ];
        populate_profile(&mut samples, &DiveEnvironment::sea_level(), false).unwrap();
        assert!(samples.iter().all(|s| s.interpolated_diluent_mbar.is_none()));

        let env = DiveEnvironment::sea_level();
        populate_pressure_information(&mut samples, &env, GasSource::Diluent).unwrap();
        assert_eq!(samples[1].interpolated_diluent_mbar, Some(185_000));
        assert!(interpolated(&samples).iter().all(Option::is_none));
    }

    #[test]
    fn test_sensed_fields_untouched() {
        let mut samples = messy_profile();
        let before = samples.clone();
        populate_profile(&mut samples, &DiveEnvironment::sea_level(), true).unwrap();

        for (a, b) in before.iter().zip(&samples) {
            assert_eq!(a.t_sec, b.t_sec);
            assert_eq!(a.depth_mm, b.depth_mm);
            assert_eq!(a.cylinder_index, b.cylinder_index);
            assert_eq!(a.sensor_pressure_mbar, b.sensor_pressure_mbar);
            assert_eq!(a.diluent_pressure_mbar, b.diluent_pressure_mbar);
        }
        // only samples without a reading get a value
        for s in &samples {
            if s.sensor_pressure_mbar.is_some() {
                assert_eq!(s.interpolated_pressure_mbar, None);
            } else {
                assert!(s.interpolated_pressure_mbar.is_some(), "t={}", s.t_sec);
            }
        }
    }

    #[test]
    fn test_no_extrapolation() {
        let mut samples = messy_profile();
        populate_profile(&mut samples, &DiveEnvironment::sea_level(), false).unwrap();

        for cylinder in 0..2 {
            let sensed: Vec<i32> = samples
                .iter()
                .filter(|s| s.cylinder_index == cylinder)
                .filter_map(|s| s.sensor_pressure_mbar)
                .collect();
            let (lo, hi) = (
                *sensed.iter().min().unwrap(),
                *sensed.iter().max().unwrap(),
            );
            for s in samples.iter().filter(|s| s.cylinder_index == cylinder) {
                if let Some(p) = s.interpolated_pressure_mbar {
                    assert!((lo..=hi).contains(&p), "cyl{cylinder} t={} p={p}", s.t_sec);
                }
            }
        }
    }

    #[test]
    fn test_repopulation_is_idempotent() {
        let env = DiveEnvironment::fresh_water(900);
        let mut once = messy_profile();
        populate_profile(&mut once, &env, true).unwrap();
        let mut twice = once.clone();
        populate_profile(&mut twice, &env, true).unwrap();
        assert_eq!(once, twice);

        let mut fresh = messy_profile();
        populate_profile(&mut fresh, &env, true).unwrap();
        assert_eq!(once, fresh);
    }

    #[test]
    fn test_filled_tracks_are_continuous() {
        let mut samples = messy_profile();
        let env = DiveEnvironment::sea_level();
        let mut tracks = TrackSet::build(&mut samples, &env, GasSource::Main);
        assert!(tracks.has_gaps());
        tracks.fill_missing_pressures();

        for slot in tracks.used_slots() {
            for pair in tracks.track(slot).windows(2) {
                assert_eq!(pair[0].end_pressure, pair[1].start_pressure, "cyl{slot}");
            }
        }
        // filling is stable once everything is known
        let mut refilled = tracks.track(0).to_vec();
        fill_missing_segment_pressures(&mut refilled);
        assert_eq!(refilled, tracks.track(0));
    }

    #[test]
    fn test_cylinder_out_of_range() {
        let mut samples = vec![
            at(0, 10_000, 0, Some(200_000)),
            at(60, 10_000, MAX_CYLINDERS as u32, None),
        ];
        let before = samples.clone();
        let err = populate_profile(&mut samples, &DiveEnvironment::sea_level(), false).unwrap_err();
        assert_eq!(
            err,
            PressureError::CylinderOutOfRange {
                index: MAX_CYLINDERS as u32,
                sample: 1,
                max: MAX_CYLINDERS as u32,
            }
        );
        assert_eq!(samples, before);
    }

    #[test]
    fn test_time_going_backwards() {
        let mut samples = vec![
            at(0, 10_000, 0, Some(200_000)),
            at(60, 10_000, 0, None),
            at(30, 10_000, 0, Some(190_000)),
        ];
        let err = populate_profile(&mut samples, &DiveEnvironment::sea_level(), false).unwrap_err();
        assert_eq!(
            err,
            PressureError::TimeWentBackwards {
                sample: 2,
                previous: 60,
                current: 30,
            }
        );
        assert!(samples.iter().all(|s| s.pressure_time == 0));
    }

    #[test]
    fn test_empty_and_single_sample() {
        let mut samples: Vec<ProfileSample> = Vec::new();
        populate_profile(&mut samples, &DiveEnvironment::sea_level(), true).unwrap();

        let mut samples = vec![at(0, 10_000, 0, None)];
        populate_profile(&mut samples, &DiveEnvironment::sea_level(), false).unwrap();
        assert_eq!(samples[0].interpolated_pressure_mbar, None);
        assert_eq!(samples[0].pressure_time, 0);
    }

    #[test]
    fn test_exported_entry_point() {
        let samples = vec![
            at(0, 20_000, 0, Some(200_000)),
            at(60, 20_000, 0, None),
            at(120, 20_000, 0, Some(190_000)),
        ];
        let out = populate_pressures(samples, DiveEnvironment::default(), false).unwrap();
        assert_eq!(out[1].interpolated_pressure_mbar, Some(195_000));
    }

    #[test]
    fn test_diluent_slot_is_reserved() {
        let mut samples = vec![
            at(0, 20_000, DILUENT_CYLINDER as u32, Some(200_000)),
            at(60, 20_000, DILUENT_CYLINDER as u32, None),
            at(120, 20_000, DILUENT_CYLINDER as u32, Some(190_000)),
        ];
        populate_profile(&mut samples, &DiveEnvironment::sea_level(), false).unwrap();
        assert_eq!(samples[1].interpolated_pressure_mbar, Some(195_000));
    }
}
