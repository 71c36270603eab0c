pub mod environment;
pub mod error;
pub mod fill;
pub mod interpolate;
pub mod models;
pub mod populate;
pub mod pressure_time;
pub mod track;

uniffi::setup_scaffolding!();

pub use environment::{
    DiveEnvironment, DILUENT_CYLINDER, MAX_CYLINDERS, SURFACE_PRESSURE_MBAR, SURFACE_THRESHOLD_MM,
};
pub use error::PressureError;
pub use interpolate::InterpolationContext;
pub use models::{GasSource, ProfileSample};
pub use populate::{populate_pressure_information, populate_pressures, populate_profile};
pub use track::{Segment, SegmentTrack, TrackSet};
