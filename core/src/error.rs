use thiserror::Error;

/// Error type for malformed profile input.
///
/// Both variants indicate a defect in whatever built the profile. They are
/// reported before any sample is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq, uniffi::Error)]
pub enum PressureError {
    #[error("cylinder index {index} at sample {sample} exceeds the {max} supported cylinders")]
    CylinderOutOfRange { index: u32, sample: u32, max: u32 },

    #[error("time went backwards at sample {sample}: {previous}s -> {current}s")]
    TimeWentBackwards {
        sample: u32,
        previous: i32,
        current: i32,
    },
}
