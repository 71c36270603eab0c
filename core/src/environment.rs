//! Dive environment and the depth to ambient pressure conversion.
//!
//! The conversion accounts for the surface pressure (altitude) and the
//! salinity of the water. It is the only physical model the pressure core
//! needs, and only ever feeds ratios, so small rounding differences do not
//! matter as long as the function is monotonic in depth.

// ============================================================================
// Constants
// ============================================================================

/// Standard surface pressure at sea level (mbar).
pub const SURFACE_PRESSURE_MBAR: i32 = 1013;

/// Salinity of sea water, in grams per 10 litres.
pub const SEAWATER_SALINITY: i32 = 10300;

/// Salinity of fresh water, in grams per 10 litres.
pub const FRESHWATER_SALINITY: i32 = 10000;

/// Average depths at or shallower than this (mm) count as surface time and
/// are credited with no gas consumption.
pub const SURFACE_THRESHOLD_MM: i32 = 750;

/// Number of cylinder slots tracked per dive, diluent slot included.
pub const MAX_CYLINDERS: usize = 20;

/// Slot reserved for the CCR diluent cylinder.
pub const DILUENT_CYLINDER: usize = MAX_CYLINDERS - 1;

// ============================================================================
// Environment
// ============================================================================

/// Surface conditions of a dive.
///
/// Both fields fall back to sea-level sea water when unset.
#[derive(Clone, Debug, Default, PartialEq, uniffi::Record)]
pub struct DiveEnvironment {
    /// Surface pressure (mbar); defaults to 1013.
    pub surface_pressure_mbar: Option<i32>,
    /// Water salinity (g/10 l); defaults to 10300. Values below 500 are
    /// read as an offset on top of fresh water.
    pub salinity: Option<i32>,
}

impl DiveEnvironment {
    pub fn sea_level() -> Self {
        Self::default()
    }

    pub fn fresh_water(surface_pressure_mbar: i32) -> Self {
        Self {
            surface_pressure_mbar: Some(surface_pressure_mbar),
            salinity: Some(FRESHWATER_SALINITY),
        }
    }

    fn surface_pressure(&self) -> i32 {
        self.surface_pressure_mbar
            .filter(|p| *p > 0)
            .unwrap_or(SURFACE_PRESSURE_MBAR)
    }

    fn salinity(&self) -> i32 {
        match self.salinity {
            None | Some(0) => SEAWATER_SALINITY,
            Some(s) if s < 500 => s + FRESHWATER_SALINITY,
            Some(s) => s,
        }
    }

    /// Ambient pressure (mbar) at `depth_mm` below the surface.
    pub fn depth_to_mbar(&self, depth_mm: i32) -> i32 {
        let specific_weight = self.salinity() as f64 / 10000.0 * 0.981;
        self.surface_pressure() + (depth_mm as f64 / 10.0 * specific_weight).round() as i32
    }
}
