use crate::environment::DILUENT_CYLINDER;

/// One point of a dive profile as seen by the pressure core.
///
/// Time is in seconds from dive start, depth in millimetres and all
/// pressures in millibar. A sensed pressure of `None` (or anything not
/// positive) means the transmitter had no reading for that sample.
#[derive(Clone, Debug, Default, PartialEq, uniffi::Record)]
pub struct ProfileSample {
    pub t_sec: i32,
    pub depth_mm: i32,
    pub cylinder_index: u32,
    pub sensor_pressure_mbar: Option<i32>,
    pub diluent_pressure_mbar: Option<i32>,
    /// Inferred main-gas pressure, written only where no reading exists.
    pub interpolated_pressure_mbar: Option<i32>,
    /// Inferred diluent pressure, written only where no reading exists.
    pub interpolated_diluent_mbar: Option<i32>,
    /// Pressure-time of the interval ending at this sample.
    pub pressure_time: i64,
}

impl ProfileSample {
    pub fn new(t_sec: i32, depth_mm: i32, cylinder_index: u32) -> Self {
        Self {
            t_sec,
            depth_mm,
            cylinder_index,
            ..Self::default()
        }
    }

    pub fn with_pressure(mut self, mbar: i32) -> Self {
        self.sensor_pressure_mbar = Some(mbar);
        self
    }

    pub fn with_diluent_pressure(mut self, mbar: i32) -> Self {
        self.diluent_pressure_mbar = Some(mbar);
        self
    }
}

/// Which gas supply a population pass works on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, uniffi::Enum)]
pub enum GasSource {
    /// The cylinder the diver is breathing from, per `cylinder_index`.
    Main,
    /// The CCR diluent cylinder, always tracked in its own slot.
    Diluent,
}

impl GasSource {
    /// Cylinder slot a sample belongs to for this source.
    pub fn slot(&self, sample: &ProfileSample) -> usize {
        match self {
            GasSource::Main => sample.cylinder_index as usize,
            GasSource::Diluent => DILUENT_CYLINDER,
        }
    }

    /// Sensed pressure, if the transmitter delivered a usable reading.
    pub fn sensed(&self, sample: &ProfileSample) -> Option<i32> {
        let raw = match self {
            GasSource::Main => sample.sensor_pressure_mbar,
            GasSource::Diluent => sample.diluent_pressure_mbar,
        };
        raw.filter(|p| *p > 0)
    }

    pub fn interpolated(&self, sample: &ProfileSample) -> Option<i32> {
        match self {
            GasSource::Main => sample.interpolated_pressure_mbar,
            GasSource::Diluent => sample.interpolated_diluent_mbar,
        }
    }

    pub(crate) fn interpolated_mut<'a>(
        &self,
        sample: &'a mut ProfileSample,
    ) -> &'a mut Option<i32> {
        match self {
            GasSource::Main => &mut sample.interpolated_pressure_mbar,
            GasSource::Diluent => &mut sample.interpolated_diluent_mbar,
        }
    }
}
