use crate::{Calibration, CalibrationError};

/// Standard atmosphere at sea level, hPa
pub const SEA_LEVEL_HPA: f64 = 1013.25;

/// Barometric altitude in metres for a compensated pressure (Pa * 256).
///
/// The pressure is reduced to whole hPa with an integer division before the
/// power is taken, so steps of roughly 8 m are expected.
pub fn altitude_m(compensated: u32) -> f64 {
    altitude_m_with_sea_level(compensated, SEA_LEVEL_HPA)
}

/// Same as [`altitude_m`] against a local sea level pressure.
pub fn altitude_m_with_sea_level(compensated: u32, sea_level_hpa: f64) -> f64 {
    let hpa = compensated / 25600;
    44330.0 * (1.0 - libm::pow(f64::from(hpa) / sea_level_hpa, 0.1903))
}

/// Compensates a raw pressure sample and converts it to whole metres.
///
/// The fraction is cut off. Altitudes below sea level, i.e. pressures above
/// [`SEA_LEVEL_HPA`], come out as 0. A vanishing divisor during compensation
/// reads as 0 hPa and yields 44330.
pub fn calculate_altitude(
    raw: i32,
    t_fine: i32,
    calibration: &[u8],
) -> Result<u32, CalibrationError> {
    let calibration = Calibration::try_from(calibration)?;
    Ok(altitude_m(calibration.compensate(raw, t_fine)) as u32)
}
