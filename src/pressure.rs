use crate::{Calibration, CalibrationError};

/// Compensated pressure in pascal, Q24.8 (24 integer and 8 fractional bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pressure(u32);

impl Pressure {
    pub fn q24_8(&self) -> u32 {
        self.0
    }

    /// Whole pascal, fraction dropped
    pub fn pascals(&self) -> u32 {
        self.0 >> 8
    }

    pub fn hectopascals(&self) -> f32 {
        self.0 as f32 / 25600_f32
    }
}

impl Calibration {
    /// 64 bit fixed point compensation of a raw pressure sample.
    ///
    /// Returns Pa * 256, or 0 if the coefficients make the divisor vanish.
    /// Intermediate values wrap like the two's complement integers the
    /// formula was written for.
    pub fn compensate(&self, raw: i32, t_fine: i32) -> u32 {
        let p1 = i64::from(self.dig_p1);
        let p2 = i64::from(self.dig_p2);
        let p3 = i64::from(self.dig_p3);
        let p4 = i64::from(self.dig_p4);
        let p5 = i64::from(self.dig_p5);
        let p6 = i64::from(self.dig_p6);
        let p7 = i64::from(self.dig_p7);
        let p8 = i64::from(self.dig_p8);
        let p9 = i64::from(self.dig_p9);

        let mut var1 = i64::from(t_fine) - 128_000;
        let mut var2 = var1.wrapping_mul(var1).wrapping_mul(p6);
        var2 = var2.wrapping_add(var1.wrapping_mul(p5) << 17);
        var2 = var2.wrapping_add(p4 << 35);
        var1 = (var1.wrapping_mul(var1).wrapping_mul(p3) >> 8)
            .wrapping_add(var1.wrapping_mul(p2) << 12);
        var1 = (1_i64 << 47).wrapping_add(var1).wrapping_mul(p1) >> 33;
        if var1 == 0 {
            return 0;
        }

        // 32 bit subtraction, widened afterwards
        let mut p = i64::from(1_048_576_i32.wrapping_sub(raw));
        p = (p << 31)
            .wrapping_sub(var2)
            .wrapping_mul(3125)
            .wrapping_div(var1);
        var1 = p9.wrapping_mul(p >> 13).wrapping_mul(p >> 13) >> 25;
        var2 = p8.wrapping_mul(p) >> 19;
        p = (p.wrapping_add(var1).wrapping_add(var2) >> 8).wrapping_add(p7 << 4);
        p as u32
    }

    /// Like [`compensate`](Self::compensate), `None` instead of the 0 sentinel.
    pub fn pressure(&self, raw: i32, t_fine: i32) -> Option<Pressure> {
        match self.compensate(raw, t_fine) {
            0 => None,
            p => Some(Pressure(p)),
        }
    }
}

/// Compensates a raw pressure sample with coefficients still packed the way
/// the sensor stores them.
pub fn compensate_pressure(
    raw: i32,
    t_fine: i32,
    calibration: &[u8],
) -> Result<u32, CalibrationError> {
    let calibration = Calibration::try_from(calibration)?;
    Ok(calibration.compensate(raw, t_fine))
}
