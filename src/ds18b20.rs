use byteorder::{ByteOrder, LittleEndian};
use embedded_hal::delay::DelayNs;

use crate::{Driver, Error, IoWire, OpCode};
use core::fmt::Debug;

#[derive(Clone, Copy, Debug)]
#[repr(u8)]
pub enum Command {
    Convert = 0x44,
    ReadScratchpad = 0xBE,
}

impl OpCode for Command {
    fn op_code(&self) -> u8 {
        *self as _
    }
}

/// Temperature as read from the scratchpad, 1/16 degree per LSB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Temperature {
    raw: i16,
}

impl Temperature {
    pub fn from_raw(raw: i16) -> Self {
        Temperature { raw }
    }

    pub fn from_scratchpad(scratchpad: &[u8; 2]) -> Self {
        Self::from_raw(LittleEndian::read_i16(scratchpad))
    }

    pub fn raw(&self) -> i16 {
        self.raw
    }

    /// Hundredths of a degree, truncated toward zero.
    ///
    /// Raw values beyond the sensor range wrap on the way back to 16 bits.
    pub fn centi_celsius(&self) -> i16 {
        (i32::from(self.raw) * 100 / 16) as i16
    }

    pub fn celsius(&self) -> f32 {
        f32::from(self.raw) / 16_f32
    }

    /// Splits into integer degrees and a fraction in 1/10000 degree.
    /// The value is `integer + fraction / 10000`, both parts carry the sign.
    pub fn split(&self) -> (i16, i16) {
        if self.raw >= 0 {
            (self.raw >> 4, (self.raw & 0xF) * 625)
        } else {
            let abs = self.raw.wrapping_neg();
            (-(abs >> 4), -625 * (abs & 0xF))
        }
    }
}

/// A single DS18B20 on the bus, addressed with skip ROM.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ds18b20;

impl Ds18b20 {
    /// Starts a conversion and returns how many milliseconds it takes.
    pub fn start_conversion<E: Debug, W: IoWire<Error = E>, D: DelayNs>(
        &self,
        driver: &mut Driver<W, D>,
    ) -> Result<u32, Error<E>> {
        driver.reset_skip_write_only(&[Command::Convert.op_code()])?;
        Ok(driver.timing().conversion_ms)
    }

    /// Reads the temperature of the last conversion.
    pub fn read_scratchpad<E: Debug, W: IoWire<Error = E>, D: DelayNs>(
        &self,
        driver: &mut Driver<W, D>,
    ) -> Result<Temperature, Error<E>> {
        let mut scratchpad = [0u8; 2];
        driver.reset_skip_write_read(&[Command::ReadScratchpad.op_code()], &mut scratchpad)?;
        Ok(Temperature::from_scratchpad(&scratchpad))
    }

    /// Converts, blocks for the whole conversion time and reads the result.
    pub fn measure<E: Debug, W: IoWire<Error = E>, D: DelayNs>(
        &self,
        driver: &mut Driver<W, D>,
    ) -> Result<Temperature, Error<E>> {
        let wait_ms = self.start_conversion(driver)?;
        driver.wait_ms(wait_ms);
        let temperature = self.read_scratchpad(driver)?;
        debug!("ds18b20: raw temperature {}", temperature.raw());
        Ok(temperature)
    }
}

/// Reads the soil probe in hundredths of a degree Celsius.
///
/// Fails with [`Error::NoPresence`] before any command is sent if the probe
/// does not answer a reset.
pub fn read_soil_temperature<E: Debug, W: IoWire<Error = E>, D: DelayNs>(
    driver: &mut Driver<W, D>,
) -> Result<i16, Error<E>> {
    Ds18b20.measure(driver).map(|t| t.centi_celsius())
}
