#![cfg_attr(not(test), no_std)]
#![doc = include_str!("../README.md")]

mod fmt;

#[cfg(feature = "bmp280")]
mod altitude;
#[cfg(feature = "bmp280")]
mod calibration;
mod command;
mod driver;
#[cfg(feature = "ds18b20")]
pub mod ds18b20;
mod iowire;
#[cfg(feature = "bmp280")]
mod pressure;
mod result;
#[cfg(test)]
mod sim;
mod timing;

#[cfg(feature = "bmp280")]
pub use altitude::{altitude_m, altitude_m_with_sea_level, calculate_altitude, SEA_LEVEL_HPA};
#[cfg(feature = "bmp280")]
pub use calibration::{Calibration, CalibrationError};
pub use command::{Command, OpCode};
pub use driver::Driver;
#[cfg(feature = "ds18b20")]
pub use ds18b20::{read_soil_temperature, Ds18b20, Temperature};
pub use iowire::{Inverted, IoWire};
#[cfg(feature = "bmp280")]
pub use pressure::{compensate_pressure, Pressure};
pub use result::Error;
pub use timing::{Timing, TimingError};
