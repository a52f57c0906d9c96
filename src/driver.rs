use crate::{Command, Error, IoWire, OpCode, Timing};
use core::fmt::Debug;
use embedded_hal::delay::DelayNs;

/// Bit-banged 1-Wire master.
///
/// Owns the wire and the busy-wait delay for its whole lifetime, so a bus
/// transaction can never interleave with another one.
pub struct Driver<W: IoWire, D: DelayNs> {
    io_wire: W,
    delay: D,
    timing: Timing,
    bus_time_us: u32,
    last_read_us: u32,
}

impl<E: Debug, W: IoWire<Error = E>, D: DelayNs> Driver<W, D> {
    pub fn new(io_wire: W, delay: D) -> Self {
        Driver {
            io_wire,
            delay,
            timing: Timing::DEFAULT,
            bus_time_us: 0,
            last_read_us: 0,
        }
    }

    pub fn with_timing(io_wire: W, delay: D, timing: Timing) -> Result<Self, Error<E>> {
        timing.validate().map_err(Error::InvalidTiming)?;
        Ok(Driver {
            timing,
            ..Self::new(io_wire, delay)
        })
    }

    /// Gives back the wire and the delay
    pub fn release(self) -> (W, D) {
        (self.io_wire, self.delay)
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    /// Nominal duration of the last [`read_byte`](Self::read_byte), for
    /// instrumentation only.
    pub fn last_read_duration_us(&self) -> u32 {
        self.last_read_us
    }

    pub fn reset_skip_write_read(&mut self, write: &[u8], read: &mut [u8]) -> Result<(), Error<E>> {
        self.reset()?;
        self.skip()?;
        self.write_bytes(write)?;
        self.read_bytes(read)?;
        Ok(())
    }

    pub fn reset_skip_write_only(&mut self, write: &[u8]) -> Result<(), Error<E>> {
        self.reset()?;
        self.skip()?;
        self.write_bytes(write)?;
        Ok(())
    }

    pub fn skip(&mut self) -> Result<(), E> {
        self.write_command(Command::SkipRom)
    }

    /// Performs a reset and listens for a presence pulse.
    /// Returns Err(NoPresence) if no device pulled the line low.
    pub fn reset(&mut self) -> Result<(), Error<E>> {
        if self.reset_presence()? {
            Ok(())
        } else {
            warn!("1-wire: no presence pulse after reset");
            Err(Error::NoPresence)
        }
    }

    /// Performs a reset and reports whether a device answered with a
    /// presence pulse.
    pub fn reset_presence(&mut self) -> Result<bool, E> {
        let t = self.timing;
        self.set_low()?;
        self.pause(t.reset_hold_us);
        self.set_high()?;
        self.pause(t.presence_wait_us());
        let presence = self.is_low()?;
        self.pause(t.reset_total_us - t.presence_wait_us());
        Ok(presence)
    }

    /// Blocks for `ms` milliseconds, e.g. while a device converts.
    pub fn wait_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    pub fn read_bytes(&mut self, dst: &mut [u8]) -> Result<(), E> {
        for d in dst {
            *d = self.read_byte()?;
        }
        Ok(())
    }

    /// Reads 8 slots, least significant bit first.
    pub fn read_byte(&mut self) -> Result<u8, E> {
        let started = self.bus_time_us;
        let mut byte = 0_u8;
        for _ in 0..8 {
            byte >>= 1;
            if self.read_bit()? {
                byte |= 0x80;
            }
        }
        self.last_read_us = self.bus_time_us.wrapping_sub(started);
        trace!("1-wire: read {:x} in {} us", byte, self.last_read_us);
        Ok(byte)
    }

    pub fn read_bit(&mut self) -> Result<bool, E> {
        let t = self.timing;
        self.set_low()?;
        let held = self.pause(t.read_hold_us);
        self.set_high()?;
        self.pause(t.read_sample_us - held);
        let val = self.is_high();
        self.pause(t.read_slot_us - t.read_sample_us);
        val
    }

    pub fn write_command(&mut self, cmd: impl OpCode) -> Result<(), E> {
        let code = cmd.op_code();
        trace!("1-wire: command {:x}", code);
        self.write_byte(code)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), E> {
        for b in bytes {
            self.write_byte(*b)?;
        }
        Ok(())
    }

    /// Writes 8 slots, least significant bit first.
    pub fn write_byte(&mut self, byte: u8) -> Result<(), E> {
        let mut byte = byte;
        for _ in 0..8 {
            self.write_bit((byte & 0x01) == 0x01)?;
            byte >>= 1;
        }
        Ok(())
    }

    /// A 1 is a short low pulse followed by the rest of the slot, a 0 is a
    /// long low pulse. Recovery after a 0 is left to the next slot.
    pub fn write_bit(&mut self, high: bool) -> Result<(), E> {
        let t = self.timing;
        self.set_low()?;
        if high {
            self.pause(t.write1_hold_us);
            self.set_high()?;
            self.pause(t.write_slot_us - t.write1_hold_us);
        } else {
            self.pause(t.write0_hold_us);
            self.set_high()?;
        }
        Ok(())
    }

    /// Busy-waits for a nominal duration and returns how much of it was
    /// actually waited. Durations not longer than the delay overhead are
    /// skipped: toggling the pin already takes that long.
    fn pause(&mut self, nominal_us: u32) -> u32 {
        let us = self.timing.compensate(nominal_us);
        if us == 0 {
            return 0;
        }
        self.delay.delay_us(us);
        self.bus_time_us = self
            .bus_time_us
            .wrapping_add(us + self.timing.delay_overhead_us);
        nominal_us
    }

    #[inline(always)]
    pub(crate) fn set_high(&mut self) -> Result<(), E> {
        self.io_wire.set_high()
    }

    #[inline(always)]
    pub(crate) fn set_low(&mut self) -> Result<(), E> {
        self.io_wire.set_low()
    }

    #[inline(always)]
    pub(crate) fn is_high(&mut self) -> Result<bool, E> {
        self.io_wire.is_high()
    }

    #[inline(always)]
    pub(crate) fn is_low(&mut self) -> Result<bool, E> {
        self.io_wire.is_low()
    }
}
