/// 1-Wire slot timings, all in microseconds unless noted otherwise.
///
/// Every duration here is *nominal*: the driver subtracts
/// [`delay_overhead_us`](Timing::delay_overhead_us) before handing it to the
/// delay primitive, so the wall time spent in a phase matches the nominal
/// value even though the primitive itself takes a few microseconds to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Reset pulse, line held low. Min 480, max 960.
    pub reset_hold_us: u32,
    /// Time after release before a device starts its presence pulse. Min 15, max 60.
    pub reset_wait_us: u32,
    /// Offset into the presence pulse at which the line is sampled.
    pub presence_sample_us: u32,
    /// Whole receive part of the reset, including wait and sample offset. Min 480.
    pub reset_total_us: u32,
    /// Low pulse of a 0 slot. Longer than 60, shorter than 120.
    pub write0_hold_us: u32,
    /// Low pulse of a 1 slot. Longer than 1, much shorter than 15.
    pub write1_hold_us: u32,
    /// Width of a write slot, including the low pulse. Min 60.
    pub write_slot_us: u32,
    /// Low pulse that opens a read slot.
    pub read_hold_us: u32,
    /// When the line is sampled, counted from the start of the read slot. Max 15.
    pub read_sample_us: u32,
    /// Width of a read slot, including hold and sample offset. Min 60.
    pub read_slot_us: u32,
    /// Recovery between two slots. Min 1, folded into the slot widths.
    pub slot_recovery_us: u32,
    /// Fixed time the delay primitive costs on top of what it is asked for.
    pub delay_overhead_us: u32,
    /// Temperature conversion time in milliseconds (12 bit resolution).
    pub conversion_ms: u32,
}

/// Names the timing relation a [`Timing`] violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingError {
    /// A write-1 low pulse does not fit into the write slot
    Write1Hold,
    /// A write-0 low pulse is shorter than a write slot
    Write0Hold,
    /// The read hold or the sample point does not fit into the read slot
    ReadSample,
    /// The presence sample point lies outside the reset receive window
    PresenceSample,
    /// Slot recovery must be at least one microsecond
    SlotRecovery,
    /// A phase that has to be waited is not longer than the delay overhead
    BelowOverhead,
}

impl Timing {
    /// Standard speed timings tuned for a delay primitive with 7 us of overhead.
    pub const DEFAULT: Self = Self {
        reset_hold_us: 600,
        reset_wait_us: 60,
        presence_sample_us: 10,
        reset_total_us: 600,
        write0_hold_us: 70,
        write1_hold_us: 2,
        write_slot_us: 60,
        read_hold_us: 2,
        read_sample_us: 14,
        read_slot_us: 60,
        slot_recovery_us: 1,
        delay_overhead_us: 7,
        conversion_ms: 750,
    };

    /// Returns the delay to request from the primitive for a nominal
    /// duration, or 0 if the duration is too short to be requested at all.
    pub fn compensate(&self, nominal_us: u32) -> u32 {
        nominal_us.saturating_sub(self.delay_overhead_us)
    }

    /// Time between releasing the line after reset and sampling for presence.
    /// Saturates, so an oversized sum never fits into the reset window.
    pub fn presence_wait_us(&self) -> u32 {
        self.reset_wait_us.saturating_add(self.presence_sample_us)
    }

    pub fn validate(&self) -> Result<(), TimingError> {
        if self.write1_hold_us >= self.write_slot_us {
            return Err(TimingError::Write1Hold);
        }
        if self.write0_hold_us < self.write_slot_us {
            return Err(TimingError::Write0Hold);
        }
        if self.read_hold_us >= self.read_sample_us || self.read_sample_us >= self.read_slot_us {
            return Err(TimingError::ReadSample);
        }
        if self.presence_wait_us() >= self.reset_total_us {
            return Err(TimingError::PresenceSample);
        }
        if self.slot_recovery_us == 0
            || self.write_slot_us - self.write1_hold_us < self.slot_recovery_us
            || self.read_slot_us - self.read_sample_us < self.slot_recovery_us
        {
            return Err(TimingError::SlotRecovery);
        }

        let waited = [
            self.reset_hold_us,
            self.presence_wait_us(),
            self.reset_total_us - self.presence_wait_us(),
            self.write0_hold_us,
            self.write_slot_us - self.write1_hold_us,
            self.read_sample_us - self.read_hold_us,
            self.read_slot_us - self.read_sample_us,
        ];
        if waited.iter().any(|us| *us <= self.delay_overhead_us) {
            return Err(TimingError::BelowOverhead);
        }
        Ok(())
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::DEFAULT
    }
}
