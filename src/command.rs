pub trait OpCode {
    fn op_code(&self) -> u8;
}

/// ROM commands. Only one device is expected on the bus, so it is always
/// addressed with `SkipRom`.
#[derive(Clone, Copy, Debug)]
#[repr(u8)]
pub enum Command {
    SkipRom = 0xCC,
}

impl OpCode for Command {
    fn op_code(&self) -> u8 {
        *self as _
    }
}
