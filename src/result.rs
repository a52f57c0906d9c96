use crate::TimingError;
use core::fmt::Debug;

/// Error type
#[derive(Debug)]
pub enum Error<E: Sized + Debug> {
    /// No presence on wire
    NoPresence,
    /// The requested slot timings are inconsistent
    InvalidTiming(TimingError),
    PortError(E),
}

impl<E: Sized + Debug> From<E> for Error<E> {
    fn from(e: E) -> Self {
        Error::PortError(e)
    }
}
