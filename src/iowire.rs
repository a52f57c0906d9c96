use embedded_hal::digital::{Error, ErrorType, InputPin, OutputPin};

/// The bus line as seen by the driver: something that can be pulled low or
/// released, and sampled.
pub trait IoWire {
    type Error: Error;

    /// Is the sense line high?
    fn is_high(&mut self) -> Result<bool, Self::Error>;

    /// Is the sense line low?
    fn is_low(&mut self) -> Result<bool, Self::Error>;

    /// Pulls the bus low
    fn set_low(&mut self) -> Result<(), Self::Error>;

    /// Releases the bus
    ///
    /// *NOTE* the line is only high if no device holds it low at the same time
    fn set_high(&mut self) -> Result<(), Self::Error>;
}

/// Single open-drain pin
impl<IO> IoWire for (IO,)
where
    IO: ErrorType + OutputPin + InputPin,
{
    type Error = IO::Error;

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_low()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_high()
    }
}

/// Two pins tied together externally: `(sense, drive)`.
///
/// The drive pin is only ever set and the sense pin only ever read.
impl<E, I, O> IoWire for (I, O)
where
    E: Error,
    I: ErrorType<Error = E> + InputPin,
    O: ErrorType<Error = E> + OutputPin,
{
    type Error = E;

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.1.set_low()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.1.set_high()
    }
}

/// Inverted wire wrapper, for boards driving the bus through a transistor
pub struct Inverted<P>(pub P);

impl<I: ErrorType> ErrorType for Inverted<I> {
    type Error = I::Error;
}

impl<I> InputPin for Inverted<I>
where
    I: InputPin,
{
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.0.is_low()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.0.is_high()
    }
}

impl<O> OutputPin for Inverted<O>
where
    O: OutputPin,
{
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_high()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_low()
    }
}
