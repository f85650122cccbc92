//! Serial link abstraction
//!
//! The panel is attached to a UART. The controller runs inside a strictly
//! single-threaded cooperative loop, so reads are non-blocking and any
//! waiting happens through [`SerialLink::relax`].

/// Byte stream to and from the panel
pub trait SerialLink {
    /// Number of received bytes that can be read without waiting
    fn available(&self) -> usize;

    /// Read one byte if one is buffered
    ///
    /// Never blocks. Returns `None` when the receive buffer is empty.
    fn read_byte(&mut self) -> Option<u8>;

    /// Queue bytes for transmission
    ///
    /// Blocks until all data has been handed to the transmitter.
    fn write(&mut self, data: &[u8]);

    /// Called while spinning on a partially received frame
    ///
    /// Hosts with a cooperative scheduler yield here. The default does
    /// nothing, which turns the wait into a plain bounded spin.
    fn relax(&mut self) {}
}

impl<T: SerialLink + ?Sized> SerialLink for &mut T {
    fn available(&self) -> usize {
        (**self).available()
    }

    fn read_byte(&mut self) -> Option<u8> {
        (**self).read_byte()
    }

    fn write(&mut self, data: &[u8]) {
        (**self).write(data)
    }

    fn relax(&mut self) {
        (**self).relax()
    }
}

