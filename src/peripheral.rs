//! DMA support for hardware peripherals.
//!
//! A peripheral that can receive DMA data implements [`Destination`]. A
//! descriptor built from a destination writes every element to the same
//! data register, paced by the peripheral's data request signal.

use crate::ral;

/// A peripheral that can be the destination for DMA data
///
/// By 'destination,' we mean that it receives data from a DMA transfer.
/// A destination would be a peripheral that could send data out of
/// processor memory, like a UART transmitter.
///
/// # Safety
///
/// `Destination` should only be implemented on peripherals that are
/// DMA capable. The register returned by `destination_address` must accept
/// byte writes for the lifetime of the program.
pub unsafe trait Destination {
    /// Peripheral destination request signal
    ///
    /// This is the data request (DREQ) number that paces the transfer. See
    /// section 2.5.3.1 of the RP2040 datasheet.
    fn destination_signal(&self) -> u32;
    /// Returns a pointer to the register into which the DMA channel
    /// writes data
    ///
    /// This memory is assumed to be static. Repeated calls should always
    /// return the same address.
    fn destination_address(&self) -> *const u8;
}

/// The transmit side of a PL011 UART
///
/// The UART must already be initialized, with its TX DMA enable set, by
/// the board's bring-up code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UartTx {
    base: usize,
    dreq: u32,
}

impl UartTx {
    /// UART0's transmitter
    pub const fn uart0() -> Self {
        UartTx {
            base: ral::UART0_BASE,
            dreq: ral::dreq::UART0_TX,
        }
    }
    /// UART1's transmitter
    pub const fn uart1() -> Self {
        UartTx {
            base: ral::UART1_BASE,
            dreq: ral::dreq::UART1_TX,
        }
    }
}

/// Safety: the PL011 data register (UARTDR, offset 0) accepts byte writes,
/// and the UART's TX DREQ signals free FIFO space.
unsafe impl Destination for UartTx {
    fn destination_signal(&self) -> u32 {
        self.dreq
    }
    fn destination_address(&self) -> *const u8 {
        self.base as *const u8
    }
}

#[cfg(test)]
mod tests {
    use super::{Destination, UartTx};

    #[test]
    fn uart_data_registers() {
        let uart0 = UartTx::uart0();
        assert_eq!(uart0.destination_address() as usize, 0x4003_4000);
        assert_eq!(uart0.destination_signal(), 20);

        let uart1 = UartTx::uart1();
        assert_eq!(uart1.destination_address() as usize, 0x4003_8000);
        assert_eq!(uart1.destination_signal(), 22);
    }
}
