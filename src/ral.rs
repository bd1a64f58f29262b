//! RP2040 DMA register access layer
//!
//! Only the registers that the chained-transfer controller touches are
//! described. Layout follows section 2.5.7 of the RP2040 datasheet.

#![allow(non_snake_case, non_upper_case_globals)]

pub(crate) use ral_registers::{read_reg, write_reg};

/// Base address of the DMA controller registers
pub const DMA_BASE: usize = 0x5000_0000;
/// Base address of the UART0 registers
pub const UART0_BASE: usize = 0x4003_4000;
/// Base address of the UART1 registers
pub const UART1_BASE: usize = 0x4003_8000;

/// Number of DMA channels on the RP2040
pub const CHANNEL_COUNT: usize = 12;

/// Data request signals, written to `CTRL_TRIG.TREQ_SEL`
pub mod dreq {
    pub const UART0_TX: u32 = 20;
    pub const UART0_RX: u32 = 21;
    pub const UART1_TX: u32 = 22;
    pub const UART1_RX: u32 = 23;
    /// Unpaced; the channel runs as fast as the bus allows
    pub const PERMANENT: u32 = 0x3F;
}

/// A pointer to a static register block
///
/// Dereferences to the block. The pointer must be valid for the lifetime
/// of the program, which `Dma::new` requires of its caller.
pub(crate) struct Static<T>(pub(crate) *const T);

impl<T> core::ops::Deref for Static<T> {
    type Target = T;
    fn deref(&self) -> &T {
        // Safety: pointer points to static memory (peripheral memory)
        unsafe { &*self.0 }
    }
}

impl<T> Clone for Static<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Static<T> {}

macro_rules! field {
    ($name:ident, $offset:expr, $width:expr) => {
        pub mod $name {
            pub const offset: u32 = $offset;
            pub const mask: u32 = ((1u32 << $width) - 1) << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {}
        }
    };
}

pub mod dma {
    use ral_registers::RWRegister;

    /// The DMA controller's register block
    #[repr(C)]
    pub struct RegisterBlock {
        /// Per-channel registers, 0x40 bytes apart
        pub CH: [super::ch::RegisterBlock; super::CHANNEL_COUNT],
        _reserved0: [u32; 64],
        /// Raw interrupt status
        pub INTR: RWRegister<u32>,
        /// Interrupt enables for DMA_IRQ_0
        pub INTE0: RWRegister<u32>,
        /// Force interrupts on DMA_IRQ_0
        pub INTF0: RWRegister<u32>,
        /// Interrupt status for DMA_IRQ_0; write 1 to clear
        pub INTS0: RWRegister<u32>,
        _reserved1: u32,
        /// Interrupt enables for DMA_IRQ_1
        pub INTE1: RWRegister<u32>,
        /// Force interrupts on DMA_IRQ_1
        pub INTF1: RWRegister<u32>,
        /// Interrupt status for DMA_IRQ_1; write 1 to clear
        pub INTS1: RWRegister<u32>,
        _reserved2: [u32; 9],
        /// Abort in-progress transfers; bits read back as set until done
        pub CHAN_ABORT: RWRegister<u32>,
    }
}

pub mod ch {
    use ral_registers::RWRegister;

    /// One channel's registers
    #[repr(C)]
    pub struct RegisterBlock {
        pub READ_ADDR: RWRegister<u32>,
        pub WRITE_ADDR: RWRegister<u32>,
        pub TRANS_COUNT: RWRegister<u32>,
        /// Control and status; writing it starts the channel when `EN` is set
        pub CTRL_TRIG: RWRegister<u32>,
        _aliases: [u32; 12],
    }

    pub mod CTRL_TRIG {
        field!(EN, 0, 1);
        field!(HIGH_PRIORITY, 1, 1);
        field!(DATA_SIZE, 2, 2);
        field!(INCR_READ, 4, 1);
        field!(INCR_WRITE, 5, 1);
        field!(RING_SIZE, 6, 4);
        field!(RING_SEL, 10, 1);
        field!(CHAIN_TO, 11, 4);
        field!(TREQ_SEL, 15, 6);
        field!(IRQ_QUIET, 21, 1);
        field!(BSWAP, 22, 1);
        field!(SNIFF_EN, 23, 1);
        field!(BUSY, 24, 1);
        field!(WRITE_ERROR, 29, 1);
        field!(READ_ERROR, 30, 1);
        field!(AHB_ERROR, 31, 1);
    }
}

/// Transfer element sizes for `CTRL_TRIG.DATA_SIZE`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum DataSize {
    Byte = 0,
    HalfWord = 1,
    Word = 2,
}
