//! DMA controller and channels

use crate::{
    descriptor::TransferDescriptor,
    engine::{CompletionFlag, TransferEngine},
    ral::{self, ch, dma, DataSize, Static, CHANNEL_COUNT},
    Error, Result,
};
use core::sync::atomic::{self, Ordering};

/// The NVIC line for `DMA_IRQ_0`
///
/// Completion interrupts for every channel are routed here through `INTE0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DmaIrq0;

// Safety: DMA_IRQ_0 is interrupt 11 on the RP2040.
unsafe impl cortex_m::interrupt::InterruptNumber for DmaIrq0 {
    fn number(self) -> u16 {
        11
    }
}

/// The DMA controller
///
/// Hands out channels. Each channel is claimed at most once until it's
/// returned with [`unclaim`](Dma::unclaim).
pub struct Dma {
    registers: Static<dma::RegisterBlock>,
    claimed: u16,
}

impl Dma {
    /// Create the controller from its register block
    ///
    /// On hardware, `registers` is [`DMA_BASE`](crate::ral::DMA_BASE).
    ///
    /// # Safety
    ///
    /// `registers` must point at the DMA register block for the life of
    /// the program, and there must only be one `Dma` for that block.
    pub const unsafe fn new(registers: *const ()) -> Self {
        Dma {
            registers: Static(registers.cast()),
            claimed: 0,
        }
    }

    /// Claim the lowest-numbered channel that isn't claimed
    ///
    /// Returns [`Error::NoFreeChannel`] when every channel is in use.
    pub fn claim_unused_channel(&mut self) -> Result<Channel> {
        let index = (0..CHANNEL_COUNT)
            .find(|index| self.claimed & (1 << index) == 0)
            .ok_or(Error::NoFreeChannel)?;
        self.claimed |= 1 << index;
        log::debug!("claimed DMA channel {}", index);
        Ok(Channel {
            index,
            registers: self.registers,
        })
    }

    /// Return a channel to the pool
    ///
    /// The channel's completion interrupt is disabled.
    pub fn unclaim(&mut self, mut channel: Channel) {
        channel.set_interrupt_on_completion(false);
        self.claimed &= !(1 << channel.index);
    }

    /// Unmask `DMA_IRQ_0` in the NVIC
    ///
    /// # Safety
    ///
    /// The `DMA_IRQ_0` handler must be registered, and everything it touches
    /// must be initialized, before calling. Unmasking may break critical
    /// sections that rely on the interrupt being masked.
    pub unsafe fn unmask_completion_interrupt(&self) {
        cortex_m::peripheral::NVIC::unmask(DmaIrq0);
    }
}

/// A DMA channel
///
/// Obtain channels from [`Dma::claim_unused_channel`]. A channel runs one
/// byte-wide transfer at a time, and raises its completion flag on
/// `DMA_IRQ_0` when done.
pub struct Channel {
    /// Our channel number, expected to be between 0 to (CHANNEL_COUNT - 1)
    index: usize,
    /// Reference to the DMA registers
    registers: Static<dma::RegisterBlock>,
}

impl Channel {
    /// Returns the DMA channel number
    pub fn channel(&self) -> usize {
        self.index
    }

    /// Returns a handle to this channel's registers
    fn ch(&self) -> &ch::RegisterBlock {
        &self.registers.CH[self.index]
    }

    /// Set the first address the channel reads
    pub fn set_read_address(&mut self, addr: *const u8) {
        let ch = self.ch();
        ral::write_reg!(crate::ral::ch, ch, READ_ADDR, addr as u32);
    }

    /// Set the first address the channel writes
    pub fn set_write_address(&mut self, addr: *const u8) {
        let ch = self.ch();
        ral::write_reg!(crate::ral::ch, ch, WRITE_ADDR, addr as u32);
    }

    /// Set the number of elements to transfer
    pub fn set_transfer_count(&mut self, count: u32) {
        let ch = self.ch();
        ral::write_reg!(crate::ral::ch, ch, TRANS_COUNT, count);
    }

    /// Enable or disable the completion interrupt on `DMA_IRQ_0`
    ///
    /// You're responsible for registering the interrupt handler.
    pub fn set_interrupt_on_completion(&mut self, intr: bool) {
        let inte = self.registers.INTE0.read();
        let bit = 1 << self.index;
        self.registers
            .INTE0
            .write(if intr { inte | bit } else { inte & !bit });
    }

    /// Indicates if the channel is moving data, or waiting to
    pub fn is_busy(&self) -> bool {
        let ch = self.ch();
        ral::read_reg!(crate::ral::ch, ch, CTRL_TRIG, BUSY == 1)
    }

    /// Returns `true` if this channel raised `DMA_IRQ_0`
    pub fn is_interrupt(&self) -> bool {
        self.completion_flag().is_raised()
    }

    /// Clear this channel's `DMA_IRQ_0` flag
    pub fn clear_interrupt(&self) {
        self.completion_flag().acknowledge();
    }

    /// Returns a handle to this channel's completion flag
    ///
    /// The handle is meant for the interrupt handler, which needs to
    /// acknowledge completions while the foreground owns the channel.
    pub fn completion_flag(&self) -> ChannelFlag {
        ChannelFlag {
            index: self.index,
            registers: self.registers,
        }
    }

    /// Ask the engine to abort this channel's transfer
    fn request_abort(&mut self) {
        self.registers.CHAN_ABORT.write(1 << self.index);
    }

    /// Indicates if an abort request is still in progress
    fn is_aborting(&self) -> bool {
        self.registers.CHAN_ABORT.read() & (1 << self.index) != 0
    }

    /// Write the control word, starting the transfer
    ///
    /// Byte elements, incrementing reads, no chaining (a channel chained to
    /// itself never chains), and a completion interrupt that isn't quieted.
    ///
    /// # Safety
    ///
    /// This could initiate a DMA transaction that uses an invalid source or
    /// destination. Caller must ensure that the addresses set in the channel
    /// are valid for the lifetime of the transfer.
    unsafe fn trigger(&mut self, increment_write: bool, treq: u32) {
        let index = self.index as u32;
        let ch = self.ch();
        ral::write_reg!(
            crate::ral::ch,
            ch,
            CTRL_TRIG,
            EN: 1,
            DATA_SIZE: DataSize::Byte as u32,
            INCR_READ: 1,
            INCR_WRITE: increment_write as u32,
            CHAIN_TO: index,
            TREQ_SEL: treq
        );
    }
}

impl TransferEngine for Channel {
    fn is_busy(&self) -> bool {
        Channel::is_busy(self)
    }

    fn start(&mut self, descriptor: &TransferDescriptor<'_>) {
        let target = descriptor.target();
        let treq = descriptor
            .pacing_gate()
            .map_or(ral::dreq::PERMANENT, |gate| gate.signal());

        self.set_read_address(descriptor.source());
        self.set_write_address(target.address());
        self.set_transfer_count(descriptor.len() as u32);

        // Prevent preceding reads/writes on the buffers from being moved
        // past the trigger (i.e. after the transfer has started).
        atomic::fence(Ordering::SeqCst);
        // Safety: the descriptor borrows its buffers, and the sequencer
        // cancels the transfer before the descriptor goes away.
        unsafe { self.trigger(target.increments(), treq) };
    }

    fn cancel(&mut self) {
        self.request_abort();
        while self.is_aborting() {}
        // An abort can still raise the completion interrupt.
        self.clear_interrupt();
        atomic::fence(Ordering::SeqCst);
    }
}

// It's OK to send a channel across an execution context.
// They can't be cloned or copied, so there's no chance of
// them being (mutably) shared.
unsafe impl Send for Channel {}

/// A channel's `DMA_IRQ_0` flag
///
/// Obtained from [`Channel::completion_flag`].
#[derive(Clone, Copy)]
pub struct ChannelFlag {
    index: usize,
    registers: Static<dma::RegisterBlock>,
}

impl CompletionFlag for ChannelFlag {
    fn is_raised(&self) -> bool {
        self.registers.INTS0.read() & (1 << self.index) != 0
    }
    fn acknowledge(&self) {
        // Immutable write OK. INTS0 is write-1-to-clear, so other
        // channels' flags are untouched.
        self.registers.INTS0.write(1 << self.index);
    }
}

// Safety: the flag only touches its own bit of a write-1-to-clear register.
unsafe impl Send for ChannelFlag {}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::Dma;
    use crate::{
        descriptor::TransferDescriptor,
        engine::{CompletionFlag, TransferEngine},
        peripheral::UartTx,
        ral::{ch::CTRL_TRIG, dma},
        Error,
    };
    use std::{boxed::Box, vec};

    /// RAM standing in for the DMA register block
    ///
    /// Plain RAM doesn't model the engine's side effects. INTS0 isn't
    /// write-1-to-clear, and CHAN_ABORT bits never drop on their own, so
    /// tests set the values the engine would leave behind.
    struct FakeRegisters(Box<[u32]>);

    impl FakeRegisters {
        fn new() -> Self {
            let words = core::mem::size_of::<dma::RegisterBlock>() / 4;
            FakeRegisters(vec![0u32; words].into_boxed_slice())
        }
        fn dma(&self) -> Dma {
            // Safety: the block outlives every Dma in these tests.
            unsafe { Dma::new(self.0.as_ptr().cast()) }
        }
        fn word(&self, byte_offset: usize) -> u32 {
            self.0[byte_offset / 4]
        }
        fn set_word(&mut self, byte_offset: usize, value: u32) {
            self.0[byte_offset / 4] = value;
        }
    }

    const INTE0: usize = 0x404;
    const INTS0: usize = 0x40C;
    const CHAN_ABORT: usize = 0x444;

    fn ctrl_field(ctrl: u32, mask: u32, offset: u32) -> u32 {
        (ctrl & mask) >> offset
    }

    #[test]
    fn claims_lowest_free_channel() {
        let regs = FakeRegisters::new();
        let mut dma = regs.dma();
        let first = dma.claim_unused_channel().unwrap();
        let second = dma.claim_unused_channel().unwrap();
        assert_eq!(first.channel(), 0);
        assert_eq!(second.channel(), 1);
        dma.unclaim(first);
        assert_eq!(dma.claim_unused_channel().unwrap().channel(), 0);
    }

    #[test]
    fn no_free_channel_after_twelve() {
        let regs = FakeRegisters::new();
        let mut dma = regs.dma();
        for _ in 0..12 {
            dma.claim_unused_channel().unwrap();
        }
        assert_eq!(dma.claim_unused_channel().err(), Some(Error::NoFreeChannel));
    }

    #[test]
    fn memory_copy_programs_channel() {
        let regs = FakeRegisters::new();
        let mut dma = regs.dma();
        let _ = dma.claim_unused_channel().unwrap();
        let mut channel = dma.claim_unused_channel().unwrap();

        let source = [7u8; 16];
        let mut destination = [0u8; 16];
        let dst_addr = destination.as_ptr() as u32;
        let desc = TransferDescriptor::memory_to_memory(&source, &mut destination).unwrap();
        channel.start(&desc);

        let base = 0x40;
        assert_eq!(regs.word(base), source.as_ptr() as u32);
        assert_eq!(regs.word(base + 4), dst_addr);
        assert_eq!(regs.word(base + 8), 16);

        let ctrl = regs.word(base + 0xC);
        assert_eq!(ctrl_field(ctrl, CTRL_TRIG::EN::mask, CTRL_TRIG::EN::offset), 1);
        assert_eq!(
            ctrl_field(ctrl, CTRL_TRIG::DATA_SIZE::mask, CTRL_TRIG::DATA_SIZE::offset),
            0
        );
        assert_eq!(
            ctrl_field(ctrl, CTRL_TRIG::INCR_READ::mask, CTRL_TRIG::INCR_READ::offset),
            1
        );
        assert_eq!(
            ctrl_field(ctrl, CTRL_TRIG::INCR_WRITE::mask, CTRL_TRIG::INCR_WRITE::offset),
            1
        );
        assert_eq!(
            ctrl_field(ctrl, CTRL_TRIG::CHAIN_TO::mask, CTRL_TRIG::CHAIN_TO::offset),
            1
        );
        assert_eq!(
            ctrl_field(ctrl, CTRL_TRIG::TREQ_SEL::mask, CTRL_TRIG::TREQ_SEL::offset),
            0x3F
        );
    }

    #[test]
    fn uart_transfer_is_paced_and_fixed() {
        let regs = FakeRegisters::new();
        let mut dma = regs.dma();
        let mut channel = dma.claim_unused_channel().unwrap();

        let source = *b"Hello from DMAqd";
        let desc = TransferDescriptor::memory_to_peripheral(&source, &UartTx::uart0()).unwrap();
        channel.start(&desc);

        assert_eq!(regs.word(4), 0x4003_4000);
        let ctrl = regs.word(0xC);
        assert_eq!(
            ctrl_field(ctrl, CTRL_TRIG::INCR_WRITE::mask, CTRL_TRIG::INCR_WRITE::offset),
            0
        );
        assert_eq!(
            ctrl_field(ctrl, CTRL_TRIG::TREQ_SEL::mask, CTRL_TRIG::TREQ_SEL::offset),
            20
        );
    }

    #[test]
    fn busy_reflects_status_bit() {
        let mut regs = FakeRegisters::new();
        let mut dma = regs.dma();
        let channel = dma.claim_unused_channel().unwrap();
        assert!(!channel.is_busy());
        regs.set_word(0xC, CTRL_TRIG::BUSY::mask);
        assert!(channel.is_busy());
    }

    #[test]
    fn interrupt_enable_and_flag() {
        let mut regs = FakeRegisters::new();
        let mut dma = regs.dma();
        let _ = dma.claim_unused_channel().unwrap();
        let _ = dma.claim_unused_channel().unwrap();
        let mut channel = dma.claim_unused_channel().unwrap();

        channel.set_interrupt_on_completion(true);
        assert_eq!(regs.word(INTE0), 1 << 2);
        channel.set_interrupt_on_completion(false);
        assert_eq!(regs.word(INTE0), 0);

        let flag = channel.completion_flag();
        regs.set_word(INTS0, 1 << 2);
        assert!(flag.is_raised());
        assert!(channel.is_interrupt());
        regs.set_word(INTS0, 0);
        // RAM isn't write-1-to-clear; just check the written bit.
        flag.acknowledge();
        assert_eq!(regs.word(INTS0), 1 << 2);
    }

    #[test]
    fn abort_targets_only_this_channel() {
        let mut regs = FakeRegisters::new();
        let mut dma = regs.dma();
        let _ = dma.claim_unused_channel().unwrap();
        let mut channel = dma.claim_unused_channel().unwrap();

        channel.request_abort();
        assert_eq!(regs.word(CHAN_ABORT), 1 << 1);
        assert!(channel.is_aborting());

        // Another channel's abort in progress doesn't hold this one up.
        regs.set_word(CHAN_ABORT, 1 << 0);
        assert!(!channel.is_aborting());

        channel.clear_interrupt();
        assert_eq!(regs.word(INTS0), 1 << 1);
    }
}
