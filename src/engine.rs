//! The seams between the sequencing logic and a DMA engine
//!
//! [`Channel`](crate::Channel) implements both traits for RP2040 hardware.

use crate::descriptor::TransferDescriptor;

/// A DMA channel that runs one transfer at a time
pub trait TransferEngine {
    /// Indicates if the engine still owns an in-flight transfer
    fn is_busy(&self) -> bool;
    /// Program the engine from `descriptor`, and start the transfer
    ///
    /// An unpaced transfer starts immediately. A paced transfer starts as
    /// soon as its data request asserts. The engine raises its completion
    /// flag once the last element moves.
    ///
    /// Callers must not start a transfer while the engine is busy.
    fn start(&mut self, descriptor: &TransferDescriptor<'_>);
    /// Abort the in-flight transfer, if any, and wait for the engine to stop
    ///
    /// Only used when the sequencer is dropped, so that no transfer outlives
    /// the buffers it borrows.
    fn cancel(&mut self);
}

/// A channel's completion interrupt flag
///
/// Used from interrupt context, so both methods take `&self` and must not
/// block.
pub trait CompletionFlag {
    /// Indicates if the channel raised its completion interrupt
    fn is_raised(&self) -> bool;
    /// Clear the completion interrupt
    fn acknowledge(&self);
}
