//! Transfer descriptors and stages

use crate::{indicator::IndicatorState, peripheral::Destination, Error, Result};
use core::marker::PhantomData;

/// Where a transfer writes its elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// A memory buffer; the write address increments after every element
    Memory(*mut u8),
    /// A fixed peripheral register; the write address never moves
    Register(*mut u8),
}

impl Target {
    /// Returns the first write address
    pub fn address(self) -> *mut u8 {
        match self {
            Target::Memory(addr) | Target::Register(addr) => addr,
        }
    }
    /// Indicates if the write address increments after every element
    pub fn increments(self) -> bool {
        matches!(self, Target::Memory(_))
    }
}

/// A peripheral data request that paces a transfer
///
/// Without a gate, the engine moves elements back-to-back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingGate(u32);

impl PacingGate {
    /// Returns the data request signal number
    pub const fn signal(self) -> u32 {
        self.0
    }
}

/// One planned transfer of bytes
///
/// The descriptor borrows its buffers for `'a`, so no transfer it describes
/// can outlive them. Elements are always one byte wide, and the read address
/// always increments.
#[derive(Debug)]
pub struct TransferDescriptor<'a> {
    source: *const u8,
    target: Target,
    len: usize,
    gate: Option<PacingGate>,
    _buffers: PhantomData<&'a mut [u8]>,
}

// Safety: the descriptor only carries addresses. The buffers behind them are
// borrowed for 'a, and only the DMA engine touches them through these
// pointers.
unsafe impl Send for TransferDescriptor<'_> {}
unsafe impl Sync for TransferDescriptor<'_> {}

fn check_source(source: &[u8]) -> Result<()> {
    if source.is_empty() {
        Err(Error::EmptyTransfer)
    } else {
        Ok(())
    }
}

impl<'a> TransferDescriptor<'a> {
    /// Describe a copy of all of `source` into the front of `destination`
    ///
    /// The transfer runs unpaced.
    pub fn memory_to_memory(source: &'a [u8], destination: &'a mut [u8]) -> Result<Self> {
        check_source(source)?;
        if destination.len() < source.len() {
            return Err(Error::DestinationTooShort {
                source: source.len(),
                destination: destination.len(),
            });
        }
        Ok(TransferDescriptor {
            source: source.as_ptr(),
            target: Target::Memory(destination.as_mut_ptr()),
            len: source.len(),
            gate: None,
            _buffers: PhantomData,
        })
    }

    /// Describe sending all of `source` to a peripheral's data register
    ///
    /// The transfer is paced by the peripheral's data request.
    pub fn memory_to_peripheral<D: Destination>(source: &'a [u8], destination: &D) -> Result<Self> {
        check_source(source)?;
        Ok(TransferDescriptor {
            source: source.as_ptr(),
            target: Target::Register(destination.destination_address() as *mut u8),
            len: source.len(),
            gate: Some(PacingGate(destination.destination_signal())),
            _buffers: PhantomData,
        })
    }

    /// Returns the first read address
    pub fn source(&self) -> *const u8 {
        self.source
    }
    /// Returns the write target
    pub fn target(&self) -> Target {
        self.target
    }
    /// Returns the number of bytes to move
    pub fn len(&self) -> usize {
        self.len
    }
    /// Descriptors are never empty
    pub fn is_empty(&self) -> bool {
        false
    }
    /// Returns the pacing gate, if the transfer is paced
    pub fn pacing_gate(&self) -> Option<PacingGate> {
        self.gate
    }
}

/// One entry in the transfer sequence
///
/// Pairs a descriptor with the indicator state asserted once that
/// descriptor's transfer completes.
#[derive(Debug)]
pub struct Stage<'a> {
    /// The transfer to run
    pub descriptor: TransferDescriptor<'a>,
    /// Shown after the transfer finishes
    pub indicator: IndicatorState,
}

impl<'a> Stage<'a> {
    /// Pair a descriptor with its indicator state
    pub const fn new(descriptor: TransferDescriptor<'a>, indicator: IndicatorState) -> Self {
        Stage {
            descriptor,
            indicator,
        }
    }
}
