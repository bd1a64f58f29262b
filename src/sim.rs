//! A software model of a single DMA channel, for tests
//!
//! The model copies memory-to-memory transfers for real, and collects the
//! bytes of register transfers instead of writing to the register. Its
//! completion flag behaves like write-1-to-clear hardware: it stays raised
//! until acknowledged.

extern crate std;

use crate::{
    descriptor::{Target, TransferDescriptor},
    engine::{CompletionFlag, TransferEngine},
};
use core::cell::{Cell, RefCell};
use std::vec::Vec;

#[derive(Clone, Copy)]
struct Armed {
    source: *const u8,
    target: Target,
    len: usize,
}

#[derive(Default)]
pub(crate) struct SimDma {
    armed: Cell<Option<Armed>>,
    raised: Cell<bool>,
    starts: Cell<usize>,
    acknowledgements: Cell<usize>,
    cancellations: Cell<usize>,
    sent: RefCell<Vec<u8>>,
}

impl SimDma {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn engine(&self) -> SimEngine<'_> {
        SimEngine(self)
    }

    pub(crate) fn flag(&self) -> SimFlag<'_> {
        SimFlag(self)
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.armed.get().is_some()
    }

    pub(crate) fn is_raised(&self) -> bool {
        self.raised.get()
    }

    pub(crate) fn armed_source(&self) -> Option<*const u8> {
        self.armed.get().map(|armed| armed.source)
    }

    pub(crate) fn starts(&self) -> usize {
        self.starts.get()
    }

    pub(crate) fn acknowledgements(&self) -> usize {
        self.acknowledgements.get()
    }

    pub(crate) fn cancellations(&self) -> usize {
        self.cancellations.get()
    }

    /// Bytes written to peripheral registers so far
    pub(crate) fn sent(&self) -> Vec<u8> {
        self.sent.borrow().clone()
    }

    /// Move the armed transfer's bytes, and raise the completion flag
    ///
    /// Panics if nothing is armed.
    pub(crate) fn complete(&self) {
        let armed = self.armed.take().expect("no transfer armed");
        // Safety: the descriptor that armed this transfer borrows both
        // buffers, and the sequencer holding it is still alive.
        unsafe {
            let source = core::slice::from_raw_parts(armed.source, armed.len);
            match armed.target {
                Target::Memory(dst) => {
                    core::ptr::copy_nonoverlapping(source.as_ptr(), dst, armed.len)
                }
                Target::Register(_) => self.sent.borrow_mut().extend_from_slice(source),
            }
        }
        self.raised.set(true);
    }

    /// Raise the flag without moving any data
    pub(crate) fn raise(&self) {
        self.raised.set(true);
    }
}

pub(crate) struct SimEngine<'a>(&'a SimDma);

impl TransferEngine for SimEngine<'_> {
    fn is_busy(&self) -> bool {
        self.0.is_busy()
    }

    fn start(&mut self, descriptor: &TransferDescriptor<'_>) {
        assert!(!self.0.is_busy(), "engine already owns a transfer");
        self.0.armed.set(Some(Armed {
            source: descriptor.source(),
            target: descriptor.target(),
            len: descriptor.len(),
        }));
        self.0.starts.set(self.0.starts.get() + 1);
    }

    fn cancel(&mut self) {
        self.0.armed.set(None);
        self.0.raised.set(false);
        self.0.cancellations.set(self.0.cancellations.get() + 1);
    }
}

#[derive(Clone, Copy)]
pub(crate) struct SimFlag<'a>(&'a SimDma);

impl CompletionFlag for SimFlag<'_> {
    fn is_raised(&self) -> bool {
        self.0.raised.get()
    }

    fn acknowledge(&self) {
        self.0.raised.set(false);
        self.0
            .acknowledgements
            .set(self.0.acknowledgements.get() + 1);
    }
}
