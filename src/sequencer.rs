//! Arming transfers from the stage table

use crate::{
    descriptor::Stage,
    engine::{CompletionFlag, TransferEngine},
    indicator::IndicatorOutput,
    interrupt::CompletionCoordinator,
    state::CompletionSignal,
    Error, Result,
};

/// Owns the transfer engine and the stage table, and arms one stage at a
/// time
///
/// Dropping the sequencer cancels any in-flight transfer, since the stage
/// table's buffers may go away with it.
pub struct TransferSequencer<'a, E: TransferEngine> {
    engine: E,
    stages: &'a [Stage<'a>],
}

impl<'a, E: TransferEngine> TransferSequencer<'a, E> {
    /// Create a sequencer over a non-empty stage table
    pub fn new(engine: E, stages: &'a [Stage<'a>]) -> Result<Self> {
        if stages.is_empty() {
            return Err(Error::EmptySequence);
        }
        Ok(TransferSequencer { engine, stages })
    }

    /// Create the interrupt-side coordinator for this sequence
    ///
    /// The coordinator walks the same stage table that this sequencer arms
    /// from, so both sides always agree on the sequence length. The
    /// coordinator doesn't borrow the sequencer, which can move on to the
    /// foreground loop.
    pub fn coordinator<'s, F, I>(
        &self,
        flag: F,
        signal: CompletionSignal<'s>,
        indicator: I,
    ) -> CompletionCoordinator<'s, F, I>
    where
        'a: 's,
        F: CompletionFlag,
        I: IndicatorOutput,
    {
        CompletionCoordinator::new(flag, self.stages, signal, indicator)
    }

    /// Start the transfer described by stage `index`
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range, or if the engine still owns an
    /// in-flight transfer. Both are caller bugs.
    pub fn arm(&mut self, index: usize) {
        let stage = self.stages.get(index).unwrap_or_else(|| {
            panic!(
                "transfer stage {} exceeds sequence length {}",
                index,
                self.stages.len()
            )
        });
        assert!(
            !self.engine.is_busy(),
            "armed stage {} while a transfer is in flight",
            index
        );
        log::info!("starting transfer {}", index + 1);
        self.engine.start(&stage.descriptor);
    }
}

impl<E: TransferEngine> Drop for TransferSequencer<'_, E> {
    fn drop(&mut self) {
        if self.engine.is_busy() {
            self.engine.cancel();
        }
    }
}
