//! DMA completion interrupt support

use crate::{
    descriptor::Stage,
    engine::CompletionFlag,
    indicator::IndicatorOutput,
    state::{Completion, CompletionSignal},
};

/// Handles the completion interrupt for the sequenced channel
///
/// Obtain a coordinator from [`TransferSequencer::coordinator`](crate::TransferSequencer::coordinator).
///
/// Call [`on_interrupt`](CompletionCoordinator::on_interrupt) from the
/// `DMA_IRQ_0` handler:
///
/// ```ignore
/// #[interrupt]
/// fn DMA_IRQ_0() {
///     // Safety: the coordinator is only touched from this handler.
///     let coordinator = unsafe { COORDINATOR.as_mut() }.unwrap();
///     coordinator.on_interrupt();
/// }
/// ```
///
/// The coordinator never blocks, and never logs. It leaves a
/// [`Completion`] record in the journal for the foreground to report.
pub struct CompletionCoordinator<'a, F, I> {
    flag: F,
    stages: &'a [Stage<'a>],
    signal: CompletionSignal<'a>,
    indicator: I,
}

impl<'a, F, I> CompletionCoordinator<'a, F, I>
where
    F: CompletionFlag,
    I: IndicatorOutput,
{
    /// Create a coordinator over a non-empty stage table
    pub(crate) fn new(
        flag: F,
        stages: &'a [Stage<'a>],
        signal: CompletionSignal<'a>,
        indicator: I,
    ) -> Self {
        debug_assert!(!stages.is_empty());
        CompletionCoordinator {
            flag,
            stages,
            signal,
            indicator,
        }
    }

    /// Handle a DMA interrupt
    ///
    /// If the channel didn't raise its flag, the interrupt belongs to
    /// another channel on the same line. Returns `false` without touching
    /// any state.
    ///
    /// Otherwise, in this order:
    ///
    /// 1. acknowledge the flag, so the interrupt doesn't fire again.
    /// 2. advance the sequence position, wrapping after the last stage.
    /// 3. publish the completion to the foreground.
    /// 4. show the finished stage's indicator, and journal the completion.
    ///
    /// Returns `true`.
    pub fn on_interrupt(&mut self) -> bool {
        if !self.flag.is_raised() {
            return false;
        }
        self.flag.acknowledge();

        let finished = self.signal.position();
        self.signal.advance((finished + 1) % self.stages.len());
        self.signal.publish();

        let indicator = self.stages[finished].indicator;
        self.indicator.show(indicator);
        self.signal.record(Completion {
            stage: finished,
            indicator,
        });
        true
    }
}
