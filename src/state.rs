//! Sequence state shared between the completion interrupt and the foreground
//!
//! [`SequenceState`] lives in a `static`. Splitting it hands out exactly one
//! [`CompletionSignal`], owned by the interrupt handler, and exactly one
//! [`CompletionWatch`], owned by the foreground loop. The signal is the only
//! writer of the sequence position and the only setter of the pending flag.
//! The watch is the only reader, and the only one to clear the flag.
//!
//! Every access is a single-word atomic load or store. There are no
//! read-modify-write operations, so the state also works on ARMv6-M.

use crate::indicator::IndicatorState;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use heapless::spsc::{Consumer, Producer, Queue};

/// Capacity of the completion journal, plus one
const JOURNAL_SLOTS: usize = 8;

/// A record of one finished transfer
///
/// The interrupt handler queues these so that the foreground, not the
/// handler, formats and emits the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    /// Index of the stage that finished
    pub stage: usize,
    /// Indicator state asserted for it
    pub indicator: IndicatorState,
}

/// Process-wide, interrupt-shared sequence state
pub struct SequenceState {
    position: AtomicUsize,
    pending: AtomicBool,
    dropped: AtomicUsize,
    journal: Queue<Completion, JOURNAL_SLOTS>,
}

impl SequenceState {
    /// Position 0, nothing pending
    pub const fn new() -> Self {
        SequenceState {
            position: AtomicUsize::new(0),
            pending: AtomicBool::new(false),
            dropped: AtomicUsize::new(0),
            journal: Queue::new(),
        }
    }

    /// Split the state into its interrupt side and its foreground side
    ///
    /// Since `split` needs a unique borrow, there can only ever be one
    /// signal and one watch for a given state.
    pub fn split(&mut self) -> (CompletionSignal<'_>, CompletionWatch<'_>) {
        let (producer, consumer) = self.journal.split();
        (
            CompletionSignal {
                position: &self.position,
                pending: &self.pending,
                dropped: &self.dropped,
                journal: producer,
            },
            CompletionWatch {
                position: &self.position,
                pending: &self.pending,
                dropped: &self.dropped,
                reported: 0,
                journal: consumer,
            },
        )
    }
}

impl Default for SequenceState {
    fn default() -> Self {
        Self::new()
    }
}

/// The interrupt side of the sequence state
pub struct CompletionSignal<'a> {
    position: &'a AtomicUsize,
    pending: &'a AtomicBool,
    dropped: &'a AtomicUsize,
    journal: Producer<'a, Completion, JOURNAL_SLOTS>,
}

impl CompletionSignal<'_> {
    /// Returns the current sequence position
    pub fn position(&self) -> usize {
        self.position.load(Ordering::Relaxed)
    }

    /// Store the next sequence position
    pub fn advance(&mut self, position: usize) {
        self.position.store(position, Ordering::Relaxed);
    }

    /// Make the completion visible to the foreground
    ///
    /// The release store orders the position update, and the engine's
    /// writes observed by this context, before the flag.
    pub fn publish(&mut self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Queue a completion record for the foreground to log
    ///
    /// Never blocks. When the journal is full, the record is counted and
    /// dropped.
    pub fn record(&mut self, completion: Completion) {
        if self.journal.enqueue(completion).is_err() {
            let dropped = self.dropped.load(Ordering::Relaxed);
            self.dropped.store(dropped.wrapping_add(1), Ordering::Relaxed);
        }
    }
}

/// The foreground side of the sequence state
pub struct CompletionWatch<'a> {
    position: &'a AtomicUsize,
    pending: &'a AtomicBool,
    dropped: &'a AtomicUsize,
    reported: usize,
    journal: Consumer<'a, Completion, JOURNAL_SLOTS>,
}

impl CompletionWatch<'_> {
    /// Indicates if a completion is waiting to be taken
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Take the pending completion, clearing the flag
    ///
    /// Returns `false`, and changes nothing, if no completion is pending.
    ///
    /// The load and the store are separate. That's sound because the flag
    /// can't be set again until the foreground re-arms the engine, which
    /// happens after this call.
    pub fn take(&mut self) -> bool {
        if self.pending.load(Ordering::Acquire) {
            self.pending.store(false, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Returns the sequence position: the next stage to arm
    pub fn position(&self) -> usize {
        self.position.load(Ordering::Acquire)
    }

    /// Pop the oldest journal record
    pub fn next_completion(&mut self) -> Option<Completion> {
        self.journal.dequeue()
    }

    /// Returns how many records were dropped since the last call
    pub fn newly_dropped(&mut self) -> usize {
        let dropped = self.dropped.load(Ordering::Relaxed);
        let fresh = dropped.wrapping_sub(self.reported);
        self.reported = dropped;
        fresh
    }
}
