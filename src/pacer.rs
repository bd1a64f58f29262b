//! The foreground loop
//!
//! The pacer waits for the completion interrupt, reports the finished
//! stage, waits out the pacing delay, and arms the next stage.

use crate::{engine::TransferEngine, sequencer::TransferSequencer, state::CompletionWatch};
use embedded_hal::delay::DelayNs;

/// Pacer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Delay between a completion and arming the next stage
    pub pacing_delay_ms: u32,
}

impl Config {
    /// One second between transfers
    pub const fn new() -> Self {
        Config {
            pacing_delay_ms: 1000,
        }
    }

    /// Set the delay between a completion and arming the next stage
    pub const fn pacing_delay_ms(mut self, ms: u32) -> Self {
        self.pacing_delay_ms = ms;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// How the foreground waits for a completion
pub trait Idle {
    /// Wait, returning at the latest once `ready()` could be `true`
    ///
    /// Implementations may return early; the pacer just polls again.
    fn wait<F: FnMut() -> bool>(&mut self, ready: F);
}

/// Sleep until the next interrupt
///
/// The readiness check and the `wfi` happen with interrupts masked. An
/// interrupt that arrives in between stays pending, and wakes the `wfi`
/// right away, so no completion is slept through.
#[derive(Debug, Default, Clone, Copy)]
pub struct WaitForInterrupt;

impl Idle for WaitForInterrupt {
    fn wait<F: FnMut() -> bool>(&mut self, mut ready: F) {
        cortex_m::interrupt::free(|_| {
            if !ready() {
                cortex_m::asm::wfi();
            }
        });
    }
}

/// The foreground loop
pub struct Pacer<'a, E: TransferEngine, D, W> {
    sequencer: TransferSequencer<'a, E>,
    watch: CompletionWatch<'a>,
    delay: D,
    idle: W,
    config: Config,
}

impl<'a, E, D, W> Pacer<'a, E, D, W>
where
    E: TransferEngine,
    D: DelayNs,
    W: Idle,
{
    /// Create a pacer that arms through `sequencer`, and learns about
    /// completions through `watch`
    ///
    /// Nothing is armed until [`start`](Pacer::start).
    pub fn new(
        sequencer: TransferSequencer<'a, E>,
        watch: CompletionWatch<'a>,
        delay: D,
        idle: W,
        config: Config,
    ) -> Self {
        Pacer {
            sequencer,
            watch,
            delay,
            idle,
            config,
        }
    }

    /// Arm the stage at the current position, which is the first stage
    /// after startup
    pub fn start(&mut self) {
        self.sequencer.arm(self.watch.position());
    }

    /// Run one iteration of the loop
    ///
    /// Returns `true` if a completion was taken and the next stage armed.
    /// Otherwise, idles once and returns `false`.
    pub fn poll(&mut self) -> bool {
        self.report();
        if !self.watch.take() {
            let watch = &self.watch;
            self.idle.wait(|| watch.is_pending());
            return false;
        }
        self.delay.delay_ms(self.config.pacing_delay_ms);
        self.sequencer.arm(self.watch.position());
        true
    }

    /// Run the loop forever
    pub fn run(&mut self) -> ! {
        loop {
            self.poll();
        }
    }

    /// Log journaled completions
    fn report(&mut self) {
        while let Some(completion) = self.watch.next_completion() {
            log::info!(
                "transfer {} finished, indicator {:?}",
                completion.stage + 1,
                completion.indicator
            );
        }
        let dropped = self.watch.newly_dropped();
        if dropped > 0 {
            log::warn!("dropped {} completion records", dropped);
        }
    }

    /// Returns the completion watch
    pub fn watch(&self) -> &CompletionWatch<'a> {
        &self.watch
    }
}
