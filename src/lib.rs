//! Interrupt-driven chained DMA transfers for RP2040 processors
//!
//! `dma-chain` moves a fixed table of byte buffers, one stage at a time, on a
//! single DMA channel. Stages copy memory to memory, or stream memory into a
//! peripheral data register paced by the peripheral's data request.
//!
//! Three pieces cooperate:
//!
//! - a [`TransferSequencer`] owns the [`Channel`] and the [`Stage`] table, and
//!   arms one stage at a time.
//! - a [`CompletionCoordinator`], made by the sequencer over the same stage
//!   table, runs in the `DMA_IRQ_0` handler. It
//!   acknowledges the channel, advances the sequence, drives the
//!   indicator outputs, and signals the foreground.
//! - a [`Pacer`] runs the foreground loop. It waits for the signal, waits out
//!   a pacing delay, and arms the next stage.
//!
//! The two contexts share a [`SequenceState`]. Splitting it yields one
//! interrupt-side [`CompletionSignal`] and one foreground-side
//! [`CompletionWatch`], so each shared field has exactly one writer.
//!
//! # Getting started
//!
//! ```ignore
//! use dma_chain::{stages, *};
//!
//! static mut STATE: SequenceState = SequenceState::new();
//! static mut DESTINATIONS: [[u8; 16]; 3] = [[0; 16]; 3];
//! static mut COORDINATOR: Option<CompletionCoordinator<'static, ChannelFlag, Led>> = None;
//!
//! #[entry]
//! fn main() -> ! {
//!     // Board bring-up: clocks, pins, console...
//!     let mut dma = unsafe { Dma::new(ral::DMA_BASE as *const ()) };
//!     let mut channel = dma.claim_unused_channel().unwrap();
//!     channel.set_interrupt_on_completion(true);
//!
//!     let table = singleton!(: [Stage<'static>; 3] = stages::memory_to_memory(
//!         &stages::MEMORY_SOURCES,
//!         unsafe { &mut DESTINATIONS },
//!     ).unwrap()).unwrap();
//!     let (signal, watch) = unsafe { STATE.split() };
//!     let flag = channel.completion_flag();
//!     let sequencer = TransferSequencer::new(channel, table).unwrap();
//!     unsafe {
//!         COORDINATOR = Some(sequencer.coordinator(flag, signal, led));
//!         dma.unmask_completion_interrupt();
//!     }
//!
//!     let mut pacer = Pacer::new(sequencer, watch, delay, WaitForInterrupt, Config::new());
//!     pacer.start();
//!     pacer.run()
//! }
//!
//! #[interrupt]
//! fn DMA_IRQ_0() {
//!     unsafe { COORDINATOR.as_mut() }.unwrap().on_interrupt();
//! }
//! ```
//!
//! ### License
//!
//! Licensed under either of
//!
//! - [Apache License, Version 2.0](http://www.apache.org/licenses/LICENSE-2.0)
//! - [MIT License](http://opensource.org/licenses/MIT)
//!
//! at your option.
//!
//! Unless you explicitly state otherwise, any contribution intentionally submitted
//! for inclusion in the work by you, as defined in the Apache-2.0 license, shall be
//! dual licensed as above, without any additional terms or conditions.

#![no_std]

mod channel;
mod descriptor;
mod engine;
mod error;
mod indicator;
mod interrupt;
mod pacer;
pub mod peripheral;
pub mod ral;
mod sequencer;
#[cfg(test)]
mod sim;
pub mod stages;
mod state;

pub use channel::{Channel, ChannelFlag, Dma, DmaIrq0};
pub use descriptor::{PacingGate, Stage, Target, TransferDescriptor};
pub use engine::{CompletionFlag, TransferEngine};
pub use error::Error;
pub use indicator::{IndicatorOutput, IndicatorState, RgbIndicator};
pub use interrupt::CompletionCoordinator;
pub use pacer::{Config, Idle, Pacer, WaitForInterrupt};
pub use sequencer::TransferSequencer;
pub use state::{Completion, CompletionSignal, CompletionWatch, SequenceState};

/// A configuration result
pub type Result<T> = core::result::Result<T, Error>;
