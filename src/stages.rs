//! Stock three-stage sequences
//!
//! Both sequences light red, then green, then blue as their stages finish.

use crate::{
    descriptor::{Stage, TransferDescriptor},
    indicator::IndicatorState,
    peripheral::Destination,
    Result,
};

/// Bytes moved by every stock transfer
pub const TRANSFER_LEN: usize = 16;

/// Source patterns for the memory-to-memory sequence
pub const MEMORY_SOURCES: [[u8; TRANSFER_LEN]; 3] = [
    [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16],
    [16, 15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1],
    [10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120, 130, 140, 150, 160],
];

/// Source text for the UART sequence
pub const UART_SOURCES: [[u8; TRANSFER_LEN]; 3] =
    [*b"ABCDEFGHIJKLMNOP", *b"1234567890abcdef", *b"Hello from DMAqd"];

/// Indicator shown after each stock stage
pub const INDICATORS: [IndicatorState; 3] =
    [IndicatorState::A, IndicatorState::B, IndicatorState::C];

/// Copy each source into the matching destination
pub fn memory_to_memory<'a>(
    sources: &'a [[u8; TRANSFER_LEN]; 3],
    destinations: &'a mut [[u8; TRANSFER_LEN]; 3],
) -> Result<[Stage<'a>; 3]> {
    let [d0, d1, d2] = destinations;
    Ok([
        Stage::new(TransferDescriptor::memory_to_memory(&sources[0], d0)?, INDICATORS[0]),
        Stage::new(TransferDescriptor::memory_to_memory(&sources[1], d1)?, INDICATORS[1]),
        Stage::new(TransferDescriptor::memory_to_memory(&sources[2], d2)?, INDICATORS[2]),
    ])
}

/// Send each source to the peripheral, in order
pub fn memory_to_peripheral<'a, D: Destination>(
    sources: &'a [[u8; TRANSFER_LEN]; 3],
    destination: &D,
) -> Result<[Stage<'a>; 3]> {
    Ok([
        Stage::new(
            TransferDescriptor::memory_to_peripheral(&sources[0], destination)?,
            INDICATORS[0],
        ),
        Stage::new(
            TransferDescriptor::memory_to_peripheral(&sources[1], destination)?,
            INDICATORS[1],
        ),
        Stage::new(
            TransferDescriptor::memory_to_peripheral(&sources[2], destination)?,
            INDICATORS[2],
        ),
    ])
}
