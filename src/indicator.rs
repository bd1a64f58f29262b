//! Indicator outputs

use core::convert::Infallible;
use embedded_hal::digital::OutputPin;

/// Which of the three indicator outputs is asserted
///
/// At most one output is asserted at a time. On the reference board, `A` is
/// the red LED, `B` the green LED, and `C` the blue LED.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorState {
    /// Nothing asserted
    #[default]
    Off,
    /// The first output, red on the reference board
    A,
    /// The second output, green
    B,
    /// The third output, blue
    C,
}

/// Drives the indicator outputs
///
/// `show` is called from interrupt context, so implementations must not
/// block.
pub trait IndicatorOutput {
    /// Assert the output for `state`, and deassert the others
    fn show(&mut self, state: IndicatorState);
}

/// Three GPIO outputs, one per indicator state
///
/// Pins must be infallible, since there is nowhere to report an error from
/// the interrupt handler.
pub struct RgbIndicator<R, G, B> {
    red: R,
    green: G,
    blue: B,
}

impl<R, G, B> RgbIndicator<R, G, B>
where
    R: OutputPin<Error = Infallible>,
    G: OutputPin<Error = Infallible>,
    B: OutputPin<Error = Infallible>,
{
    /// Take ownership of the pins, and turn them all off
    pub fn new(red: R, green: G, blue: B) -> Self {
        let mut indicator = RgbIndicator { red, green, blue };
        indicator.show(IndicatorState::Off);
        indicator
    }
}

impl<R, G, B> IndicatorOutput for RgbIndicator<R, G, B>
where
    R: OutputPin<Error = Infallible>,
    G: OutputPin<Error = Infallible>,
    B: OutputPin<Error = Infallible>,
{
    fn show(&mut self, state: IndicatorState) {
        infallible(self.red.set_low());
        infallible(self.green.set_low());
        infallible(self.blue.set_low());
        infallible(match state {
            IndicatorState::Off => Ok(()),
            IndicatorState::A => self.red.set_high(),
            IndicatorState::B => self.green.set_high(),
            IndicatorState::C => self.blue.set_high(),
        });
    }
}

fn infallible(result: Result<(), Infallible>) {
    if let Err(never) = result {
        match never {}
    }
}
