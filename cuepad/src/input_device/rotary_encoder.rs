//! Rotary encoder with a table driven quadrature decoder.
//!
//! The decoder walks a transition table indexed by the current state and the
//! 2-bit contact sample. Bouncing contacts only move between intermediate
//! states, a direction is emitted when a whole step (or half step) completes.
use embedded_hal::digital::InputPin;

use crate::config::{EncoderConfig, EncoderMode};

/// The encoder direction is either `Clockwise`, `CounterClockwise`, or `None`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// A clockwise turn
    Clockwise,
    /// A counterclockwise turn
    CounterClockwise,
    /// No change
    #[default]
    None,
}

/// Direction bits folded into a table entry
const DIR_CW: u8 = 0x10;
const DIR_CCW: u8 = 0x20;
const STATE_MASK: u8 = 0x0F;

const R_START: u8 = 0x0;

// Full step states
const R_CW_FINAL: u8 = 0x1;
const R_CW_BEGIN: u8 = 0x2;
const R_CW_NEXT: u8 = 0x3;
const R_CCW_BEGIN: u8 = 0x4;
const R_CCW_FINAL: u8 = 0x5;
const R_CCW_NEXT: u8 = 0x6;

/// Rows are states, columns are samples `a << 1 | b`
const FULL_STEP_TABLE: [[u8; 4]; 7] = [
    // R_START
    [R_START, R_CCW_BEGIN, R_CW_BEGIN, R_START],
    // R_CW_FINAL
    [R_START | DIR_CW, R_CW_FINAL, R_START, R_CW_NEXT],
    // R_CW_BEGIN
    [R_START, R_START, R_CW_BEGIN, R_CW_NEXT],
    // R_CW_NEXT
    [R_START, R_CW_FINAL, R_CW_BEGIN, R_CW_NEXT],
    // R_CCW_BEGIN
    [R_START, R_CCW_BEGIN, R_START, R_CCW_NEXT],
    // R_CCW_FINAL
    [R_START | DIR_CCW, R_START, R_CCW_FINAL, R_CCW_NEXT],
    // R_CCW_NEXT
    [R_START, R_CCW_BEGIN, R_CCW_FINAL, R_CCW_NEXT],
];

// Half step states
const R_CCW_BEGIN_H: u8 = 0x1;
const R_CW_BEGIN_H: u8 = 0x2;
const R_START_M: u8 = 0x3;
const R_CW_BEGIN_M: u8 = 0x4;
const R_CCW_BEGIN_M: u8 = 0x5;

const HALF_STEP_TABLE: [[u8; 4]; 6] = [
    // R_START
    [R_START, R_CCW_BEGIN_H, R_CW_BEGIN_H, R_START_M],
    // R_CCW_BEGIN
    [R_START, R_CCW_BEGIN_H, R_START, R_START_M | DIR_CCW],
    // R_CW_BEGIN
    [R_START, R_START, R_CW_BEGIN_H, R_START_M | DIR_CW],
    // R_START_M
    [R_START, R_CW_BEGIN_M, R_CCW_BEGIN_M, R_START_M],
    // R_CW_BEGIN_M
    [R_START | DIR_CW, R_CW_BEGIN_M, R_START_M, R_START_M],
    // R_CCW_BEGIN_M
    [R_START | DIR_CCW, R_START_M, R_CCW_BEGIN_M, R_START_M],
];

/// Quadrature state machine with a single slot direction latch.
///
/// A completed step overwrites a direction that has not been consumed yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuadratureDecoder {
    mode: EncoderMode,
    state: u8,
    pending: Direction,
}

impl Default for QuadratureDecoder {
    fn default() -> Self {
        Self::new(EncoderMode::FullStep)
    }
}

impl QuadratureDecoder {
    pub const fn new(mode: EncoderMode) -> Self {
        Self {
            mode,
            state: R_START,
            pending: Direction::None,
        }
    }

    /// Advance with one contact sample, `true` = contact closed.
    ///
    /// Returns the direction of a step completed by this sample.
    pub fn process_tick(&mut self, a: bool, b: bool) -> Direction {
        let sample = ((a as usize) << 1) | b as usize;
        let current = (self.state & STATE_MASK) as usize;
        // Unknown states restart from rest
        let entry = match self.mode {
            EncoderMode::FullStep => FULL_STEP_TABLE.get(current).map(|row| row[sample]),
            EncoderMode::HalfStep => HALF_STEP_TABLE.get(current).map(|row| row[sample]),
        }
        .unwrap_or(R_START);
        self.state = entry;

        let direction = match entry & (DIR_CW | DIR_CCW) {
            DIR_CW => Direction::Clockwise,
            DIR_CCW => Direction::CounterClockwise,
            _ => Direction::None,
        };
        if direction != Direction::None {
            self.pending = direction;
        }
        direction
    }

    /// Take the latched direction, leaving `Direction::None`
    pub fn consume_direction(&mut self) -> Direction {
        core::mem::take(&mut self.pending)
    }

    pub fn mode(&self) -> EncoderMode {
        self.mode
    }
}

/// Holds both [`InputPin`](https://docs.rs/embedded-hal/latest/embedded_hal/digital/trait.InputPin.html)s and the decoder
pub struct RotaryEncoder<A, B> {
    pin_a: A,
    pin_b: B,
    /// Contacts close to ground
    low_active: bool,
    decoder: QuadratureDecoder,
}

impl<A: InputPin, B: InputPin> RotaryEncoder<A, B> {
    pub fn new(pin_a: A, pin_b: B, mode: EncoderMode, low_active: bool) -> Self {
        Self {
            pin_a,
            pin_b,
            low_active,
            decoder: QuadratureDecoder::new(mode),
        }
    }

    pub fn with_config(pin_a: A, pin_b: B, config: &EncoderConfig) -> Self {
        Self::new(pin_a, pin_b, config.mode, config.low_active)
    }

    /// Sample both pins and advance the decoder. A failed read skips the sample.
    pub fn update(&mut self) -> Direction {
        let (a, b) = match (self.pin_a.is_high(), self.pin_b.is_high()) {
            (Ok(a), Ok(b)) => (a, b),
            _ => return Direction::None,
        };
        // Contact closed levels
        let (a, b) = if self.low_active { (!a, !b) } else { (a, b) };
        let direction = self.decoder.process_tick(a, b);
        if direction != Direction::None {
            debug!("Encoder step: {:?}", direction);
        }
        direction
    }

    /// Take the latched direction
    pub fn consume_direction(&mut self) -> Direction {
        self.decoder.consume_direction()
    }

    pub fn decoder(&self) -> &QuadratureDecoder {
        &self.decoder
    }

    /// Consumes this encoder, returning the underlying pins `A` and `B`.
    pub fn into_inner(self) -> (A, B) {
        (self.pin_a, self.pin_b)
    }
}

#[cfg(test)]
mod test {
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    use super::*;

    const CW_SEQUENCE: [(bool, bool); 4] = [(true, false), (true, true), (false, true), (false, false)];
    const CCW_SEQUENCE: [(bool, bool); 4] = [(false, true), (true, true), (true, false), (false, false)];

    fn feed(decoder: &mut QuadratureDecoder, samples: &[(bool, bool)]) -> Vec<Direction> {
        samples
            .iter()
            .map(|(a, b)| decoder.process_tick(*a, *b))
            .filter(|d| *d != Direction::None)
            .collect()
    }

    #[test]
    fn test_full_step_clockwise() {
        let mut decoder = QuadratureDecoder::new(EncoderMode::FullStep);
        assert_eq!(decoder.process_tick(true, false), Direction::None);
        assert_eq!(decoder.process_tick(true, true), Direction::None);
        assert_eq!(decoder.process_tick(false, true), Direction::None);
        assert_eq!(decoder.process_tick(false, false), Direction::Clockwise);
        assert_eq!(decoder.consume_direction(), Direction::Clockwise);
        assert_eq!(decoder.consume_direction(), Direction::None);
    }

    #[test]
    fn test_full_step_counter_clockwise() {
        let mut decoder = QuadratureDecoder::default();
        assert_eq!(feed(&mut decoder, &CCW_SEQUENCE), [Direction::CounterClockwise]);
        assert_eq!(decoder.consume_direction(), Direction::CounterClockwise);
    }

    #[test]
    fn test_half_step() {
        let mut decoder = QuadratureDecoder::new(EncoderMode::HalfStep);
        assert_eq!(feed(&mut decoder, &CW_SEQUENCE), [Direction::Clockwise, Direction::Clockwise]);
        assert_eq!(
            feed(&mut decoder, &CCW_SEQUENCE),
            [Direction::CounterClockwise, Direction::CounterClockwise]
        );
    }

    #[test]
    fn test_contact_bounce_does_not_step() {
        let mut decoder = QuadratureDecoder::default();
        // Chatter on the first contact, then a clean step
        let samples = [
            (true, false),
            (false, false),
            (true, false),
            (false, false),
            (true, false),
            (true, true),
            (true, false),
            (true, true),
            (false, true),
            (false, false),
        ];
        assert_eq!(feed(&mut decoder, &samples), [Direction::Clockwise]);
    }

    #[test]
    fn test_oscillation_between_phases_never_steps() {
        let oscillation: Vec<(bool, bool)> = (0..20)
            .map(|i| if i % 2 == 0 { (true, true) } else { (false, true) })
            .collect();

        // From rest, and halfway through a clockwise step
        for lead_in in [&[][..], &[(true, false)][..]] {
            let mut decoder = QuadratureDecoder::new(EncoderMode::FullStep);
            assert!(feed(&mut decoder, lead_in).is_empty());
            assert!(feed(&mut decoder, &oscillation).is_empty());
            assert_eq!(decoder.consume_direction(), Direction::None);
        }

        // Half step: sitting on the middle detent after one half step
        let mut decoder = QuadratureDecoder::new(EncoderMode::HalfStep);
        assert_eq!(feed(&mut decoder, &[(true, false), (true, true)]), [Direction::Clockwise]);
        assert_eq!(decoder.consume_direction(), Direction::Clockwise);
        assert!(feed(&mut decoder, &oscillation).is_empty());
        assert_eq!(decoder.consume_direction(), Direction::None);
    }

    #[test]
    fn test_half_step_contact_bounce() {
        let mut decoder = QuadratureDecoder::new(EncoderMode::HalfStep);
        // Chatter on the first contact at rest
        let chatter = [(true, false), (false, false), (true, false), (false, false)];
        assert!(feed(&mut decoder, &chatter).is_empty());
        // Chatter on the second contact at the middle detent
        assert_eq!(feed(&mut decoder, &[(true, false), (true, true)]), [Direction::Clockwise]);
        let chatter = [(true, false), (true, true), (true, false), (true, true)];
        assert!(feed(&mut decoder, &chatter).is_empty());
        decoder.consume_direction();
        assert_eq!(decoder.consume_direction(), Direction::None);
    }

    #[test]
    fn test_invalid_jump_restarts() {
        let mut decoder = QuadratureDecoder::default();
        // Both contacts flipping at once never completes a step
        let samples = [(true, true), (false, false), (true, true), (false, false)];
        assert!(feed(&mut decoder, &samples).is_empty());
        assert_eq!(decoder.consume_direction(), Direction::None);
    }

    #[test]
    fn test_most_recent_direction_wins() {
        let mut decoder = QuadratureDecoder::default();
        feed(&mut decoder, &CW_SEQUENCE);
        feed(&mut decoder, &CCW_SEQUENCE);
        assert_eq!(decoder.consume_direction(), Direction::CounterClockwise);
        assert_eq!(decoder.consume_direction(), Direction::None);
    }

    #[test]
    fn test_encoder_pins_low_active() {
        // Clockwise step on pull-up contacts
        let levels = [
            (State::Low, State::High),
            (State::Low, State::Low),
            (State::High, State::Low),
            (State::High, State::High),
        ];
        let pin_a = PinMock::new(&levels.iter().map(|(a, _)| Transaction::get(*a)).collect::<Vec<_>>());
        let pin_b = PinMock::new(&levels.iter().map(|(_, b)| Transaction::get(*b)).collect::<Vec<_>>());
        let mut encoder = RotaryEncoder::new(pin_a, pin_b, EncoderMode::FullStep, true);

        let directions: Vec<Direction> = (0..4).map(|_| encoder.update()).collect();
        assert_eq!(
            directions,
            [Direction::None, Direction::None, Direction::None, Direction::Clockwise]
        );
        assert_eq!(encoder.consume_direction(), Direction::Clockwise);

        let (mut pin_a, mut pin_b) = encoder.into_inner();
        pin_a.done();
        pin_b.done();
    }

    #[test]
    fn test_encoder_read_error_skips_sample() {
        let pin_a = PinMock::new(&[Transaction::get(State::High).with_error(embedded_hal_mock::eh1::MockError::Io(std::io::ErrorKind::Other))]);
        let pin_b = PinMock::new(&[Transaction::get(State::High)]);
        let mut encoder = RotaryEncoder::new(pin_a, pin_b, EncoderMode::FullStep, false);
        assert_eq!(encoder.update(), Direction::None);
        assert_eq!(encoder.consume_direction(), Direction::None);

        let (mut pin_a, mut pin_b) = encoder.into_inner();
        pin_a.done();
        pin_b.done();
    }
}
