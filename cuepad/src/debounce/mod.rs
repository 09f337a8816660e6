//! Debounce engine.
//!
//! [`Debouncer`] samples every button pin on a periodic tick and runs one
//! [`InputChannel`] per pin. Debounced states are published to a
//! [`ButtonStates`] table that the main loop reads concurrently.

use core::sync::atomic::{AtomicBool, Ordering};

use embassy_time::{Duration, Ticker};
use embedded_hal::digital::InputPin;

pub use self::channel::InputChannel;
use crate::config::{ConfigError, DebounceConfig};

mod channel;

/// Largest button table addressable by [`ButtonId`]
pub const MAX_BUTTONS: usize = u8::MAX as usize + 1;

/// Index of a button in the button table
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonId(pub u8);

impl ButtonId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Read access to debounced button states
pub trait ButtonSource {
    /// Number of buttons
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clean, debounced state of a button. Unknown buttons read as released.
    fn is_pressed(&self, button: ButtonId) -> bool;
}

/// Debounced states shared between the tick path and the main loop.
///
/// Each entry is a single atomic flag, so readers never observe a torn state.
pub struct ButtonStates<const N: usize> {
    pressed: [AtomicBool; N],
}

impl<const N: usize> Default for ButtonStates<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> ButtonStates<N> {
    pub const fn new() -> Self {
        Self {
            pressed: [const { AtomicBool::new(false) }; N],
        }
    }

    /// Store the debounced state of a button
    pub fn publish(&self, button: ButtonId, pressed: bool) {
        if let Some(state) = self.pressed.get(button.index()) {
            state.store(pressed, Ordering::Release);
        }
    }

    /// Copy of all states
    pub fn snapshot(&self) -> [bool; N] {
        core::array::from_fn(|i| self.pressed[i].load(Ordering::Acquire))
    }
}

impl<const N: usize> ButtonSource for ButtonStates<N> {
    fn len(&self) -> usize {
        N
    }

    fn is_pressed(&self, button: ButtonId) -> bool {
        self.pressed
            .get(button.index())
            .is_some_and(|state| state.load(Ordering::Acquire))
    }
}

/// Samples `N` button pins and debounces them
pub struct Debouncer<'a, P: InputPin, const N: usize> {
    pins: [P; N],
    channels: [InputChannel; N],
    states: &'a ButtonStates<N>,
    /// Pin reads that failed since start
    read_errors: u32,
}

impl<'a, P: InputPin, const N: usize> Debouncer<'a, P, N> {
    pub fn new(pins: [P; N], config: &DebounceConfig, states: &'a ButtonStates<N>) -> Result<Self, ConfigError> {
        const { assert!(N <= MAX_BUTTONS, "button ids are u8") };
        config.validate()?;
        let channels = [InputChannel::new(config.threshold, config.polarity); N];
        for id in 0..N {
            states.publish(ButtonId(id as u8), false);
        }
        Ok(Self {
            pins,
            channels,
            states,
            read_errors: 0,
        })
    }

    /// Read every pin once and advance its channel by one tick
    pub fn sample_all(&mut self) {
        for (id, (pin, channel)) in self.pins.iter_mut().zip(self.channels.iter_mut()).enumerate() {
            let level = match pin.is_high() {
                Ok(level) => level,
                Err(_) => {
                    // Treated as an unchanged level
                    self.read_errors = self.read_errors.saturating_add(1);
                    continue;
                }
            };
            let faults = channel.polarity_faults();
            if channel.process(level) {
                trace!("Button {} debounced, pressed: {}", id, channel.is_pressed());
                self.states.publish(ButtonId(id as u8), channel.is_pressed());
            }
            if channel.polarity_faults() != faults {
                warn!("Button {} toggled away from its settled level", id);
            }
        }
    }

    /// Debounced state of a button, taken from the shared table
    pub fn is_pressed(&self, button: ButtonId) -> bool {
        self.states.is_pressed(button)
    }

    pub fn channel(&self, button: ButtonId) -> Option<&InputChannel> {
        self.channels.get(button.index())
    }

    pub fn read_errors(&self) -> u32 {
        self.read_errors
    }

    /// Consumes the debouncer, returning the pins
    pub fn into_inner(self) -> [P; N] {
        self.pins
    }
}

/// Periodic tick loop of the debounce engine, never returns
pub async fn run_debouncer<P: InputPin, const N: usize>(debouncer: &mut Debouncer<'_, P, N>, tick: Duration) -> ! {
    info!("Debouncer started, {} buttons, tick {}ms", N, tick.as_millis());
    let mut ticker = Ticker::every(tick);
    loop {
        ticker.next().await;
        debouncer.sample_all();
    }
}

#[cfg(test)]
mod test {
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction};

    use super::*;
    use crate::config::Polarity;

    #[ctor::ctor]
    fn init_log() {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    }

    fn config(threshold: u8) -> DebounceConfig {
        DebounceConfig {
            threshold,
            tick: Duration::from_millis(10),
            polarity: Polarity::ActiveLow,
        }
    }

    fn expect(states: &[State]) -> Vec<Transaction> {
        states.iter().map(|s| Transaction::get(*s)).collect()
    }

    #[test]
    fn test_button_states() {
        let states: ButtonStates<3> = ButtonStates::new();
        assert_eq!(states.len(), 3);
        states.publish(ButtonId(1), true);
        assert!(states.is_pressed(ButtonId(1)));
        assert!(!states.is_pressed(ButtonId(0)));
        // Out of range is ignored and reads released
        states.publish(ButtonId(7), true);
        assert!(!states.is_pressed(ButtonId(7)));
        assert_eq!(states.snapshot(), [false, true, false]);
    }

    /// Pin resting at the pulled-up idle level
    struct IdlePin;

    impl embedded_hal::digital::ErrorType for IdlePin {
        type Error = core::convert::Infallible;
    }

    impl InputPin for IdlePin {
        fn is_high(&mut self) -> Result<bool, Self::Error> {
            Ok(true)
        }

        fn is_low(&mut self) -> Result<bool, Self::Error> {
            Ok(false)
        }
    }

    #[test]
    fn test_full_id_range() {
        let states: ButtonStates<MAX_BUTTONS> = ButtonStates::new();
        let pins: [IdlePin; MAX_BUTTONS] = core::array::from_fn(|_| IdlePin);
        let mut debouncer = Debouncer::new(pins, &config(1), &states).unwrap();
        // Every id maps to its own entry
        for id in 0..MAX_BUTTONS {
            states.publish(ButtonId(id as u8), true);
        }
        debouncer.sample_all();
        let last = ButtonId(u8::MAX);
        assert!(debouncer.channel(last).is_some());
        assert!(states.snapshot().iter().all(|pressed| *pressed));
    }

    #[test]
    fn test_zero_threshold() {
        let states: ButtonStates<1> = ButtonStates::new();
        let pin = PinMock::new(&[]);
        let result = Debouncer::new([pin.clone()], &config(0), &states);
        assert!(matches!(result, Err(ConfigError::ZeroDebounceThreshold)));
        pin.clone().done();
    }

    #[test]
    fn test_sample_all_publishes_press() {
        let states: ButtonStates<2> = ButtonStates::new();
        // Button 0 pressed, button 1 idle
        let pin0 = PinMock::new(&expect(&[State::Low; 4]));
        let pin1 = PinMock::new(&expect(&[State::High; 4]));
        let mut debouncer = Debouncer::new([pin0, pin1], &config(2), &states).unwrap();

        for _ in 0..3 {
            debouncer.sample_all();
            assert!(!debouncer.is_pressed(ButtonId(0)));
        }
        debouncer.sample_all();
        assert!(debouncer.is_pressed(ButtonId(0)));
        assert!(states.is_pressed(ButtonId(0)));
        assert!(!states.is_pressed(ButtonId(1)));

        for mut pin in debouncer.into_inner() {
            pin.done();
        }
    }

    #[test]
    fn test_read_error_keeps_state() {
        let states: ButtonStates<1> = ButtonStates::new();
        let pin = PinMock::new(&[
            Transaction::get(State::Low),
            Transaction::get(State::Low).with_error(embedded_hal_mock::eh1::MockError::Io(std::io::ErrorKind::Other)),
            Transaction::get(State::Low),
            Transaction::get(State::Low),
        ]);
        let mut debouncer = Debouncer::new([pin], &config(1), &states).unwrap();

        for _ in 0..3 {
            debouncer.sample_all();
        }
        assert!(!debouncer.is_pressed(ButtonId(0)));
        debouncer.sample_all();
        assert!(debouncer.is_pressed(ButtonId(0)));
        assert_eq!(debouncer.read_errors(), 1);

        for mut pin in debouncer.into_inner() {
            pin.done();
        }
    }
}
