use crate::config::Polarity;

/// Debounce state machine of one physical button.
///
/// The channel counts consecutive ticks at the same raw level. Once the level
/// has been stable for more than `threshold` ticks the debounced level
/// toggles, exactly once per stable period. The debounced level starts at the
/// idle level of the configured [`Polarity`], the pressed state is read
/// through that polarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputChannel {
    /// Raw level seen on the previous tick
    last_level: bool,
    /// Ticks the raw level has been stable
    counter: u8,
    threshold: u8,
    /// Toggled once per stable period, seeded with the idle level
    debounced_level: bool,
    /// The current stable period has already been acted on
    action_taken: bool,
    polarity: Polarity,
    /// Toggles that left the debounced level different from the settled raw level
    polarity_faults: u16,
}

impl InputChannel {
    /// A released channel resting at the idle level of `polarity`
    pub const fn new(threshold: u8, polarity: Polarity) -> Self {
        Self {
            last_level: polarity.idle_level(),
            counter: 0,
            threshold,
            debounced_level: polarity.idle_level(),
            action_taken: true,
            polarity,
            polarity_faults: 0,
        }
    }

    /// Advance one tick with the sampled raw level (`true` = high).
    ///
    /// Returns `true` when the debounced state toggled on this tick.
    pub fn process(&mut self, level: bool) -> bool {
        let mut toggled = false;
        if level != self.last_level {
            self.counter = 0;
            self.action_taken = false;
        } else if !self.action_taken {
            if self.counter >= self.threshold {
                self.action_taken = true;
                self.debounced_level = !self.debounced_level;
                toggled = true;
                if self.debounced_level != level {
                    // Settled back on the level that was already reported
                    self.polarity_faults = self.polarity_faults.saturating_add(1);
                }
            } else {
                self.counter += 1;
            }
        }
        self.last_level = level;
        toggled
    }

    /// Debounced state
    pub const fn is_pressed(&self) -> bool {
        self.polarity.is_active(self.debounced_level)
    }

    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Number of toggles that disagreed with the settled raw level
    pub const fn polarity_faults(&self) -> u16 {
        self.polarity_faults
    }
}
