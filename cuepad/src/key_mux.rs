//! Key multiplexer.
//!
//! Turns debounced press edges into pending actions. Every binding is a single
//! slot mailbox: an edge sets its pending flag, the dispatcher clears it when
//! the action is taken. Bindings are scanned in table order, so a lower index
//! wins when several are pending at once.

use cuepad_types::action::KeyAction;

use crate::config::ConfigError;
use crate::debounce::{ButtonId, ButtonSource};

/// When a binding fires
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriggerMode {
    /// Transition from released to pressed
    #[default]
    OnPress,
}

/// Binding between a button and the action it emits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyBinding {
    button: ButtonId,
    trigger: TriggerMode,
    action: KeyAction,
    /// Debounced state seen on the previous update, `None` before the first one
    last: Option<bool>,
    pending: bool,
}

impl KeyBinding {
    pub const fn on_press(button: ButtonId, action: KeyAction) -> Self {
        Self {
            button,
            trigger: TriggerMode::OnPress,
            action,
            last: None,
            pending: false,
        }
    }

    pub const fn button(&self) -> ButtonId {
        self.button
    }

    pub const fn trigger(&self) -> TriggerMode {
        self.trigger
    }

    pub const fn action(&self) -> KeyAction {
        self.action
    }

    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Record the current state, returns whether the binding fired
    fn observe(&mut self, pressed: bool) -> bool {
        let fired = match self.trigger {
            TriggerMode::OnPress => self.last == Some(false) && pressed,
        };
        if fired {
            self.pending = true;
        }
        self.last = Some(pressed);
        fired
    }
}

/// Source of pending actions for the report dispatcher
pub trait PendingActions {
    /// Take and clear the first pending action in priority order
    fn take_pending_action(&mut self) -> Option<KeyAction>;
}

/// Key multiplexer over `N` bindings reading debounced states from `B`
pub struct KeyMux<'a, const N: usize, B: ButtonSource> {
    source: &'a B,
    bindings: [KeyBinding; N],
}

impl<'a, const N: usize, B: ButtonSource> KeyMux<'a, N, B> {
    pub fn new(source: &'a B, bindings: [KeyBinding; N]) -> Result<Self, ConfigError> {
        for (i, binding) in bindings.iter().enumerate() {
            if binding.button.index() >= source.len() {
                error!("Binding {} refers to button {} out of {}", i, binding.button.0, source.len());
                return Err(ConfigError::ButtonOutOfRange {
                    button: binding.button.0,
                    buttons: source.len(),
                });
            }
            if bindings[..i].iter().any(|b| b.button == binding.button) {
                error!("Button {} is bound twice", binding.button.0);
                return Err(ConfigError::DuplicateBinding {
                    button: binding.button.0,
                });
            }
        }
        Ok(Self { source, bindings })
    }

    /// Read every bound button and latch press edges
    pub fn update(&mut self) {
        for binding in self.bindings.iter_mut() {
            if binding.observe(self.source.is_pressed(binding.button)) {
                debug!("Button {} pressed, pending {:?}", binding.button.0, binding.action);
            }
        }
    }

    pub fn bindings(&self) -> &[KeyBinding; N] {
        &self.bindings
    }

    pub fn has_pending(&self) -> bool {
        self.bindings.iter().any(|b| b.pending)
    }
}

impl<const N: usize, B: ButtonSource> PendingActions for KeyMux<'_, N, B> {
    fn take_pending_action(&mut self) -> Option<KeyAction> {
        let binding = self.bindings.iter_mut().find(|b| b.pending)?;
        binding.pending = false;
        Some(binding.action)
    }
}
