//! # Keyboard Input
//!
//! A platform-neutral key model. Hosts translate their windowing system's
//! key events into [`KeyEvent`] and queue them on a [`KeyboardState`];
//! components drain the queue once per frame.

use std::collections::VecDeque;

/// Maximum number of queued keyboard events.
///
/// Older events are dropped first when a burst of key repeats outpaces the
/// frame loop.
const KEEP_EVENTS_COUNT: usize = 10;

/// Keys that components react to by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NamedKey {
    /// Home.
    Home,
    /// End.
    End,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Enter / Return.
    Enter,
    /// Escape.
    Escape,
    /// Tab.
    Tab,
    /// A printable character.
    Character(char),
    /// Anything else the host reports.
    Other(String),
}

/// Modifier keys held during a key press.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Shift.
    pub shift: bool,
    /// Control.
    pub control: bool,
    /// Alt / Option.
    pub alt: bool,
    /// Super / Command.
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Only shift held.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };
}

/// A single key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub key: NamedKey,
    /// Modifier state at the time of the press.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// A key press without modifiers.
    pub fn new(key: NamedKey) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    /// A key press with the given modifiers.
    pub fn with_modifiers(key: NamedKey, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }
}

/// Bounded FIFO of pending key presses.
#[derive(Default, Debug)]
pub struct KeyboardState {
    events: VecDeque<KeyEvent>,
}

impl KeyboardState {
    /// Queues a key press, dropping the oldest one past
    /// [`KEEP_EVENTS_COUNT`].
    pub fn push_event(&mut self, event: KeyEvent) {
        self.events.push_back(event);
        if self.events.len() > KEEP_EVENTS_COUNT {
            self.events.pop_front();
        }
    }

    /// Drains all queued events, oldest first.
    pub fn take_events(&mut self) -> Vec<KeyEvent> {
        self.events.drain(..).collect()
    }

    /// Returns `true` if no events are queued.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_keeps_only_the_most_recent_events() {
        let mut state = KeyboardState::default();
        for i in 0..15 {
            let c = char::from_digit(i % 10, 10).unwrap_or('x');
            state.push_event(KeyEvent::new(NamedKey::Character(c)));
        }
        let events = state.take_events();
        assert_eq!(events.len(), KEEP_EVENTS_COUNT);
        assert_eq!(events[0].key, NamedKey::Character('5'));
        assert!(state.is_empty());
    }
}
