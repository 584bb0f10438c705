#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Input system that turns raw keyboard and mouse events into player notifications.

use revert_core::{
    ModeRequest, Movement, Notification, NotificationBus, NotificationKind, Subscriber,
    SubscriptionId,
};

/// Keyboard keys the controller understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Letter A.
    A,
    /// Letter D.
    D,
    /// Letter W.
    W,
    /// Letter S.
    S,
    /// Either shift key.
    Shift,
    /// Number row digit.
    Digit(u8),
    /// Any key without a binding.
    Other,
}

/// Mouse buttons the controller understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (usually left) button.
    Primary,
    /// Secondary (usually right) button.
    Secondary,
    /// Middle button.
    Middle,
}

/// Raw input event delivered by an adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// A key went down.
    KeyPressed(Key),
    /// A key went up.
    KeyReleased(Key),
    /// The wheel rotated; negative values scroll up.
    Wheel(i32),
    /// A mouse button went up.
    MouseReleased(MouseButton),
}

/// Notification kinds the controller publishes.
pub const INPUT_KINDS: [NotificationKind; 4] = NotificationKind::INPUT;

/// Translates input events and publishes the resulting notifications.
#[derive(Debug)]
pub struct Controller {
    active: bool,
    bus: NotificationBus,
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

impl Controller {
    /// Creates an active controller without listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: true,
            bus: NotificationBus::new(),
        }
    }

    /// Enables or disables movement input, e.g. while the game is paused.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Whether movement input is forwarded.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Registers an additional listener for input notifications.
    pub fn subscribe<S>(&mut self, kinds: &[NotificationKind], subscriber: S) -> SubscriptionId
    where
        S: Subscriber + Send + 'static,
    {
        self.bus.subscribe(kinds, subscriber)
    }

    /// Removes a listener.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Maps one event to the notification it requests, if any.
    #[must_use]
    pub fn translate(&self, event: InputEvent) -> Option<Notification> {
        match event {
            InputEvent::KeyPressed(key) if self.active => match key {
                Key::Left | Key::A => Some(Notification::PlayerMovement(Movement::Left)),
                Key::Right | Key::D => Some(Notification::PlayerMovement(Movement::Right)),
                Key::Up | Key::W => Some(Notification::PlayerJump),
                Key::Down | Key::S => Some(Notification::PlayerMovement(Movement::Still)),
                Key::Shift | Key::Digit(_) | Key::Other => None,
            },
            InputEvent::KeyPressed(_) => None,
            InputEvent::KeyReleased(Key::Shift) => {
                Some(Notification::PlayerMode(ModeRequest::Next))
            }
            InputEvent::KeyReleased(Key::Digit(digit @ 1..=3)) => Some(Notification::PlayerMode(
                ModeRequest::Absolute(i32::from(digit) - 1),
            )),
            InputEvent::KeyReleased(_) => None,
            InputEvent::Wheel(rotation) if rotation < 0 => {
                Some(Notification::PlayerMode(ModeRequest::Previous))
            }
            InputEvent::Wheel(rotation) if rotation > 0 => {
                Some(Notification::PlayerMode(ModeRequest::Next))
            }
            InputEvent::Wheel(_) => None,
            InputEvent::MouseReleased(MouseButton::Primary) => Some(Notification::PlayerAttack),
            InputEvent::MouseReleased(_) => None,
        }
    }

    /// Translates a batch of events, appending the notifications to `out`.
    pub fn handle(&self, events: &[InputEvent], out: &mut Vec<Notification>) {
        out.extend(events.iter().filter_map(|event| self.translate(*event)));
    }

    /// Translates `event` and delivers the notification to the listeners and then to `target`.
    ///
    /// Returns whether the event produced a notification.
    pub fn dispatch(&mut self, event: InputEvent, target: &mut dyn Subscriber) -> bool {
        let Some(notification) = self.translate(event) else {
            return false;
        };
        self.bus.publish(&notification, |_, _| {});
        target.notify(&notification);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_outside_the_mode_range_are_ignored() {
        let controller = Controller::new();
        assert_eq!(
            controller.translate(InputEvent::KeyReleased(Key::Digit(0))),
            None
        );
        assert_eq!(
            controller.translate(InputEvent::KeyReleased(Key::Digit(4))),
            None
        );
        assert_eq!(
            controller.translate(InputEvent::KeyReleased(Key::Digit(3))),
            Some(Notification::PlayerMode(ModeRequest::Absolute(2)))
        );
    }

    #[test]
    fn zero_wheel_rotation_does_nothing() {
        assert_eq!(Controller::new().translate(InputEvent::Wheel(0)), None);
    }

    #[test]
    fn pressing_mode_keys_does_nothing_until_release() {
        let controller = Controller::new();
        assert_eq!(controller.translate(InputEvent::KeyPressed(Key::Shift)), None);
        assert_eq!(
            controller.translate(InputEvent::KeyPressed(Key::Digit(1))),
            None
        );
    }
}
