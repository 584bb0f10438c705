use std::sync::{Arc, Mutex};

use revert_core::{ModeRequest, Movement, Notification, NotificationKind, Subscriber};
use revert_system_input::{Controller, InputEvent, Key, MouseButton, INPUT_KINDS};

#[derive(Default)]
struct Sink {
    seen: Vec<Notification>,
}

impl Subscriber for Sink {
    fn notify(&mut self, notification: &Notification) {
        self.seen.push(notification.clone());
    }
}

#[test]
fn movement_keys_map_to_movement_requests() {
    let controller = Controller::new();
    let mut out = Vec::new();

    controller.handle(
        &[
            InputEvent::KeyPressed(Key::Left),
            InputEvent::KeyPressed(Key::D),
            InputEvent::KeyPressed(Key::W),
            InputEvent::KeyPressed(Key::S),
            InputEvent::KeyPressed(Key::Other),
        ],
        &mut out,
    );

    assert_eq!(
        out,
        vec![
            Notification::PlayerMovement(Movement::Left),
            Notification::PlayerMovement(Movement::Right),
            Notification::PlayerJump,
            Notification::PlayerMovement(Movement::Still),
        ]
    );
}

#[test]
fn inactive_controller_drops_movement_but_keeps_modes_and_fire() {
    let mut controller = Controller::new();
    controller.set_active(false);
    let mut out = Vec::new();

    controller.handle(
        &[
            InputEvent::KeyPressed(Key::Right),
            InputEvent::KeyPressed(Key::Up),
            InputEvent::KeyReleased(Key::Shift),
            InputEvent::MouseReleased(MouseButton::Primary),
        ],
        &mut out,
    );

    assert!(!controller.is_active());
    assert_eq!(
        out,
        vec![
            Notification::PlayerMode(ModeRequest::Next),
            Notification::PlayerAttack,
        ]
    );
}

#[test]
fn wheel_and_digits_select_attack_modes() {
    let controller = Controller::new();
    let mut out = Vec::new();

    controller.handle(
        &[
            InputEvent::Wheel(-3),
            InputEvent::Wheel(1),
            InputEvent::KeyReleased(Key::Digit(1)),
            InputEvent::KeyReleased(Key::Digit(2)),
        ],
        &mut out,
    );

    assert_eq!(
        out,
        vec![
            Notification::PlayerMode(ModeRequest::Previous),
            Notification::PlayerMode(ModeRequest::Next),
            Notification::PlayerMode(ModeRequest::Absolute(0)),
            Notification::PlayerMode(ModeRequest::Absolute(1)),
        ]
    );
}

#[test]
fn only_primary_release_fires() {
    let controller = Controller::new();
    assert_eq!(
        controller.translate(InputEvent::MouseReleased(MouseButton::Secondary)),
        None
    );
    assert_eq!(
        controller.translate(InputEvent::MouseReleased(MouseButton::Primary)),
        Some(Notification::PlayerAttack)
    );
}

#[test]
fn dispatch_reaches_listeners_before_the_target() {
    let mut controller = Controller::new();
    let listener = Arc::new(Mutex::new(Sink::default()));
    let fire_only = Arc::new(Mutex::new(Sink::default()));
    let _ = controller.subscribe(&INPUT_KINDS, Arc::clone(&listener));
    let _ = controller.subscribe(&[NotificationKind::PlayerAttack], Arc::clone(&fire_only));
    let mut target = Sink::default();

    assert!(controller.dispatch(InputEvent::KeyPressed(Key::A), &mut target));
    assert!(controller.dispatch(InputEvent::MouseReleased(MouseButton::Primary), &mut target));
    assert!(!controller.dispatch(InputEvent::KeyReleased(Key::A), &mut target));

    let expected = vec![
        Notification::PlayerMovement(Movement::Left),
        Notification::PlayerAttack,
    ];
    assert_eq!(target.seen, expected);
    assert_eq!(listener.lock().expect("lock").seen, expected);
    assert_eq!(
        fire_only.lock().expect("lock").seen,
        vec![Notification::PlayerAttack]
    );
}

#[test]
fn unsubscribed_listeners_stop_receiving() {
    let mut controller = Controller::new();
    let listener = Arc::new(Mutex::new(Sink::default()));
    let id = controller.subscribe(&INPUT_KINDS, Arc::clone(&listener));
    let mut target = Sink::default();

    assert!(controller.unsubscribe(id));
    assert!(controller.dispatch(InputEvent::KeyPressed(Key::Up), &mut target));
    assert!(listener.lock().expect("lock").seen.is_empty());
    assert_eq!(target.seen, vec![Notification::PlayerJump]);
}
