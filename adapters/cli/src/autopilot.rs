//! Scripted input source that plays the level without a human.

use revert_core::WorldPoint;
use revert_system_input::{InputEvent, Key, MouseButton};
use revert_world::{query, Actor, World};

/// Horizontal distance at which the autopilot stops walking and shoots.
const FIRING_DISTANCE: i32 = 96;
/// Frames between shots.
const FIRE_INTERVAL: u32 = 6;
/// Frames between attack mode changes.
const MODE_INTERVAL: u64 = 400;

/// Walks toward the nearest enemy, jumps when stuck, and fires when close.
#[derive(Clone, Debug, Default)]
pub(crate) struct Autopilot {
    last_position: Option<WorldPoint>,
    cooldown: u32,
}

impl Autopilot {
    /// Input events to deliver before simulating `frame`.
    pub(crate) fn plan(&mut self, world: &World, frame: u64) -> Vec<InputEvent> {
        let mut events = Vec::new();
        self.cooldown = self.cooldown.saturating_sub(1);

        if frame > 0 && frame % MODE_INTERVAL == 0 {
            events.push(InputEvent::KeyReleased(Key::Shift));
        }

        let player = query::player(world);
        let position = player.position();
        let stuck = self.last_position == Some(position) && !player.body().is_still();
        self.last_position = Some(position);

        let Some(dx) = nearest_enemy_offset(world, position) else {
            events.push(InputEvent::KeyPressed(Key::Down));
            return events;
        };

        let toward = if dx < 0 { Key::Left } else { Key::Right };
        if dx.abs() > FIRING_DISTANCE {
            events.push(InputEvent::KeyPressed(toward));
            if stuck {
                events.push(InputEvent::KeyPressed(Key::Up));
            }
            return events;
        }

        events.push(InputEvent::KeyPressed(toward));
        events.push(InputEvent::KeyPressed(Key::Down));
        if self.cooldown == 0 {
            events.push(InputEvent::MouseReleased(MouseButton::Primary));
            self.cooldown = FIRE_INTERVAL;
        }
        events
    }
}

fn nearest_enemy_offset(world: &World, from: WorldPoint) -> Option<i32> {
    query::enemies(world)
        .filter(|enemy| enemy.is_alive())
        .map(|enemy| enemy.position().x - from.x)
        .min_by_key(|dx| dx.abs())
}
