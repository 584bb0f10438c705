//! Enemy behaviour contract and the stock behaviours.

use std::fmt;

use revert_core::{ActorId, Bounds, Facing, Movement, WorldPoint};

use crate::jumper::MovementController;

/// What an enemy observed about another actor this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sighting {
    /// Identifier of the observed actor.
    pub actor: ActorId,
    /// Foot position of the observed actor.
    pub position: WorldPoint,
    /// Hit box of the observed actor.
    pub bounds: Bounds,
}

/// Capability set every enemy behaviour provides.
///
/// The enemy owning the behaviour decides when each callback fires; the
/// behaviour only steers the enemy's body and reports attack damage. A
/// negative range disables the callbacks tied to it.
pub trait Behavior: fmt::Debug + Send {
    /// Called while the enemy touches its target. Returns the damage dealt, if any.
    fn attack(&mut self, body: &mut MovementController, target: &Sighting) -> Option<u32>;

    /// Called when the target moves inside [`Behavior::view_range`].
    fn on_entered_view(&mut self, body: &mut MovementController, target: &Sighting);

    /// Called when the target leaves [`Behavior::view_range`].
    fn on_exited_view(&mut self, body: &mut MovementController, target: &Sighting);

    /// Called every frame the target is within [`Behavior::aggress_range`].
    fn on_aggress(&mut self, body: &mut MovementController, target: &Sighting);

    /// Distance in pixels at which the target becomes visible.
    fn view_range(&self) -> f32;

    /// Distance in pixels at which the enemy engages the target.
    fn aggress_range(&self) -> f32;
}

/// Behaviour that does nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NullBehavior;

impl Behavior for NullBehavior {
    fn attack(&mut self, _body: &mut MovementController, _target: &Sighting) -> Option<u32> {
        None
    }

    fn on_entered_view(&mut self, _body: &mut MovementController, _target: &Sighting) {}

    fn on_exited_view(&mut self, _body: &mut MovementController, _target: &Sighting) {}

    fn on_aggress(&mut self, _body: &mut MovementController, _target: &Sighting) {}

    fn view_range(&self) -> f32 {
        -1.0
    }

    fn aggress_range(&self) -> f32 {
        -1.0
    }
}

/// Behaviour that turns toward the target on sight and walks to it when close.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PursuitBehavior {
    view_range: f32,
    aggress_range: f32,
    damage: u32,
    cooldown_frames: u32,
    cooldown: u32,
}

impl PursuitBehavior {
    /// Creates a pursuit behaviour.
    ///
    /// `cooldown_frames` is the number of touching frames skipped between strikes.
    #[must_use]
    pub const fn new(
        view_range: f32,
        aggress_range: f32,
        damage: u32,
        cooldown_frames: u32,
    ) -> Self {
        Self {
            view_range,
            aggress_range,
            damage,
            cooldown_frames,
            cooldown: 0,
        }
    }
}

impl Default for PursuitBehavior {
    fn default() -> Self {
        Self::new(160.0, 96.0, 1, 25)
    }
}

impl Behavior for PursuitBehavior {
    fn attack(&mut self, _body: &mut MovementController, _target: &Sighting) -> Option<u32> {
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return None;
        }
        self.cooldown = self.cooldown_frames;
        Some(self.damage)
    }

    fn on_entered_view(&mut self, body: &mut MovementController, target: &Sighting) {
        if target.position.x < body.position().x {
            body.face(Facing::Left);
        } else {
            body.face(Facing::Right);
        }
    }

    fn on_exited_view(&mut self, body: &mut MovementController, _target: &Sighting) {
        body.stay_still();
    }

    fn on_aggress(&mut self, body: &mut MovementController, target: &Sighting) {
        let dx = target.position.x - body.position().x;
        if dx.abs() <= body.spec().move_size {
            body.stay_still();
        } else if dx < 0 {
            body.request(Movement::Left);
        } else {
            body.request(Movement::Right);
        }
    }

    fn view_range(&self) -> f32 {
        self.view_range
    }

    fn aggress_range(&self) -> f32 {
        self.aggress_range
    }
}
