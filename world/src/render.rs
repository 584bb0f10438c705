//! Read-only drawing contract shared with the render thread.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use revert_core::{ActorId, ActorRole, Facing, Pose, WorldPoint};

use crate::{
    actors::{Actor, Bullet},
    jumper::MovementController,
    tiles::{Camera, TileMap},
};

/// Everything a presentation needs to draw one actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sprite {
    /// Actor being drawn.
    pub actor: ActorId,
    /// Role of the actor.
    pub role: ActorRole,
    /// Foot position for bodies, centre for bullets.
    pub position: WorldPoint,
    /// Direction the sprite faces; left facing sprites are mirrored.
    pub facing: Facing,
    /// Animation to show.
    pub pose: Pose,
    /// Frame within the animation.
    pub frame: u32,
}

impl Sprite {
    pub(crate) const fn of_body(
        actor: ActorId,
        role: ActorRole,
        body: &MovementController,
    ) -> Self {
        Self {
            actor,
            role,
            position: body.position(),
            facing: body.facing(),
            pose: body.pose(),
            frame: body.frame(),
        }
    }
}

/// Drawing surface implemented by presentation adapters.
pub trait Presentation {
    /// Draws the level geometry as seen by the camera.
    fn draw_level(&mut self, map: &TileMap, camera: Camera);

    /// Draws a single actor.
    fn draw_sprite(&mut self, sprite: &Sprite);
}

/// Render-ready copy of the bodies in the world, refreshed after each update.
#[derive(Clone, Debug, Default)]
pub(crate) struct Stage {
    pub(crate) camera: Camera,
    pub(crate) player: Option<Sprite>,
    pub(crate) enemies: Vec<Sprite>,
}

/// Handle that lets another thread draw the world while it updates.
///
/// Bodies are read from the stage published at the end of the last update.
/// Bullets are read from the live sequence under the same lock the update's
/// bullet pass holds.
#[derive(Clone, Debug)]
pub struct RenderHandle {
    pub(crate) map: Arc<TileMap>,
    pub(crate) stage: Arc<Mutex<Stage>>,
    pub(crate) bullets: Arc<Mutex<Vec<Bullet>>>,
}

impl RenderHandle {
    /// Draws the level, the player, the enemies, and the bullets in that order.
    pub fn display(&self, presentation: &mut dyn Presentation) {
        let stage = lock(&self.stage).clone();
        presentation.draw_level(&self.map, stage.camera);
        if let Some(player) = &stage.player {
            presentation.draw_sprite(player);
        }
        for enemy in &stage.enemies {
            presentation.draw_sprite(enemy);
        }
        draw_bullets(&self.bullets, presentation);
    }

    /// Number of live bullets.
    #[must_use]
    pub fn bullet_count(&self) -> usize {
        lock(&self.bullets).len()
    }
}

pub(crate) fn draw_bullets(bullets: &Mutex<Vec<Bullet>>, presentation: &mut dyn Presentation) {
    let bullets = lock(bullets);
    for bullet in bullets.iter() {
        presentation.draw_sprite(&bullet.sprite());
    }
}

/// Acquires a lock, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        tracing::warn!("recovering state from a poisoned lock");
        PoisonError::into_inner(poisoned)
    })
}
