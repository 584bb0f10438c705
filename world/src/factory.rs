//! Enemy wave and bullet construction.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use revert_core::{ActorId, AttackMode, EnemyKind, Facing, TileCoord, WorldPoint};

use crate::{
    actors::{Bullet, Enemy},
    behavior::{Behavior, NullBehavior, PursuitBehavior},
    config::{BulletConfig, EnemyConfig},
    jumper::{BodySpec, MovementController},
    tiles::TileMap,
};

/// Layout descriptor for one enemy of a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveSlot {
    /// Horizontal foot position.
    pub x: i32,
    /// Vertical foot position.
    pub y: i32,
    /// Enemy kind to instantiate.
    pub kind: EnemyKind,
}

/// Builds enemy waves from the level's spawn points.
#[derive(Clone, Debug)]
pub struct EnemyFactory {
    spawn_points: Vec<TileCoord>,
    tile_width: i32,
    tile_height: i32,
    config: EnemyConfig,
    rng: ChaCha8Rng,
}

impl EnemyFactory {
    /// Creates a factory for the spawn points of `map`.
    #[must_use]
    pub fn new(map: &TileMap, config: EnemyConfig, seed: u64) -> Self {
        Self {
            spawn_points: map.spawn_points().to_vec(),
            tile_width: map.tile_width(),
            tile_height: map.tile_height(),
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generates `count` layout descriptors.
    ///
    /// Each enemy stands on the tile below a randomly chosen spawn point,
    /// jittered horizontally inside the spawn tile. Without spawn points the
    /// wave is empty.
    pub fn create_wave(&mut self, count: usize) -> Vec<WaveSlot> {
        if self.spawn_points.is_empty() {
            return Vec::new();
        }

        let jitter = self.tile_width / 4;
        (0..count)
            .map(|_| {
                let point = self.spawn_points[self.rng.gen_range(0..self.spawn_points.len())];
                let offset = if jitter > 0 {
                    self.rng.gen_range(-jitter..=jitter)
                } else {
                    0
                };
                let kinds = EnemyKind::ALL.len() as u32;
                let kind = EnemyKind::from_index(self.rng.gen_range(0..kinds));
                WaveSlot {
                    x: point.column() * self.tile_width + self.tile_width / 2 + offset,
                    y: (point.row() + 1) * self.tile_height,
                    kind,
                }
            })
            .collect()
    }

    /// Constructs an enemy of the given kind at the map origin.
    #[must_use]
    pub fn instantiate(&self, id: ActorId, kind: EnemyKind, map: &TileMap) -> Enemy {
        let spec = BodySpec::new(self.config.width, self.config.height, self.config.move_size);
        let body = MovementController::new(spec, WorldPoint::default(), map);
        let (health, behavior): (u32, Box<dyn Behavior>) = match kind {
            EnemyKind::Idle => (self.config.idle_health, Box::new(NullBehavior)),
            EnemyKind::Pursuer => (
                self.config.pursuer_health,
                Box::new(PursuitBehavior::new(
                    self.config.view_range,
                    self.config.aggress_range,
                    self.config.damage,
                    self.config.cooldown_frames,
                )),
            ),
        };
        Enemy::new(id, kind, body, health, behavior)
    }
}

/// Builds bullets fired by the player.
#[derive(Clone, Debug)]
pub struct BulletFactory {
    config: BulletConfig,
}

impl BulletFactory {
    /// Creates a factory using the per-mode bullet parameters.
    #[must_use]
    pub const fn new(config: BulletConfig) -> Self {
        Self { config }
    }

    /// Spawns a bullet travelling horizontally in `direction`.
    #[must_use]
    pub fn spawn_bullet(
        &self,
        id: ActorId,
        origin: WorldPoint,
        direction: Facing,
        mode: AttackMode,
    ) -> Bullet {
        let parameters = self.config.mode(mode);
        Bullet::new(id, origin, direction.sign() * parameters.speed, 0, parameters.damage)
    }
}
