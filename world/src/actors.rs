//! Player, enemy and bullet actors.

use revert_core::{
    ActorId, ActorRole, AttackMode, Bounds, Clock, EnemyKind, Facing, ModeRequest, Notification,
    Pose, WorldPoint,
};

use crate::{
    behavior::{Behavior, Sighting},
    config::PlayerConfig,
    jumper::{BodySpec, MovementController},
    render::Sprite,
    tiles::TileMap,
};

/// Capabilities shared by every entity living in the world.
pub trait Actor {
    /// Identifier of the actor.
    fn id(&self) -> ActorId;

    /// Role the actor plays.
    fn role(&self) -> ActorRole;

    /// Whether the actor is still part of the simulation.
    fn is_alive(&self) -> bool;

    /// Foot position for bodies, centre for projectiles.
    fn position(&self) -> WorldPoint;

    /// Hit box of the actor.
    fn bounds(&self) -> Bounds;

    /// Applies a bullet strike. Returns `true` when the bullet connected.
    fn hit(&mut self, bullet: &Bullet) -> bool;

    /// Advances the actor by one frame.
    fn advance(&mut self, map: &TileMap, clock: &Clock);

    /// Drawing description for the render path.
    fn sprite(&self) -> Sprite;
}

/// Damage an enemy dealt to the actor it attacked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strike {
    /// Enemy that attacked.
    pub attacker: ActorId,
    /// Health removed from the target.
    pub damage: u32,
}

/// The player controlled actor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    body: MovementController,
    attack_mode: AttackMode,
    ammo: u32,
    health: u32,
    viewport_width: i32,
    viewport_height: i32,
}

impl Player {
    /// Places a new player on the floor of the configured start column.
    #[must_use]
    pub fn spawn(config: &PlayerConfig, map: &TileMap) -> Self {
        let x = config.start_column * map.tile_width() + map.tile_width() / 2;
        let foot = WorldPoint::new(x, map.find_floor(x));
        let spec = BodySpec::new(config.width, config.height, config.move_size);
        Self {
            body: MovementController::new(spec, foot, map),
            attack_mode: AttackMode::default(),
            ammo: config.ammo,
            health: config.health,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
        }
    }

    /// Movement controller of the player.
    #[must_use]
    pub const fn body(&self) -> &MovementController {
        &self.body
    }

    /// Mutable movement controller of the player.
    pub fn body_mut(&mut self) -> &mut MovementController {
        &mut self.body
    }

    /// Whether the player is mid-jump.
    #[must_use]
    pub fn is_jumping(&self) -> bool {
        self.body.is_jumping()
    }

    /// Selected attack mode.
    #[must_use]
    pub const fn attack_mode(&self) -> AttackMode {
        self.attack_mode
    }

    /// Applies an attack mode change, wrapping out of range requests.
    pub fn change_mode(&mut self, request: ModeRequest) {
        self.attack_mode = self.attack_mode.apply(request);
    }

    /// Remaining ammunition.
    #[must_use]
    pub const fn ammo(&self) -> u32 {
        self.ammo
    }

    /// Whether at least one round is left.
    #[must_use]
    pub const fn has_ammo(&self) -> bool {
        self.ammo > 0
    }

    /// Consumes one round. Returns `false` when the magazine was empty.
    pub fn spend_ammo(&mut self) -> bool {
        if self.ammo == 0 {
            return false;
        }
        self.ammo -= 1;
        true
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Removes health after an enemy strike.
    pub fn take_damage(&mut self, strike: Strike) {
        self.health = self.health.saturating_sub(strike.damage);
    }

    /// Point bullets are fired from.
    #[must_use]
    pub const fn muzzle(&self) -> WorldPoint {
        self.body.bounds().center()
    }

    /// Viewport centred on the player; bullets leaving it are discarded.
    #[must_use]
    pub const fn view_bounds(&self) -> Bounds {
        Bounds::centered(self.muzzle(), self.viewport_width, self.viewport_height)
    }
}

impl Actor for Player {
    fn id(&self) -> ActorId {
        ActorId::PLAYER
    }

    fn role(&self) -> ActorRole {
        ActorRole::Player
    }

    fn is_alive(&self) -> bool {
        self.health > 0
    }

    fn position(&self) -> WorldPoint {
        self.body.position()
    }

    fn bounds(&self) -> Bounds {
        self.body.bounds()
    }

    fn hit(&mut self, _bullet: &Bullet) -> bool {
        false
    }

    fn advance(&mut self, map: &TileMap, clock: &Clock) {
        self.body.advance(map, clock);
    }

    fn sprite(&self) -> Sprite {
        Sprite::of_body(ActorId::PLAYER, ActorRole::Player, &self.body)
    }
}

/// Hostile actor steered by a [`Behavior`].
#[derive(Debug)]
pub struct Enemy {
    id: ActorId,
    kind: EnemyKind,
    body: MovementController,
    health: u32,
    behavior: Box<dyn Behavior>,
    target_in_view: bool,
}

impl Enemy {
    /// Creates an enemy with the provided body and behaviour.
    #[must_use]
    pub fn new(
        id: ActorId,
        kind: EnemyKind,
        body: MovementController,
        health: u32,
        behavior: Box<dyn Behavior>,
    ) -> Self {
        Self {
            id,
            kind,
            body,
            health,
            behavior,
            target_in_view: false,
        }
    }

    /// Kind the enemy was generated as.
    #[must_use]
    pub const fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Movement controller of the enemy.
    #[must_use]
    pub const fn body(&self) -> &MovementController {
        &self.body
    }

    /// Whether the player is currently inside the view range.
    #[must_use]
    pub const fn target_in_view(&self) -> bool {
        self.target_in_view
    }

    /// Moves the enemy to a new foot position.
    pub fn place(&mut self, foot: WorldPoint, map: &TileMap) {
        self.body.place(foot, map);
    }

    /// Stops horizontal movement.
    pub fn stop(&mut self) {
        self.body.stay_still();
    }

    /// Marks the enemy dead.
    pub fn kill(&mut self) {
        self.health = 0;
    }

    /// Reacts to a world notification, returning a strike against the player if one landed.
    pub fn observe(&mut self, notification: &Notification) -> Option<Strike> {
        let Notification::ActorVisible {
            actor,
            role: ActorRole::Player,
            position,
            bounds,
        } = notification
        else {
            return None;
        };
        if !self.is_alive() {
            return None;
        }

        let target = Sighting {
            actor: *actor,
            position: *position,
            bounds: *bounds,
        };
        let distance = self.body.position().distance_to(target.position);

        let view_range = self.behavior.view_range();
        if view_range >= 0.0 {
            let in_view = distance <= view_range;
            if in_view && !self.target_in_view {
                self.behavior.on_entered_view(&mut self.body, &target);
            } else if !in_view && self.target_in_view {
                self.behavior.on_exited_view(&mut self.body, &target);
            }
            self.target_in_view = in_view;
        }

        let aggress_range = self.behavior.aggress_range();
        if aggress_range >= 0.0 && distance <= aggress_range {
            self.behavior.on_aggress(&mut self.body, &target);
        }

        if !self.body.bounds().intersects(&target.bounds) {
            return None;
        }
        self.behavior
            .attack(&mut self.body, &target)
            .map(|damage| Strike {
                attacker: self.id,
                damage,
            })
    }
}

impl Actor for Enemy {
    fn id(&self) -> ActorId {
        self.id
    }

    fn role(&self) -> ActorRole {
        ActorRole::Enemy(self.kind)
    }

    fn is_alive(&self) -> bool {
        self.health > 0
    }

    fn position(&self) -> WorldPoint {
        self.body.position()
    }

    fn bounds(&self) -> Bounds {
        self.body.bounds()
    }

    fn hit(&mut self, bullet: &Bullet) -> bool {
        if !self.is_alive() || !self.bounds().intersects(&bullet.bounds()) {
            return false;
        }
        self.health = self.health.saturating_sub(bullet.damage());
        true
    }

    fn advance(&mut self, map: &TileMap, clock: &Clock) {
        self.body.advance(map, clock);
    }

    fn sprite(&self) -> Sprite {
        Sprite::of_body(self.id, ActorRole::Enemy(self.kind), &self.body)
    }
}

/// Projectile fired by the player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bullet {
    id: ActorId,
    position: WorldPoint,
    path: Bounds,
    dx: i32,
    dy: i32,
    damage: u32,
    alive: bool,
}

impl Bullet {
    /// Creates a live bullet travelling `(dx, dy)` pixels per frame.
    #[must_use]
    pub fn new(id: ActorId, origin: WorldPoint, dx: i32, dy: i32, damage: u32) -> Self {
        Self {
            id,
            position: origin,
            path: Bounds::spanning(origin, origin),
            dx,
            dy,
            damage,
            alive: true,
        }
    }

    /// Per-frame displacement.
    #[must_use]
    pub const fn velocity(&self) -> (i32, i32) {
        (self.dx, self.dy)
    }

    /// Health removed from an enemy on impact.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Marks the bullet dead.
    pub fn kill(&mut self) {
        self.alive = false;
    }
}

impl Actor for Bullet {
    fn id(&self) -> ActorId {
        self.id
    }

    fn role(&self) -> ActorRole {
        ActorRole::Bullet
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn position(&self) -> WorldPoint {
        self.position
    }

    /// Area swept during the last frame, so fast bullets cannot skip a target.
    fn bounds(&self) -> Bounds {
        self.path
    }

    fn hit(&mut self, _bullet: &Bullet) -> bool {
        false
    }

    fn advance(&mut self, map: &TileMap, _clock: &Clock) {
        let to = WorldPoint::new(self.position.x + self.dx, self.position.y + self.dy);
        self.path = Bounds::spanning(self.position, to);
        self.position = WorldPoint::new(map.wrap_x(to.x), to.y);
    }

    fn sprite(&self) -> Sprite {
        Sprite {
            actor: self.id,
            role: ActorRole::Bullet,
            position: self.position,
            facing: if self.dx < 0 { Facing::Left } else { Facing::Right },
            pose: Pose::Standing,
            frame: 0,
        }
    }
}
