#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Revert simulation.
//!
//! The [`World`] owns the player, the live enemy set, and the live bullet
//! sequence. Input arrives as [`Notification`] values through its
//! [`Subscriber`] implementation; [`World::update`] then advances one frame
//! and fans world notifications out to every subscriber before returning.
//! The bullet sequence is the only state shared with the render thread and
//! is always accessed under its lock.

mod actors;
mod behavior;
mod config;
mod factory;
mod jumper;
mod render;
mod tiles;

use std::{
    collections::{BTreeMap, BTreeSet},
    iter,
    sync::{Arc, Mutex},
};

use revert_core::{
    ActorId, Clock, EnemyKind, Movement, Notification, NotificationBus, NotificationKind,
    Subscriber, SubscriptionId, WorldPoint,
};

pub use actors::{Actor, Bullet, Enemy, Player, Strike};
pub use behavior::{Behavior, NullBehavior, PursuitBehavior, Sighting};
pub use config::{BulletConfig, BulletMode, Config, ConfigError, EnemyConfig, PlayerConfig};
pub use factory::{BulletFactory, EnemyFactory, WaveSlot};
pub use jumper::{BodySpec, MovementController};
pub use render::{Presentation, RenderHandle, Sprite};
pub use tiles::{Camera, Level, MapError, TileMap};

use render::{draw_bullets, lock, Stage};

const ENEMY_SUBSCRIPTIONS: [NotificationKind; 3] = [
    NotificationKind::ActorsRemoved,
    NotificationKind::ActorVisible,
    NotificationKind::WaveStarted,
];

/// Represents the authoritative simulation state for one level attempt.
#[derive(Debug)]
pub struct World {
    config: Config,
    clock: Clock,
    level: Level,
    player: Player,
    enemies: BTreeMap<ActorId, Enemy>,
    all_actors: BTreeSet<ActorId>,
    bullets: Arc<Mutex<Vec<Bullet>>>,
    stage: Arc<Mutex<Stage>>,
    enemy_factory: EnemyFactory,
    bullet_factory: BulletFactory,
    bus: NotificationBus,
    score: u64,
    time: f32,
    time_bonus: u64,
    waves: u32,
    current_wave: u32,
    next_actor_id: u32,
    frame: u64,
}

impl World {
    /// Creates a world for the given level and player. No wave is active
    /// until the first [`World::update`].
    #[must_use]
    pub fn new(config: Config, clock: Clock, level: Level, player: Player) -> Self {
        let enemy_factory = EnemyFactory::new(level.map(), config.enemy.clone(), config.spawn_seed);
        let bullet_factory = BulletFactory::new(config.bullet.clone());
        let waves = config.waves;
        let world = Self {
            config,
            clock,
            level,
            player,
            enemies: BTreeMap::new(),
            all_actors: iter::once(ActorId::PLAYER).collect(),
            bullets: Arc::new(Mutex::new(Vec::new())),
            stage: Arc::new(Mutex::new(Stage::default())),
            enemy_factory,
            bullet_factory,
            bus: NotificationBus::new(),
            score: 0,
            time: 0.0,
            time_bonus: 0,
            waves,
            current_wave: 0,
            next_actor_id: ActorId::PLAYER.get() + 1,
            frame: 0,
        };
        world.refresh_stage();
        world
    }

    /// Creates a world on `map`, spawning the player from the configuration.
    #[must_use]
    pub fn with_map(config: Config, clock: Clock, map: TileMap) -> Self {
        let player = Player::spawn(&config.player, &map);
        Self::new(config, clock, Level::new(map), player)
    }

    /// Registers an external subscriber for world notifications.
    pub fn subscribe<S>(&mut self, kinds: &[NotificationKind], subscriber: S) -> SubscriptionId
    where
        S: Subscriber + Send + 'static,
    {
        self.bus.subscribe(kinds, subscriber)
    }

    /// Removes an external subscriber.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Advances the simulation by one frame.
    pub fn update(&mut self) {
        self.frame = self.frame.saturating_add(1);

        self.sweep_actors();
        self.broadcast_visibility();
        self.update_bullets();
        self.level.update(self.player.position());
        self.advance_clock();

        let state = Notification::WorldState {
            score: self.score,
            time: self.time,
            time_bonus: self.time_bonus,
            wave: self.current_wave,
            total_waves: self.waves,
        };
        self.publish(&state);

        if self.enemies.is_empty() && self.current_wave < self.waves && !self.player.is_jumping() {
            self.start_wave();
        }

        self.refresh_stage();
        tracing::trace!(
            frame = self.frame,
            score = self.score,
            enemies = self.enemies.len(),
            "frame complete"
        );
    }

    /// Replaces the enemy set with a freshly generated wave.
    ///
    /// Ignored once every wave has been started.
    pub fn start_wave(&mut self) {
        if self.current_wave >= self.waves {
            tracing::debug!(wave = self.current_wave, "no waves left to start");
            return;
        }

        for id in self.enemies.keys() {
            let _ = self.bus.unsubscribe_actor(*id);
        }

        let slots = self.enemy_factory.create_wave(self.config.wave_size);
        let mut enemies = BTreeMap::new();
        for slot in slots {
            let id = self.allocate_id();
            let mut enemy = self.enemy_factory.instantiate(id, slot.kind, self.level.map());
            enemy.place(WorldPoint::new(slot.x, slot.y), self.level.map());
            enemy.stop();
            self.bus.subscribe_actor(id, &ENEMY_SUBSCRIPTIONS);
            let _ = enemies.insert(id, enemy);
        }
        self.enemies = enemies;
        self.all_actors = self
            .enemies
            .keys()
            .copied()
            .chain(iter::once(ActorId::PLAYER))
            .collect();
        self.current_wave += 1;

        tracing::info!(
            wave = self.current_wave,
            total = self.waves,
            enemies = self.enemies.len(),
            "wave started"
        );
        let started = Notification::WaveStarted {
            wave: self.current_wave,
            actors: self.all_actors.iter().copied().collect(),
        };
        self.publish(&started);
    }

    /// Adds an enemy of `kind` standing at `foot` to the current wave.
    pub fn spawn_enemy(&mut self, kind: EnemyKind, foot: WorldPoint) -> ActorId {
        let id = self.allocate_id();
        let mut enemy = self.enemy_factory.instantiate(id, kind, self.level.map());
        enemy.place(foot, self.level.map());
        enemy.stop();
        self.bus.subscribe_actor(id, &ENEMY_SUBSCRIPTIONS);
        let _ = self.enemies.insert(id, enemy);
        let _ = self.all_actors.insert(id);
        id
    }

    /// Mutable access to a live enemy.
    pub fn enemy_mut(&mut self, id: ActorId) -> Option<&mut Enemy> {
        self.enemies.get_mut(&id)
    }

    /// Whether every wave has been started and cleared.
    #[must_use]
    pub fn done(&self) -> bool {
        self.current_wave == self.waves && self.enemies.is_empty()
    }

    /// Draws the current state without mutating it.
    pub fn display(&self, presentation: &mut dyn Presentation) {
        presentation.draw_level(self.level.map(), self.level.camera());
        presentation.draw_sprite(&self.player.sprite());
        for enemy in self.enemies.values() {
            presentation.draw_sprite(&enemy.sprite());
        }
        draw_bullets(&self.bullets, presentation);
    }

    /// Handle for drawing from another thread.
    #[must_use]
    pub fn render_handle(&self) -> RenderHandle {
        RenderHandle {
            map: self.level.shared_map(),
            stage: Arc::clone(&self.stage),
            bullets: Arc::clone(&self.bullets),
        }
    }

    fn allocate_id(&mut self) -> ActorId {
        let id = ActorId::new(self.next_actor_id);
        self.next_actor_id = self.next_actor_id.wrapping_add(1).max(1);
        id
    }

    /// Delivers a notification to external subscribers and subscribed
    /// enemies, then applies any strikes the enemies landed on the player.
    fn publish(&mut self, notification: &Notification) {
        let enemies = &mut self.enemies;
        let mut strikes = Vec::new();
        self.bus.publish(notification, |actor, notification| {
            if let Some(strike) = enemies
                .get_mut(&actor)
                .and_then(|enemy| enemy.observe(notification))
            {
                strikes.push(strike);
            }
        });

        for strike in strikes {
            self.player.take_damage(strike);
            tracing::debug!(
                attacker = strike.attacker.get(),
                damage = strike.damage,
                health = self.player.health(),
                "player struck"
            );
        }
    }

    fn sweep_actors(&mut self) {
        let map = self.level.map();
        let mut dead = Vec::new();
        for id in &self.all_actors {
            if *id == ActorId::PLAYER {
                if self.player.is_alive() {
                    self.player.advance(map, &self.clock);
                }
                continue;
            }
            match self.enemies.get_mut(id) {
                Some(enemy) if enemy.is_alive() => enemy.advance(map, &self.clock),
                Some(_) => dead.push(*id),
                None => {}
            }
        }

        for id in &dead {
            let _ = self.enemies.remove(id);
            let _ = self.all_actors.remove(id);
            let _ = self.bus.unsubscribe_actor(*id);
            self.score += self.config.kill_bonus;
            tracing::debug!(actor = id.get(), score = self.score, "enemy removed");
        }

        self.publish(&Notification::ActorsRemoved { actors: dead });
    }

    fn broadcast_visibility(&mut self) {
        let sightings: Vec<Notification> = self
            .all_actors
            .iter()
            .filter_map(|id| {
                let actor: &dyn Actor = if *id == ActorId::PLAYER {
                    &self.player
                } else {
                    self.enemies.get(id)?
                };
                Some(Notification::ActorVisible {
                    actor: *id,
                    role: actor.role(),
                    position: actor.position(),
                    bounds: actor.bounds(),
                })
            })
            .collect();

        for sighting in &sightings {
            self.publish(sighting);
        }
    }

    fn update_bullets(&mut self) {
        let map = self.level.map();
        let view = self.player.view_bounds();
        let mut bullets = lock(&self.bullets);

        for bullet in bullets.iter_mut() {
            bullet.advance(map, &self.clock);
            let position = bullet.position();

            let mut dead = false;
            for enemy in self.enemies.values_mut() {
                if enemy.hit(bullet) {
                    self.score += self.config.hit_bonus;
                    dead = true;
                    break;
                }
            }
            if !dead && map.solid_at(position.x, position.y) {
                dead = true;
            }
            if !dead && !view.contains(position) {
                dead = true;
            }
            if dead {
                bullet.kill();
            }
        }

        bullets.retain(|bullet| bullet.is_alive());
    }

    fn advance_clock(&mut self) {
        self.time += self.clock.delta_time();
        let allowance = self.current_wave as f32 * self.config.wave_time_allowance;
        self.time_bonus = ((allowance - self.time) * 1000.0).max(0.0) as u64;
    }

    fn fire(&mut self) {
        if !self.player.has_ammo() || self.player.is_jumping() {
            return;
        }
        let id = self.allocate_id();
        let bullet = self.bullet_factory.spawn_bullet(
            id,
            self.player.muzzle(),
            self.player.body().facing(),
            self.player.attack_mode(),
        );
        let _ = self.player.spend_ammo();
        lock(&self.bullets).push(bullet);
        tracing::debug!(
            bullet = id.get(),
            mode = self.player.attack_mode().index(),
            ammo = self.player.ammo(),
            "bullet spawned"
        );
    }

    fn refresh_stage(&self) {
        let mut stage = lock(&self.stage);
        stage.camera = self.level.camera();
        stage.player = Some(self.player.sprite());
        stage.enemies = self.enemies.values().map(|enemy| enemy.sprite()).collect();
    }
}

impl Subscriber for World {
    /// Applies input notifications to the player.
    fn notify(&mut self, notification: &Notification) {
        match notification {
            Notification::PlayerMovement(Movement::Still) if self.player.is_jumping() => {}
            Notification::PlayerMovement(movement) => self.player.body_mut().request(*movement),
            Notification::PlayerJump => self.player.body_mut().jump(),
            Notification::PlayerMode(request) => self.player.change_mode(*request),
            Notification::PlayerAttack => self.fire(),
            Notification::ActorsRemoved { .. }
            | Notification::ActorVisible { .. }
            | Notification::WaveStarted { .. }
            | Notification::WorldState { .. } => {}
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use revert_core::{ActorId, Clock};

    use super::{Bullet, Config, Enemy, Level, Player, World};
    use crate::render::lock;

    /// Accumulated score.
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.score
    }

    /// Elapsed simulation time.
    #[must_use]
    pub fn elapsed_time(world: &World) -> f32 {
        world.time
    }

    /// Bonus finishing the level now would award.
    #[must_use]
    pub fn time_bonus(world: &World) -> u64 {
        world.time_bonus
    }

    /// Number of waves started so far.
    #[must_use]
    pub fn current_wave(world: &World) -> u32 {
        world.current_wave
    }

    /// Number of waves in the level.
    #[must_use]
    pub fn total_waves(world: &World) -> u32 {
        world.waves
    }

    /// Number of frames simulated.
    #[must_use]
    pub fn frame(world: &World) -> u64 {
        world.frame
    }

    /// Player controlled actor.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Live enemies in ascending identifier order.
    pub fn enemies(world: &World) -> impl Iterator<Item = &Enemy> {
        world.enemies.values()
    }

    /// Live enemy with the given identifier.
    #[must_use]
    pub fn enemy(world: &World, id: ActorId) -> Option<&Enemy> {
        world.enemies.get(&id)
    }

    /// Number of live enemies.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Every live actor: the enemies plus the player.
    #[must_use]
    pub fn actors(world: &World) -> Vec<ActorId> {
        world.all_actors.iter().copied().collect()
    }

    /// Copy of the live bullet sequence.
    #[must_use]
    pub fn bullets(world: &World) -> Vec<Bullet> {
        lock(&world.bullets).clone()
    }

    /// Number of live bullets.
    #[must_use]
    pub fn bullet_count(world: &World) -> usize {
        lock(&world.bullets).len()
    }

    /// Whether an actor receives world notifications.
    #[must_use]
    pub fn is_subscribed(world: &World, actor: ActorId) -> bool {
        world.bus.is_actor_subscribed(actor)
    }

    /// Level the world runs on.
    #[must_use]
    pub fn level(world: &World) -> &Level {
        &world.level
    }

    /// Timer configuration.
    #[must_use]
    pub fn clock(world: &World) -> Clock {
        world.clock
    }

    /// Simulation parameters.
    #[must_use]
    pub fn config(world: &World) -> &Config {
        &world.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use revert_core::{ModeRequest, Pose, HIT_BONUS as HIT, KILL_BONUS as KILL};

    const SPAWN_ARENA: &str = "
        ................
        ................
        ..S.........S...
        ################
    ";

    const OPEN_ARENA: &str = "
        ................
        ................
        ................
        ################
    ";

    const GAP_ARENA: &str = "
        ................
        ..S.............
        ................
        ................
        ################
    ";

    const WALLED_ARENA: &str = "
        ................
        ...#............
        ...#............
        ################
    ";

    #[derive(Default)]
    struct Recorder {
        seen: Vec<Notification>,
    }

    impl Subscriber for Recorder {
        fn notify(&mut self, notification: &Notification) {
            self.seen.push(notification.clone());
        }
    }

    #[derive(Default)]
    struct Tally {
        levels: usize,
        sprites: Vec<Sprite>,
    }

    impl Presentation for Tally {
        fn draw_level(&mut self, _map: &TileMap, _camera: Camera) {
            self.levels += 1;
        }

        fn draw_sprite(&mut self, sprite: &Sprite) {
            self.sprites.push(*sprite);
        }
    }

    fn world(text: &str, config: Config) -> World {
        let map = TileMap::parse(text, 16, 32).expect("arena parses");
        World::with_map(config, Clock::default(), map)
    }

    fn single_wave() -> Config {
        Config {
            waves: 1,
            ..Config::default()
        }
    }

    fn record(world: &mut World, kinds: &[NotificationKind]) -> Arc<Mutex<Recorder>> {
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        let _ = world.subscribe(kinds, Arc::clone(&recorder));
        recorder
    }

    #[test]
    fn first_update_starts_a_wave() {
        let mut world = world(SPAWN_ARENA, Config::default());
        let recorder = record(&mut world, &[NotificationKind::WaveStarted]);

        world.update();

        assert_eq!(query::current_wave(&world), 1);
        assert_eq!(query::enemy_count(&world), 5);
        assert_eq!(query::actors(&world).len(), 6);
        assert!(query::enemies(&world).all(|enemy| query::is_subscribed(&world, enemy.id())));

        let recorded = recorder.lock().expect("lock");
        let seen = &recorded.seen;
        assert_eq!(seen.len(), 1);
        match &seen[0] {
            Notification::WaveStarted { wave, actors } => {
                assert_eq!(*wave, 1);
                assert_eq!(actors.len(), 6);
                assert!(actors.contains(&ActorId::PLAYER));
            }
            other => panic!("unexpected notification: {other:?}"),
        }
    }

    #[test]
    fn dead_enemies_award_kill_bonus_and_unsubscribe() {
        let mut world = world(SPAWN_ARENA, Config::default());
        world.update();
        let recorder = record(&mut world, &[NotificationKind::ActorsRemoved]);

        let victims: Vec<ActorId> = query::enemies(&world).take(2).map(Actor::id).collect();
        for id in &victims {
            world.enemy_mut(*id).expect("enemy exists").kill();
        }
        world.update();

        assert_eq!(query::score(&world), 2 * KILL);
        assert_eq!(query::enemy_count(&world), 3);
        for id in &victims {
            assert!(!query::is_subscribed(&world, *id));
            assert!(!query::actors(&world).contains(id));
        }
        let recorded = recorder.lock().expect("lock");
        let seen = &recorded.seen;
        assert_eq!(seen, &vec![Notification::ActorsRemoved { actors: victims }]);
    }

    #[test]
    fn bullet_hitting_an_enemy_scores_once() {
        let mut world = world(OPEN_ARENA, single_wave());
        let target = world.spawn_enemy(EnemyKind::Idle, WorldPoint::new(60, 96));
        let ammo = query::player(&world).ammo();

        world.notify(&Notification::PlayerAttack);
        assert_eq!(query::bullet_count(&world), 1);
        assert_eq!(query::player(&world).ammo(), ammo - 1);

        world.update();
        world.update();
        assert_eq!(query::score(&world), 0);
        assert_eq!(query::bullet_count(&world), 1);

        world.update();
        assert_eq!(query::score(&world), HIT);
        assert_eq!(query::bullet_count(&world), 0);
        assert!(!query::enemy(&world, target).expect("still listed").is_alive());

        world.update();
        assert_eq!(query::score(&world), HIT + KILL);
        assert!(query::enemy(&world, target).is_none());
    }

    #[test]
    fn one_hit_removes_a_pursuer() {
        let mut world = world(OPEN_ARENA, single_wave());
        let target = world.spawn_enemy(EnemyKind::Pursuer, WorldPoint::new(60, 96));

        world.notify(&Notification::PlayerAttack);
        let mut frames = 0;
        while query::bullet_count(&world) > 0 {
            world.update();
            frames += 1;
            assert!(frames < 8, "bullet never connected");
        }
        assert_eq!(query::score(&world), HIT);
        assert!(!query::enemy(&world, target).expect("still listed").is_alive());

        world.update();
        assert_eq!(query::score(&world), HIT + KILL);
        assert!(query::enemy(&world, target).is_none());
    }

    #[test]
    fn fast_bullets_cannot_skip_an_enemy() {
        let mut world = world(OPEN_ARENA, single_wave());
        let target = world.spawn_enemy(EnemyKind::Idle, WorldPoint::new(54, 96));
        world.notify(&Notification::PlayerMode(ModeRequest::Absolute(1)));
        world.notify(&Notification::PlayerAttack);

        world.update();
        assert_eq!(query::bullets(&world)[0].position().x, 44);
        world.update();

        assert_eq!(query::score(&world), HIT);
        assert_eq!(query::bullet_count(&world), 0);
        assert!(!query::enemy(&world, target).expect("still listed").is_alive());
    }

    #[test]
    fn a_bullet_hits_only_the_first_overlapping_enemy() {
        let mut world = world(OPEN_ARENA, single_wave());
        let first = world.spawn_enemy(EnemyKind::Idle, WorldPoint::new(60, 96));
        let second = world.spawn_enemy(EnemyKind::Idle, WorldPoint::new(62, 96));
        assert!(first < second);

        world.notify(&Notification::PlayerAttack);
        for _ in 0..3 {
            world.update();
        }

        assert_eq!(query::score(&world), HIT);
        assert_eq!(query::bullet_count(&world), 0);
        assert!(!query::enemy(&world, first).expect("still listed").is_alive());
        assert!(query::enemy(&world, second).expect("still listed").is_alive());

        world.update();
        assert_eq!(query::score(&world), HIT + KILL);
        assert!(query::enemy(&world, first).is_none());
        assert_eq!(query::enemy_count(&world), 1);
    }

    #[test]
    fn enemies_spawned_over_a_gap_fall_to_the_floor() {
        let config = Config {
            waves: 1,
            wave_size: 1,
            ..Config::default()
        };
        let mut world = world(GAP_ARENA, config);
        world.update();
        let enemy = query::enemies(&world).next().expect("wave spawned").id();
        assert_eq!(query::enemy(&world, enemy).expect("live").position().y, 64);
        assert_eq!(
            query::enemy(&world, enemy).expect("live").body().vertical_mode(),
            revert_core::VerticalMode::Falling
        );

        for _ in 0..8 {
            world.update();
        }
        let body = query::enemy(&world, enemy).expect("live").body().clone();
        assert_eq!(body.position().y, 128);
        assert_eq!(body.vertical_mode(), revert_core::VerticalMode::Grounded);
    }

    #[test]
    fn bullet_leaving_the_view_is_discarded() {
        let mut config = single_wave();
        config.player.viewport_width = 40;
        let mut world = world(OPEN_ARENA, config);

        world.notify(&Notification::PlayerAttack);
        world.update();
        assert_eq!(query::bullet_count(&world), 1);
        world.update();
        assert_eq!(query::bullet_count(&world), 0);
        assert_eq!(query::score(&world), 0);
    }

    #[test]
    fn bullet_hitting_a_tile_is_discarded() {
        let mut world = world(WALLED_ARENA, single_wave());

        world.notify(&Notification::PlayerAttack);
        world.update();
        assert_eq!(query::bullet_count(&world), 1);
        world.update();
        assert_eq!(query::bullet_count(&world), 0);
    }

    #[test]
    fn attacks_need_ammo_and_solid_footing() {
        let mut config = single_wave();
        config.player.ammo = 1;
        let mut world = world(OPEN_ARENA, config);

        world.notify(&Notification::PlayerJump);
        world.notify(&Notification::PlayerAttack);
        assert_eq!(query::bullet_count(&world), 0);

        while query::player(&world).is_jumping() {
            world.update();
        }
        world.notify(&Notification::PlayerAttack);
        world.notify(&Notification::PlayerAttack);
        assert_eq!(query::player(&world).ammo(), 0);
        assert_eq!(query::bullet_count(&world), 1);
    }

    #[test]
    fn still_requests_are_ignored_mid_jump() {
        let mut world = world(OPEN_ARENA, single_wave());
        world.notify(&Notification::PlayerMovement(Movement::Right));
        world.notify(&Notification::PlayerJump);
        world.notify(&Notification::PlayerMovement(Movement::Still));

        assert!(!query::player(&world).body().is_still());
        assert_eq!(query::player(&world).body().pose(), Pose::Jumping);
    }

    #[test]
    fn mode_requests_cycle_the_attack_mode() {
        let mut world = world(OPEN_ARENA, single_wave());
        world.notify(&Notification::PlayerMode(ModeRequest::Previous));
        assert_eq!(query::player(&world).attack_mode().index(), 2);
        world.notify(&Notification::PlayerMode(ModeRequest::Absolute(7)));
        assert_eq!(query::player(&world).attack_mode().index(), 1);
    }

    #[test]
    fn time_bonus_tracks_the_wave_allowance() {
        let map = TileMap::parse(SPAWN_ARENA, 16, 32).expect("arena parses");
        let clock = Clock::from_period_nanos(1_000_000_000);
        let mut world = World::with_map(Config::default(), clock, map);
        let recorder = record(&mut world, &[NotificationKind::WorldState]);

        world.update();
        assert_eq!(query::time_bonus(&world), 0, "no wave active during the first frame");
        world.update();
        assert!((query::elapsed_time(&world) - 2.0).abs() < f32::EPSILON);
        assert_eq!(query::time_bonus(&world), 28_000);

        let recorded = recorder.lock().expect("lock");
        let seen = &recorded.seen;
        assert_eq!(seen.len(), 2);
        assert!(matches!(
            seen[1],
            Notification::WorldState {
                score: 0,
                time_bonus: 28_000,
                wave: 1,
                total_waves: 5,
                ..
            }
        ));
    }

    #[test]
    fn waves_wait_for_the_player_to_land() {
        let mut world = world(SPAWN_ARENA, Config::default());
        world.notify(&Notification::PlayerJump);

        world.update();
        assert_eq!(query::current_wave(&world), 0);

        let mut frames = 0;
        while query::current_wave(&world) == 0 {
            world.update();
            frames += 1;
            assert!(frames < 64, "wave never started");
        }
        assert!(!query::player(&world).is_jumping());
    }

    #[test]
    fn start_wave_stops_at_the_last_wave() {
        let mut world = world(SPAWN_ARENA, single_wave());
        world.start_wave();
        world.start_wave();
        assert_eq!(query::current_wave(&world), 1);
        assert!(!world.done());
    }

    #[test]
    fn display_draws_every_layer() {
        let mut world = world(OPEN_ARENA, single_wave());
        let _ = world.spawn_enemy(EnemyKind::Pursuer, WorldPoint::new(200, 96));
        world.notify(&Notification::PlayerAttack);

        let mut direct = Tally::default();
        world.display(&mut direct);
        assert_eq!(direct.levels, 1);
        assert_eq!(direct.sprites.len(), 3);
        assert_eq!(direct.sprites[0].role, revert_core::ActorRole::Player);

        world.update();
        let mut remote = Tally::default();
        world.render_handle().display(&mut remote);
        assert_eq!(remote.levels, 1);
        assert_eq!(remote.sprites.len(), 3);
        assert_eq!(remote.sprites[2].role, revert_core::ActorRole::Bullet);
    }
}
