#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Revert simulation.
//!
//! This crate defines the message surface that connects input adapters, the
//! authoritative world, and pure systems. Controllers publish input
//! [`Notification`] values, the world reacts to them and advances its frame,
//! and then fans out world notifications to every current subscriber through
//! the [`NotificationBus`]. Delivery is synchronous: a publish call returns
//! only after every subscriber observed the notification.

mod bus;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use bus::{NotificationBus, Subscriber, SubscriptionId};

/// Score awarded for every bullet that strikes an enemy.
pub const HIT_BONUS: u64 = 10;

/// Score awarded for every enemy removed from the world.
pub const KILL_BONUS: u64 = 100;

/// Maximum number of vertical steps taken while rising in a jump.
pub const MAX_UP_STEPS: u32 = 8;

/// Number of waves queued for a level when no configuration overrides it.
pub const DEFAULT_WAVES: u32 = 5;

/// Number of enemies generated for each wave by default.
pub const DEFAULT_WAVE_SIZE: usize = 5;

/// Seconds granted per wave before the time bonus reaches zero.
pub const WAVE_TIME_ALLOWANCE: f32 = 30.0;

/// Number of selectable attack modes.
pub const ATTACK_MODE_COUNT: u8 = 3;

/// Unique identifier assigned to an actor.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ActorId(u32);

impl ActorId {
    /// Identifier reserved for the player controlled actor.
    pub const PLAYER: Self = Self(0);

    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Pixel position in the world. Rows grow downward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Horizontal pixel coordinate, wrapping modulo the map width.
    pub x: i32,
    /// Vertical pixel coordinate, bounded by the map height.
    pub y: i32,
}

impl WorldPoint {
    /// Creates a new world point.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Straight line distance between two points in pixels.
    #[must_use]
    pub fn distance_to(self, other: WorldPoint) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        dx.hypot(dy)
    }
}

/// Location of a single tile expressed as column and row indices.
///
/// Indices are signed because positions above the map or left of a
/// conversion origin produce negative rows; such cells are never solid.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TileCoord {
    column: i32,
    row: i32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Tile directly above this one.
    #[must_use]
    pub const fn above(self) -> Self {
        Self::new(self.column, self.row - 1)
    }
}

/// Axis-aligned pixel rectangle with inclusive edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    /// Leftmost pixel column covered by the rectangle.
    pub left: i32,
    /// Topmost pixel row covered by the rectangle.
    pub top: i32,
    /// Rightmost pixel column covered by the rectangle.
    pub right: i32,
    /// Bottom pixel row covered by the rectangle.
    pub bottom: i32,
}

impl Bounds {
    /// Builds a rectangle of the given size centred on `center`.
    #[must_use]
    pub const fn centered(center: WorldPoint, width: i32, height: i32) -> Self {
        Self {
            left: center.x - width / 2,
            top: center.y - height / 2,
            right: center.x + width / 2,
            bottom: center.y + height / 2,
        }
    }

    /// Builds the rectangle of a body standing with its feet at `foot`.
    #[must_use]
    pub const fn standing_at(foot: WorldPoint, width: i32, height: i32) -> Self {
        Self {
            left: foot.x - width / 2,
            top: foot.y - height,
            right: foot.x + width / 2,
            bottom: foot.y,
        }
    }

    /// Smallest rectangle covering both points.
    #[must_use]
    pub fn spanning(from: WorldPoint, to: WorldPoint) -> Self {
        Self {
            left: from.x.min(to.x),
            top: from.y.min(to.y),
            right: from.x.max(to.x),
            bottom: from.y.max(to.y),
        }
    }

    /// Reports whether the point lies inside the rectangle.
    #[must_use]
    pub const fn contains(&self, point: WorldPoint) -> bool {
        point.x >= self.left
            && point.x <= self.right
            && point.y >= self.top
            && point.y <= self.bottom
    }

    /// Reports whether two rectangles overlap.
    #[must_use]
    pub const fn intersects(&self, other: &Bounds) -> bool {
        self.left <= other.right
            && other.left <= self.right
            && self.top <= other.bottom
            && other.top <= self.bottom
    }

    /// Centre point of the rectangle.
    #[must_use]
    pub const fn center(&self) -> WorldPoint {
        WorldPoint::new((self.left + self.right) / 2, (self.top + self.bottom) / 2)
    }
}

/// Horizontal movement requested for an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    /// Walk toward decreasing x.
    Left,
    /// Walk toward increasing x.
    Right,
    /// Stop walking.
    Still,
}

/// Direction an actor is facing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    /// Facing toward decreasing x.
    Left,
    /// Facing toward increasing x.
    Right,
}

impl Facing {
    /// Signed unit step along the x axis.
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }
}

/// Vertical phase of the jump state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerticalMode {
    /// Resting on a tile surface.
    Grounded,
    /// Moving upward in a jump arc.
    Rising,
    /// Moving downward until a surface is reached.
    Falling,
}

/// Animation selected for an actor body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pose {
    /// Single frame shown while still.
    Standing,
    /// Looping cycle shown while walking.
    Walking,
    /// Single frame shown while airborne after a jump request.
    Jumping,
}

/// Selected attack mode, always within `0..ATTACK_MODE_COUNT`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttackMode(u8);

impl AttackMode {
    /// Creates an attack mode, wrapping out of range indices.
    #[must_use]
    pub fn new(index: i32) -> Self {
        let wrapped = index.rem_euclid(i32::from(ATTACK_MODE_COUNT));
        Self(u8::try_from(wrapped).unwrap_or(0))
    }

    /// Zero-based index of the mode.
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.0
    }

    /// Mode one kind higher, wrapping to the first.
    #[must_use]
    pub fn next(self) -> Self {
        Self::new(i32::from(self.0) + 1)
    }

    /// Mode one kind lower, wrapping to the last.
    #[must_use]
    pub fn previous(self) -> Self {
        Self::new(i32::from(self.0) - 1)
    }

    /// Resolves a change request relative to the current mode.
    #[must_use]
    pub fn apply(self, request: ModeRequest) -> Self {
        match request {
            ModeRequest::Absolute(index) => Self::new(index),
            ModeRequest::Next => self.next(),
            ModeRequest::Previous => self.previous(),
        }
    }
}

/// Attack mode change requested by the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModeRequest {
    /// Select the mode with the given index; out of range values wrap.
    Absolute(i32),
    /// Select the next mode.
    Next,
    /// Select the previous mode.
    Previous,
}

/// Types of enemies that waves may contain.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum EnemyKind {
    /// Enemy without any behaviour; it stands where it spawned.
    Idle,
    /// Enemy that walks toward the player once it gets close.
    Pursuer,
}

impl EnemyKind {
    /// All enemy kinds in declaration order.
    pub const ALL: [Self; 2] = [Self::Idle, Self::Pursuer];

    /// Maps a numeric layout type onto a kind, wrapping out of range values.
    #[must_use]
    pub fn from_index(index: u32) -> Self {
        let len = Self::ALL.len() as u32;
        Self::ALL[(index % len) as usize]
    }
}

/// Role an actor plays in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorRole {
    /// The player controlled actor.
    Player,
    /// An enemy of the given kind.
    Enemy(EnemyKind),
    /// A projectile fired by the player.
    Bullet,
}

/// Fixed timer configuration threaded through the simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clock {
    period: Duration,
    period_ms: u32,
    delta_time: f32,
}

impl Clock {
    /// Derives the clock from the timer tick period in nanoseconds.
    ///
    /// Periods below one millisecond are clamped to one millisecond so the
    /// derived delta never divides by zero.
    #[must_use]
    pub fn from_period_nanos(period: u64) -> Self {
        let period_ms = u32::try_from(period / 1_000_000).unwrap_or(u32::MAX).max(1);
        Self {
            period: Duration::from_nanos(period),
            period_ms,
            delta_time: 1000.0 / period_ms as f32,
        }
    }

    /// Timer resolution.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Timer resolution in whole milliseconds.
    #[must_use]
    pub const fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Per-frame delta used for elapsed time accumulation.
    #[must_use]
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::from_period_nanos(20_000_000)
    }
}

/// Typed notifications exchanged between the controller, world, and actors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    /// Input asking the player to walk or stop.
    PlayerMovement(Movement),
    /// Input asking the player to jump.
    PlayerJump,
    /// Input asking the player to change attack mode.
    PlayerMode(ModeRequest),
    /// Input asking the player to fire.
    PlayerAttack,
    /// Actors removed from the world during the liveness sweep.
    ActorsRemoved {
        /// Identifiers of the removed actors, in ascending order.
        actors: Vec<ActorId>,
    },
    /// An actor that is part of the world this frame.
    ActorVisible {
        /// Identifier of the visible actor.
        actor: ActorId,
        /// Role of the visible actor.
        role: ActorRole,
        /// Foot position of the actor.
        position: WorldPoint,
        /// Hit box of the actor.
        bounds: Bounds,
    },
    /// A new wave was generated.
    WaveStarted {
        /// One-based index of the wave that started.
        wave: u32,
        /// Every actor that is live after the wave started.
        actors: Vec<ActorId>,
    },
    /// Score and clock summary emitted once per frame.
    WorldState {
        /// Accumulated score.
        score: u64,
        /// Elapsed simulation time.
        time: f32,
        /// Bonus that finishing the level now would award.
        time_bonus: u64,
        /// Number of waves started so far.
        wave: u32,
        /// Total number of waves in the level.
        total_waves: u32,
    },
}

impl Notification {
    /// Discriminant used to route the notification to subscribers.
    #[must_use]
    pub const fn kind(&self) -> NotificationKind {
        match self {
            Self::PlayerMovement(_) => NotificationKind::PlayerMovement,
            Self::PlayerJump => NotificationKind::PlayerJump,
            Self::PlayerMode(_) => NotificationKind::PlayerMode,
            Self::PlayerAttack => NotificationKind::PlayerAttack,
            Self::ActorsRemoved { .. } => NotificationKind::ActorsRemoved,
            Self::ActorVisible { .. } => NotificationKind::ActorVisible,
            Self::WaveStarted { .. } => NotificationKind::WaveStarted,
            Self::WorldState { .. } => NotificationKind::WorldState,
        }
    }
}

/// Kinds of notifications a subscriber may register for.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum NotificationKind {
    /// See [`Notification::PlayerMovement`].
    PlayerMovement,
    /// See [`Notification::PlayerJump`].
    PlayerJump,
    /// See [`Notification::PlayerMode`].
    PlayerMode,
    /// See [`Notification::PlayerAttack`].
    PlayerAttack,
    /// See [`Notification::ActorsRemoved`].
    ActorsRemoved,
    /// See [`Notification::ActorVisible`].
    ActorVisible,
    /// See [`Notification::WaveStarted`].
    WaveStarted,
    /// See [`Notification::WorldState`].
    WorldState,
}

impl NotificationKind {
    /// Kinds produced by input controllers.
    pub const INPUT: [Self; 4] = [
        Self::PlayerMovement,
        Self::PlayerJump,
        Self::PlayerMode,
        Self::PlayerAttack,
    ];

    /// Kinds produced by the world during a frame.
    pub const WORLD: [Self; 4] = [
        Self::ActorsRemoved,
        Self::ActorVisible,
        Self::WaveStarted,
        Self::WorldState,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn attack_mode_wraps_in_both_directions() {
        let first = AttackMode::default();
        assert_eq!(first.previous().index(), 2);
        assert_eq!(first.next().next().next().index(), 0);
        assert_eq!(AttackMode::new(5).index(), 2);
        assert_eq!(AttackMode::new(-4).index(), 2);
    }

    #[test]
    fn attack_mode_applies_requests() {
        let mode = AttackMode::new(1);
        assert_eq!(mode.apply(ModeRequest::Absolute(0)).index(), 0);
        assert_eq!(mode.apply(ModeRequest::Next).index(), 2);
        assert_eq!(mode.apply(ModeRequest::Previous).index(), 0);
    }

    #[test]
    fn clock_derives_delta_from_period() {
        let clock = Clock::from_period_nanos(20_000_000);
        assert_eq!(clock.period_ms(), 20);
        assert!((clock.delta_time() - 50.0).abs() < f32::EPSILON);
    }

    #[test]
    fn clock_clamps_sub_millisecond_periods() {
        let clock = Clock::from_period_nanos(10);
        assert_eq!(clock.period_ms(), 1);
        assert!((clock.delta_time() - 1000.0).abs() < f32::EPSILON);
    }

    #[test]
    fn bounds_contain_their_edges() {
        let bounds = Bounds::centered(WorldPoint::new(10, 10), 4, 6);
        assert!(bounds.contains(WorldPoint::new(8, 7)));
        assert!(bounds.contains(WorldPoint::new(12, 13)));
        assert!(!bounds.contains(WorldPoint::new(13, 10)));
        assert_eq!(bounds.center(), WorldPoint::new(10, 10));
    }

    #[test]
    fn standing_bounds_rest_on_the_foot_line() {
        let bounds = Bounds::standing_at(WorldPoint::new(20, 64), 16, 32);
        assert_eq!(bounds.bottom, 64);
        assert_eq!(bounds.top, 32);
        assert!(bounds.intersects(&Bounds::centered(WorldPoint::new(28, 40), 2, 2)));
        assert!(!bounds.intersects(&Bounds::centered(WorldPoint::new(40, 40), 2, 2)));
    }

    #[test]
    fn spanning_bounds_cover_both_points_in_any_order() {
        let forward = Bounds::spanning(WorldPoint::new(4, 10), WorldPoint::new(24, 10));
        let backward = Bounds::spanning(WorldPoint::new(24, 10), WorldPoint::new(4, 10));
        assert_eq!(forward, backward);
        assert_eq!((forward.left, forward.right), (4, 24));
        assert!(forward.contains(WorldPoint::new(14, 10)));
    }

    #[test]
    fn enemy_kind_index_wraps() {
        assert_eq!(EnemyKind::from_index(0), EnemyKind::Idle);
        assert_eq!(EnemyKind::from_index(3), EnemyKind::Pursuer);
    }

    #[test]
    fn notification_kinds_match_variants() {
        assert_eq!(
            Notification::PlayerMode(ModeRequest::Next).kind(),
            NotificationKind::PlayerMode
        );
        assert_eq!(
            Notification::ActorsRemoved { actors: Vec::new() }.kind(),
            NotificationKind::ActorsRemoved
        );
    }

    #[test]
    fn world_state_round_trips_through_bincode() {
        assert_round_trip(&Notification::WorldState {
            score: 1_240,
            time: 12.5,
            time_bonus: 17_500,
            wave: 1,
            total_waves: 5,
        });
    }

    #[test]
    fn actor_visible_round_trips_through_bincode() {
        let position = WorldPoint::new(-3, 96);
        assert_round_trip(&Notification::ActorVisible {
            actor: ActorId::new(7),
            role: ActorRole::Enemy(EnemyKind::Pursuer),
            position,
            bounds: Bounds::standing_at(position, 16, 32),
        });
    }
}
