//! Walking and jumping state machine for a single actor body.
//!
//! A body does not carry velocity. Each frame it asks the tile map how far
//! it may move and applies that distance directly. Horizontal stepping and
//! the vertical phase are independent: an actor may walk while it rises or
//! falls, and walking into a one tile ledge lifts it without a jump.

use revert_core::{
    Bounds, Clock, Facing, Movement, Pose, TileCoord, VerticalMode, WorldPoint, MAX_UP_STEPS,
};
use serde::{Deserialize, Serialize};

use crate::tiles::TileMap;

const CYCLE_DURATION_MS: u32 = 500;
const WALK_FRAMES: u32 = 4;

/// Physical dimensions of an actor body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodySpec {
    /// Width of the body in pixels.
    pub width: i32,
    /// Height of the body in pixels.
    pub height: i32,
    /// Horizontal distance covered per frame while walking.
    pub move_size: i32,
}

impl BodySpec {
    /// Creates a body description.
    #[must_use]
    pub const fn new(width: i32, height: i32, move_size: i32) -> Self {
        Self {
            width,
            height,
            move_size,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Animation {
    pose: Pose,
    looping: bool,
    elapsed_ms: u32,
    frame: u32,
}

impl Animation {
    const fn standing() -> Self {
        Self {
            pose: Pose::Standing,
            looping: false,
            elapsed_ms: 0,
            frame: 0,
        }
    }

    fn show(&mut self, pose: Pose, looping: bool) {
        if self.pose != pose || self.looping != looping {
            *self = Self {
                pose,
                looping,
                elapsed_ms: 0,
                frame: 0,
            };
        }
    }

    fn tick(&mut self, period_ms: u32) {
        if !self.looping {
            self.frame = 0;
            return;
        }
        self.elapsed_ms = (self.elapsed_ms + period_ms) % CYCLE_DURATION_MS;
        self.frame = self.elapsed_ms * WALK_FRAMES / CYCLE_DURATION_MS;
    }
}

/// Per-actor movement controller driven by tile map queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovementController {
    spec: BodySpec,
    position: WorldPoint,
    tile: TileCoord,
    facing: Facing,
    still: bool,
    vertical: VerticalMode,
    rise_count: u32,
    vertical_step: i32,
    height_in_tiles: i32,
    animation: Animation,
}

impl MovementController {
    /// Creates a still, grounded body facing right with its feet at `foot`.
    #[must_use]
    pub fn new(spec: BodySpec, foot: WorldPoint, map: &TileMap) -> Self {
        let position = WorldPoint::new(map.wrap_x(foot.x), foot.y);
        Self {
            spec,
            position,
            tile: map.world_to_tile(position.x, position.y),
            facing: Facing::Right,
            still: true,
            vertical: VerticalMode::Grounded,
            rise_count: 0,
            vertical_step: (map.tile_height() / 2).max(1),
            height_in_tiles: (spec.height / map.tile_height()).max(1),
            animation: Animation::standing(),
        }
    }

    /// Moves the body to a new foot position and cancels any jump.
    ///
    /// A body placed above open space starts falling.
    pub fn place(&mut self, foot: WorldPoint, map: &TileMap) {
        self.position = WorldPoint::new(map.wrap_x(foot.x), foot.y);
        self.tile = map.world_to_tile(self.position.x, self.position.y);
        self.rise_count = 0;
        self.vertical = VerticalMode::Grounded;
        self.check_if_falling(map);
    }

    /// Applies a horizontal movement request.
    pub fn request(&mut self, movement: Movement) {
        match movement {
            Movement::Left => self.walk(Facing::Left),
            Movement::Right => self.walk(Facing::Right),
            Movement::Still => self.stay_still(),
        }
    }

    /// Faces the body toward `facing` without changing whether it walks.
    pub fn face(&mut self, facing: Facing) {
        self.facing = facing;
    }

    /// Stops horizontal movement.
    pub fn stay_still(&mut self) {
        self.animation.show(Pose::Standing, false);
        self.still = true;
    }

    /// Starts a jump. Ignored unless the body is grounded.
    pub fn jump(&mut self) {
        if self.vertical == VerticalMode::Grounded {
            self.vertical = VerticalMode::Rising;
            self.rise_count = 0;
            self.animation.show(Pose::Jumping, false);
        }
    }

    /// Advances the body by one frame.
    pub fn advance(&mut self, map: &TileMap, clock: &Clock) {
        if !self.still {
            if self.vertical == VerticalMode::Grounded {
                self.check_if_falling(map);
            }
            let dx = self.step_next(map);
            self.position.x = map.wrap_x(self.position.x + dx);
        }

        match self.vertical {
            VerticalMode::Rising => self.update_rising(map),
            VerticalMode::Falling => self.update_falling(map),
            VerticalMode::Grounded => {}
        }

        self.tile = map.world_to_tile(self.position.x, self.position.y);
        self.animation.tick(clock.period_ms());
    }

    /// Foot position of the body.
    #[must_use]
    pub const fn position(&self) -> WorldPoint {
        self.position
    }

    /// Tile containing the foot position as of the last frame.
    #[must_use]
    pub const fn tile(&self) -> TileCoord {
        self.tile
    }

    /// Hit box of the body.
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        Bounds::standing_at(self.position, self.spec.width, self.spec.height)
    }

    /// Physical dimensions of the body.
    #[must_use]
    pub const fn spec(&self) -> BodySpec {
        self.spec
    }

    /// Direction the body faces.
    #[must_use]
    pub const fn facing(&self) -> Facing {
        self.facing
    }

    /// Whether the body has stopped walking.
    #[must_use]
    pub const fn is_still(&self) -> bool {
        self.still
    }

    /// Whether the body is rising or falling.
    #[must_use]
    pub fn is_jumping(&self) -> bool {
        self.vertical != VerticalMode::Grounded
    }

    /// Current vertical phase.
    #[must_use]
    pub const fn vertical_mode(&self) -> VerticalMode {
        self.vertical
    }

    /// Steps taken in the current rise.
    #[must_use]
    pub const fn rise_count(&self) -> u32 {
        self.rise_count
    }

    /// Pixel distance covered per frame while rising or falling.
    #[must_use]
    pub const fn vertical_step(&self) -> i32 {
        self.vertical_step
    }

    /// Signed walking direction: zero while still.
    #[must_use]
    pub const fn direction(&self) -> i32 {
        if self.still {
            0
        } else {
            self.facing.sign()
        }
    }

    /// Animation currently shown.
    #[must_use]
    pub const fn pose(&self) -> Pose {
        self.animation.pose
    }

    /// Index of the animation frame currently shown.
    #[must_use]
    pub const fn frame(&self) -> u32 {
        self.animation.frame
    }

    fn walk(&mut self, facing: Facing) {
        self.animation.show(Pose::Walking, true);
        self.facing = facing;
        self.still = false;
    }

    fn check_if_falling(&mut self, map: &TileMap) {
        let clearance = map.clearance_below(self.position.x, self.position.y, self.vertical_step);
        if clearance != 0 {
            self.vertical = VerticalMode::Falling;
        }
    }

    /// Horizontal displacement for this frame; may lift the body onto a ledge.
    fn step_next(&mut self, map: &TileMap) -> i32 {
        let dx = self.facing.sign() * self.spec.move_size;
        let mut next = map.world_to_tile(self.position.x + dx, self.position.y - 1);
        if next == self.tile || !map.tile_exists(next) {
            return dx;
        }

        for _ in 1..self.height_in_tiles {
            next = next.above();
            if map.tile_exists(next) {
                self.stay_still();
                return 0;
            }
        }

        self.position.y -= map.tile_height();
        dx
    }

    fn update_rising(&mut self, map: &TileMap) {
        // The top of the map is a ceiling.
        let head = self.position.y - self.spec.height;
        let clearance = map
            .clearance_above(self.position.x, head, self.vertical_step)
            .min(head);
        self.position.y -= clearance;
        if clearance <= 0 {
            self.vertical = VerticalMode::Falling;
            self.rise_count = 0;
            return;
        }

        self.rise_count += 1;
        if self.rise_count >= MAX_UP_STEPS {
            self.vertical = VerticalMode::Falling;
            self.rise_count = 0;
        }
    }

    fn update_falling(&mut self, map: &TileMap) {
        let clearance = map.clearance_below(self.position.x, self.position.y, self.vertical_step);
        self.position.y += clearance;
        if clearance < self.vertical_step {
            self.finish_jumping();
        }
    }

    fn finish_jumping(&mut self) {
        self.vertical = VerticalMode::Grounded;
        self.rise_count = 0;
        if self.still {
            self.animation.show(Pose::Standing, false);
        } else {
            self.animation.show(Pose::Walking, true);
        }
    }
}
