//! Tile collision map and the level wrapper that tracks the camera.

use std::sync::Arc;

use revert_core::{TileCoord, WorldPoint};

/// Reasons a tile map description may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// The description contained no rows or no columns.
    #[error("tile map must contain at least one row and one column")]
    Empty,
    /// Tiles must span at least one pixel in each direction.
    #[error("tile dimensions must be non-zero, got {width}x{height}")]
    ZeroTileSize {
        /// Requested tile width in pixels.
        width: u32,
        /// Requested tile height in pixels.
        height: u32,
    },
    /// The cell buffer does not match the declared grid size.
    #[error("expected {expected} cells, found {found}")]
    CellCount {
        /// Number of cells implied by the grid dimensions.
        expected: usize,
        /// Number of cells supplied.
        found: usize,
    },
    /// A textual row differs in width from the first row.
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        /// Zero-based row index.
        row: usize,
        /// Width of the offending row.
        found: usize,
        /// Width of the first row.
        expected: usize,
    },
    /// A textual cell used an unsupported glyph.
    #[error("unexpected glyph {glyph:?} at column {column}, row {row}")]
    UnknownGlyph {
        /// Offending character.
        glyph: char,
        /// Zero-based column index.
        column: usize,
        /// Zero-based row index.
        row: usize,
    },
    /// A column has no solid tile in the bottom row, so actors could fall forever.
    #[error("column {column} has no floor tile")]
    MissingFloor {
        /// Zero-based column index.
        column: usize,
    },
}

/// Fixed-height grid of solid and open tiles with pixel-space queries.
///
/// The bottom row is solid in every column. A falling actor therefore always
/// lands. Cells outside the grid are open air, and horizontal pixel
/// coordinates wrap modulo the map width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    columns: i32,
    rows: i32,
    tile_width: i32,
    tile_height: i32,
    solid: Vec<bool>,
    spawn_points: Vec<TileCoord>,
}

impl TileMap {
    /// Creates a map from a row-major buffer of solid flags.
    pub fn new(
        columns: usize,
        rows: usize,
        tile_width: u32,
        tile_height: u32,
        solid: Vec<bool>,
        spawn_points: Vec<TileCoord>,
    ) -> Result<Self, MapError> {
        if columns == 0 || rows == 0 {
            return Err(MapError::Empty);
        }
        if tile_width == 0 || tile_height == 0 {
            return Err(MapError::ZeroTileSize {
                width: tile_width,
                height: tile_height,
            });
        }
        let expected = columns * rows;
        if solid.len() != expected {
            return Err(MapError::CellCount {
                expected,
                found: solid.len(),
            });
        }
        let floor = &solid[(rows - 1) * columns..];
        if let Some(column) = floor.iter().position(|cell| !cell) {
            return Err(MapError::MissingFloor { column });
        }

        Ok(Self {
            columns: i32::try_from(columns).unwrap_or(i32::MAX),
            rows: i32::try_from(rows).unwrap_or(i32::MAX),
            tile_width: i32::try_from(tile_width).unwrap_or(i32::MAX),
            tile_height: i32::try_from(tile_height).unwrap_or(i32::MAX),
            solid,
            spawn_points,
        })
    }

    /// Parses a textual map where `#` is solid, `.` is open and `S` marks an
    /// open spawn point. Blank lines and surrounding whitespace are ignored.
    pub fn parse(text: &str, tile_width: u32, tile_height: u32) -> Result<Self, MapError> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let columns = lines.first().map_or(0, |line| line.chars().count());

        let mut solid = Vec::with_capacity(columns * lines.len());
        let mut spawn_points = Vec::new();
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != columns {
                return Err(MapError::RaggedRow {
                    row,
                    found,
                    expected: columns,
                });
            }
            for (column, glyph) in line.chars().enumerate() {
                match glyph {
                    '#' => solid.push(true),
                    '.' => solid.push(false),
                    'S' => {
                        solid.push(false);
                        spawn_points.push(TileCoord::new(column as i32, row as i32));
                    }
                    _ => {
                        return Err(MapError::UnknownGlyph { glyph, column, row });
                    }
                }
            }
        }

        Self::new(
            columns,
            lines.len(),
            tile_width,
            tile_height,
            solid,
            spawn_points,
        )
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> i32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Width of a single tile in pixels.
    #[must_use]
    pub const fn tile_width(&self) -> i32 {
        self.tile_width
    }

    /// Height of a single tile in pixels.
    #[must_use]
    pub const fn tile_height(&self) -> i32 {
        self.tile_height
    }

    /// Width of the whole map in pixels.
    #[must_use]
    pub const fn map_pixel_width(&self) -> i32 {
        self.columns * self.tile_width
    }

    /// Height of the whole map in pixels.
    #[must_use]
    pub const fn map_pixel_height(&self) -> i32 {
        self.rows * self.tile_height
    }

    /// Tiles marked as enemy spawn points, in row-major order.
    #[must_use]
    pub fn spawn_points(&self) -> &[TileCoord] {
        &self.spawn_points
    }

    /// Converts a pixel position into the tile containing it.
    #[must_use]
    pub fn world_to_tile(&self, x: i32, y: i32) -> TileCoord {
        let x = self.wrap_x(x);
        TileCoord::new(x / self.tile_width, y.div_euclid(self.tile_height))
    }

    /// Pixel position of the top-left corner of a tile.
    #[must_use]
    pub const fn tile_to_world(&self, tile: TileCoord) -> WorldPoint {
        WorldPoint::new(
            tile.column() * self.tile_width,
            tile.row() * self.tile_height,
        )
    }

    /// Wraps a horizontal pixel coordinate into `0..map_pixel_width`.
    #[must_use]
    pub fn wrap_x(&self, x: i32) -> i32 {
        x.rem_euclid(self.map_pixel_width())
    }

    /// Reports whether a solid tile occupies the cell. Cells outside the grid are open.
    #[must_use]
    pub fn tile_exists(&self, tile: TileCoord) -> bool {
        self.index(tile)
            .and_then(|index| self.solid.get(index).copied())
            .unwrap_or(false)
    }

    /// Reports whether the pixel lies inside a solid tile.
    #[must_use]
    pub fn solid_at(&self, x: i32, y: i32) -> bool {
        self.tile_exists(self.world_to_tile(x, y))
    }

    /// Distance a point may travel downward, up to `max_step`, before
    /// touching the top of a solid tile. Zero when already resting on one.
    #[must_use]
    pub fn clearance_below(&self, x: i32, y: i32, max_step: i32) -> i32 {
        let probe = y + max_step;
        if !self.solid_at(x, probe) {
            return max_step;
        }
        let top = probe.div_euclid(self.tile_height) * self.tile_height;
        (top - y).clamp(0, max_step)
    }

    /// Distance a point may travel upward, up to `max_step`, before touching
    /// the base of a solid tile. Values at or below zero mean the point is
    /// already pressed against a tile.
    #[must_use]
    pub fn clearance_above(&self, x: i32, y: i32, max_step: i32) -> i32 {
        let probe = y - max_step;
        if !self.solid_at(x, probe) {
            return max_step;
        }
        let base = (probe.div_euclid(self.tile_height) + 1) * self.tile_height;
        (y - base).min(max_step)
    }

    /// Top pixel of the highest floor tile in the column containing `x`.
    ///
    /// A floor tile is a solid tile with open space above it. The bottom row
    /// is always solid, so a column sealed all the way up reports the map top.
    #[must_use]
    pub fn find_floor(&self, x: i32) -> i32 {
        let column = self.world_to_tile(x, 0).column();
        let floor_row = (0..self.rows)
            .find(|&row| {
                let tile = TileCoord::new(column, row);
                self.tile_exists(tile) && (row == 0 || !self.tile_exists(tile.above()))
            })
            .unwrap_or(self.rows - 1);
        floor_row * self.tile_height
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        if tile.column() < 0
            || tile.row() < 0
            || tile.column() >= self.columns
            || tile.row() >= self.rows
        {
            return None;
        }
        let row = usize::try_from(tile.row()).ok()?;
        let column = usize::try_from(tile.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }
}

/// Viewport position derived from the player each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Camera {
    focus: WorldPoint,
}

impl Camera {
    /// World position the camera is centred on.
    #[must_use]
    pub const fn focus(&self) -> WorldPoint {
        self.focus
    }

    /// Top-left pixel of a viewport of the given size, kept inside the map vertically.
    #[must_use]
    pub fn origin(&self, map: &TileMap, width: i32, height: i32) -> WorldPoint {
        let max_top = (map.map_pixel_height() - height).max(0);
        WorldPoint::new(
            map.wrap_x(self.focus.x - width / 2),
            (self.focus.y - height / 2).clamp(0, max_top),
        )
    }
}

/// Level geometry plus the scrolling state that follows the player.
#[derive(Clone, Debug)]
pub struct Level {
    map: Arc<TileMap>,
    camera: Camera,
}

impl Level {
    /// Wraps a tile map in a level with the camera at the origin.
    #[must_use]
    pub fn new(map: TileMap) -> Self {
        Self {
            map: Arc::new(map),
            camera: Camera::default(),
        }
    }

    /// Tile collision map backing the level.
    #[must_use]
    pub fn map(&self) -> &TileMap {
        &self.map
    }

    /// Shared handle to the tile map for read-only consumers on other threads.
    #[must_use]
    pub fn shared_map(&self) -> Arc<TileMap> {
        Arc::clone(&self.map)
    }

    /// Current camera state.
    #[must_use]
    pub const fn camera(&self) -> Camera {
        self.camera
    }

    /// Informs the level of the player's position, moving the camera with it.
    pub fn update(&mut self, player: WorldPoint) {
        self.camera.focus = WorldPoint::new(self.map.wrap_x(player.x), player.y);
    }
}
