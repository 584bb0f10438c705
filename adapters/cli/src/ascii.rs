//! Text presentation used by the headless runner.

use revert_core::{ActorRole, EnemyKind, Pose, WorldPoint};
use revert_world::{Camera, Presentation, Sprite, TileMap};

/// Character grid with one cell per tile, scrolled by the camera.
#[derive(Clone, Debug)]
pub(crate) struct AsciiCanvas {
    columns: usize,
    rows: usize,
    tile_width: i32,
    tile_height: i32,
    map_width: i32,
    origin: WorldPoint,
    cells: Vec<char>,
}

impl AsciiCanvas {
    pub(crate) fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            tile_width: 1,
            tile_height: 1,
            map_width: 1,
            origin: WorldPoint::default(),
            cells: vec![' '; columns * rows],
        }
    }

    pub(crate) fn render(&self) -> String {
        self.cells
            .chunks(self.columns.max(1))
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn put(&mut self, point: WorldPoint, glyph: char) {
        let dx = (point.x - self.origin.x).rem_euclid(self.map_width);
        let dy = point.y - self.origin.y;
        if dy < 0 {
            return;
        }
        let (Ok(column), Ok(row)) = (
            usize::try_from(dx / self.tile_width),
            usize::try_from(dy / self.tile_height),
        ) else {
            return;
        };
        if column < self.columns && row < self.rows {
            self.cells[row * self.columns + column] = glyph;
        }
    }
}

impl Presentation for AsciiCanvas {
    fn draw_level(&mut self, map: &TileMap, camera: Camera) {
        self.tile_width = map.tile_width().max(1);
        self.tile_height = map.tile_height().max(1);
        self.map_width = map.map_pixel_width().max(1);
        let width = i32::try_from(self.columns).unwrap_or(i32::MAX) * self.tile_width;
        let height = i32::try_from(self.rows).unwrap_or(i32::MAX) * self.tile_height;
        self.origin = camera.origin(map, width, height);

        let mut y = self.origin.y;
        for row in 0..self.rows {
            let mut x = self.origin.x;
            for column in 0..self.columns {
                self.cells[row * self.columns + column] =
                    if map.solid_at(x, y) { '#' } else { ' ' };
                x += self.tile_width;
            }
            y += self.tile_height;
        }
    }

    fn draw_sprite(&mut self, sprite: &Sprite) {
        let (glyph, point) = match sprite.role {
            ActorRole::Bullet => ('-', sprite.position),
            ActorRole::Player if sprite.pose == Pose::Jumping => ('^', above(sprite.position)),
            ActorRole::Player => ('@', above(sprite.position)),
            ActorRole::Enemy(EnemyKind::Idle) => ('i', above(sprite.position)),
            ActorRole::Enemy(EnemyKind::Pursuer) => ('E', above(sprite.position)),
        };
        self.put(point, glyph);
    }
}

// Bodies are anchored at their feet; draw them in the tile they stand in.
fn above(foot: WorldPoint) -> WorldPoint {
    WorldPoint::new(foot.x, foot.y - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use revert_core::{ActorId, Facing};
    use revert_world::Level;

    const MAP: &str = "
        ....
        .S..
        ####
    ";

    fn sprite(role: ActorRole, position: WorldPoint) -> Sprite {
        Sprite {
            actor: ActorId::new(1),
            role,
            position,
            facing: Facing::Right,
            pose: Pose::Standing,
            frame: 0,
        }
    }

    #[test]
    fn level_and_sprites_are_drawn_per_tile() {
        let mut level = Level::new(TileMap::parse(MAP, 16, 32).expect("map parses"));
        level.update(WorldPoint::new(32, 48));
        let mut canvas = AsciiCanvas::new(4, 3);
        canvas.draw_level(level.map(), level.camera());
        canvas.draw_sprite(&sprite(ActorRole::Player, WorldPoint::new(8, 64)));
        canvas.draw_sprite(&sprite(
            ActorRole::Enemy(EnemyKind::Pursuer),
            WorldPoint::new(56, 64),
        ));
        canvas.draw_sprite(&sprite(ActorRole::Bullet, WorldPoint::new(40, 40)));

        assert_eq!(canvas.render(), "    \n@ -E\n####");
    }

    #[test]
    fn sprites_outside_the_canvas_are_skipped() {
        let map = TileMap::parse(MAP, 16, 32).expect("map parses");
        let mut canvas = AsciiCanvas::new(2, 2);
        canvas.draw_level(&map, Camera::default());
        canvas.draw_sprite(&sprite(ActorRole::Bullet, WorldPoint::new(40, 40)));
        canvas.draw_sprite(&sprite(ActorRole::Bullet, WorldPoint::new(8, -40)));

        assert_eq!(canvas.render(), "  \n  ");
    }
}
