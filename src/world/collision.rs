use super::manager::WorldManager;
use super::map::TileMap;
use crate::tiles::{MAP_COLS, MAP_ROWS, TILE_SIZE};
use bevy::prelude::*;

/// Build a rectangle from its top-left corner and size (pixel space, y down)
pub fn pixel_rect(x: i32, y: i32, width: i32, height: i32) -> IRect {
    IRect::new(x, y, x + width, y + height)
}

/// Screen rectangle covered by a grid cell
pub fn cell_rect(x: usize, y: usize) -> IRect {
    pixel_rect(x as i32 * TILE_SIZE, y as i32 * TILE_SIZE, TILE_SIZE, TILE_SIZE)
}

/// True when the rectangles share interior area. Touching edges do not overlap.
pub fn rects_overlap(a: IRect, b: IRect) -> bool {
    !a.intersect(b).is_empty()
}

/// Impassable rectangles for the current frame
#[derive(Resource, Debug, Default, Clone)]
pub struct CollisionSet {
    rects: Vec<IRect>,
}

impl CollisionSet {
    /// Build a collision set for a map
    #[cfg(test)]
    pub fn from_map(map: &TileMap) -> Self {
        let mut set = Self::default();
        set.rebuild(map);
        set
    }

    /// Recompute every obstacle from the map
    ///
    /// A cell blocks movement when it has no background tile, or when either
    /// of its tiles is impassable.
    pub fn rebuild(&mut self, map: &TileMap) {
        self.rects.clear();

        for y in 0..MAP_ROWS {
            for x in 0..MAP_COLS {
                let blocked = map.background(x, y).is_none_or(|tile| !tile.is_passable())
                    || map.foreground(x, y).is_some_and(|tile| !tile.is_passable());

                if blocked {
                    self.insert(cell_rect(x, y));
                }
            }
        }
    }

    /// Add a rectangle unless it is already present
    pub fn insert(&mut self, rect: IRect) {
        if !self.rects.contains(&rect) {
            self.rects.push(rect);
        }
    }

    #[cfg(any(test, feature = "debug_collisions"))]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// True if `probe` overlaps any obstacle
    pub fn overlaps(&self, probe: IRect) -> bool {
        self.rects.iter().any(|rect| rects_overlap(probe, *rect))
    }
}

/// System that refreshes the collision set from the active map every tick
pub fn compile_collisions(world: Res<WorldManager>, mut collisions: ResMut<CollisionSet>) {
    #[cfg(feature = "debug_collisions")]
    let previous = collisions.len();

    collisions.rebuild(&world.map);

    #[cfg(feature = "debug_collisions")]
    if collisions.len() != previous {
        debug!("Collision set now holds {} rectangles", collisions.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::{Tile, LAYER_BACKGROUND, LAYER_FOREGROUND, MAP_AREA, TILE_ICE, TILE_SNOW};
    use bevy::ecs::system::RunSystemOnce;

    fn snow_map() -> TileMap {
        let snow = Tile::from_code(TILE_SNOW).unwrap();
        let mut map = TileMap::empty();
        for y in 0..MAP_ROWS {
            for x in 0..MAP_COLS {
                map.set_tile(LAYER_BACKGROUND, x, y, Some(snow.clone()));
            }
        }
        map
    }

    #[test]
    fn test_rects_overlap_is_strict() {
        let a = pixel_rect(0, 0, 64, 64);
        assert!(rects_overlap(a, pixel_rect(63, 63, 64, 64)));
        assert!(!rects_overlap(a, pixel_rect(64, 0, 64, 64)));
        assert!(!rects_overlap(a, pixel_rect(0, 64, 64, 64)));
    }

    #[test]
    fn test_empty_map_blocks_every_cell_once() {
        let set = CollisionSet::from_map(&TileMap::empty());
        assert_eq!(set.len(), MAP_AREA);
        for y in 0..MAP_ROWS {
            for x in 0..MAP_COLS {
                let rect = cell_rect(x, y);
                assert_eq!(set.rects.iter().filter(|r| **r == rect).count(), 1);
            }
        }
    }

    #[test]
    fn test_passable_map_has_no_obstacles() {
        assert!(CollisionSet::from_map(&snow_map()).is_empty());
    }

    #[test]
    fn test_impassable_cells() {
        let ice = Tile::from_code(TILE_ICE).unwrap();
        let mut map = snow_map();
        map.set_tile(LAYER_BACKGROUND, 2, 1, Some(ice.clone()));
        map.set_tile(LAYER_FOREGROUND, 5, 5, Some(ice.clone()));
        // Both layers blocked on the same cell still yields one rectangle
        map.set_tile(LAYER_BACKGROUND, 7, 3, Some(ice.clone()));
        map.set_tile(LAYER_FOREGROUND, 7, 3, Some(ice));
        // Missing background
        map.set_tile(LAYER_BACKGROUND, 15, 11, None);
        // Passable foreground does not block
        map.set_tile(LAYER_FOREGROUND, 0, 0, Tile::from_code(TILE_SNOW).ok());

        let set = CollisionSet::from_map(&map);
        assert_eq!(set.len(), 4);
        assert!(set.rects.contains(&IRect::new(128, 64, 192, 128)));
        assert!(set.rects.contains(&cell_rect(5, 5)));
        assert!(set.rects.contains(&cell_rect(7, 3)));
        assert!(set.rects.contains(&cell_rect(15, 11)));
        assert!(!set.rects.contains(&cell_rect(0, 0)));
    }

    #[test]
    fn test_rebuild_discards_previous_obstacles() {
        let mut set = CollisionSet::from_map(&TileMap::empty());
        set.rebuild(&snow_map());
        assert!(set.is_empty());
    }

    #[test]
    fn test_overlaps() {
        let mut set = CollisionSet::default();
        set.insert(cell_rect(1, 1));
        set.insert(cell_rect(1, 1));
        assert_eq!(set.len(), 1);

        assert!(set.overlaps(pixel_rect(100, 100, 10, 10)));
        assert!(!set.overlaps(pixel_rect(0, 0, 64, 64)));
    }

    #[test]
    fn test_compile_collisions_system() {
        let mut world = World::new();
        let mut manager = WorldManager::default();
        manager.replace_map(TileMap::empty());
        world.insert_resource(manager);
        world.init_resource::<CollisionSet>();

        world
            .run_system_once(compile_collisions)
            .expect("system should run");

        assert_eq!(world.resource::<CollisionSet>().len(), MAP_AREA);
    }
}
