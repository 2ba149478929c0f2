use super::map::{MapError, TileMap};
use crate::tiles::NUM_LAYERS;
use bevy::prelude::*;
use std::path::PathBuf;

/// World manager resource that owns the active map and the sprites drawn for it
#[derive(Resource)]
pub struct WorldManager {
    /// The map currently being played
    pub map: TileMap,

    /// Directory where map files are read from
    pub map_directory: PathBuf,

    /// Sprite entities spawned for the map layers
    pub layer_entities: Vec<Entity>,

    /// False until the layers of the current map have been drawn
    pub layers_drawn: bool,
}

impl WorldManager {
    pub fn new(map_directory: PathBuf) -> Self {
        Self {
            map: TileMap::empty(),
            map_directory,
            layer_entities: Vec::new(),
            layers_drawn: false,
        }
    }

    /// Get the path to a map file
    pub fn get_map_path(&self, file_name: &str) -> PathBuf {
        self.map_directory.join(file_name)
    }

    /// Load a map from the map directory and make it the active map
    pub fn load_map(&mut self, file_name: &str) -> Result<(), MapError> {
        let map = TileMap::load(self.get_map_path(file_name))?;
        info!("Loaded map {:?}", file_name);
        self.replace_map(map);
        Ok(())
    }

    /// Make `map` the active map; its layers are redrawn on the next frame
    pub fn replace_map(&mut self, map: TileMap) {
        self.map = map;
        self.layers_drawn = false;
    }

    /// Spawn point by name, falling back to `default`
    pub fn spawn_point_or(&self, name: &str, default: IVec2) -> IVec2 {
        self.map.spawn_point(name).unwrap_or(default)
    }

    /// Get statistics about the world state
    pub fn stats(&self) -> WorldStats {
        WorldStats {
            zone: self.map.header.as_ref().map(|h| h.zone.clone()),
            tiles: (0..NUM_LAYERS).map(|l| self.map.tiles(l).count()).sum(),
            spawn_points: self.map.spawns.len(),
            layer_sprites: self.layer_entities.len(),
        }
    }
}

impl Default for WorldManager {
    fn default() -> Self {
        Self::new(PathBuf::from("assets/maps"))
    }
}

/// Statistics about the current world state
#[derive(Debug, Clone)]
pub struct WorldStats {
    pub zone: Option<String>,
    pub tiles: usize,
    pub spawn_points: usize,
    pub layer_sprites: usize,
}

impl std::fmt::Display for WorldStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Zone: {}, Tiles: {}, Spawn points: {}, Layer sprites: {}",
            self.zone.as_deref().unwrap_or("(generated)"),
            self.tiles,
            self.spawn_points,
            self.layer_sprites
        )
    }
}
