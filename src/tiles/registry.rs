use super::constants::{DEFAULT_TILESET, SNOW_TILESET_PATH, TILE_SIZE};
use super::sheet::{SheetStatus, SpriteSheet};
use super::types::{Tile, TileSource};
use bevy::asset::LoadState;
use bevy::prelude::*;
use std::collections::HashMap;

/// Registry of tilesets known to the game, keyed by the name used in tile codes
#[derive(Resource, Debug, Clone)]
pub struct TilesetRegistry {
    /// Asset path for each known tileset
    paths: HashMap<String, String>,
    /// Sheets that have been requested from the asset server
    sheets: HashMap<String, SpriteSheet>,
}

impl TilesetRegistry {
    pub fn new() -> Self {
        Self {
            paths: HashMap::new(),
            sheets: HashMap::new(),
        }
    }

    /// Register the asset path for a tileset name
    pub fn register(&mut self, name: &str, path: &str) {
        self.paths.insert(name.to_string(), path.to_string());
    }

    /// Start loading a tileset image. Unknown names are ignored.
    pub fn request(&mut self, name: &str, asset_server: &AssetServer) {
        if self.sheets.contains_key(name) {
            return;
        }
        match self.paths.get(name) {
            Some(path) => {
                let sheet = SpriteSheet::new(asset_server.load(path.clone()));
                self.sheets.insert(name.to_string(), sheet);
                debug!("Requested tileset '{}' from {}", name, path);
            }
            None => warn!("Unknown tileset '{}'", name),
        }
    }

    /// Insert a sheet whose image is already settled
    #[cfg(test)]
    pub fn insert_sheet(&mut self, name: &str, sheet: SpriteSheet) {
        self.sheets.insert(name.to_string(), sheet);
    }

    /// True while a requested tileset is still loading
    pub fn is_pending(&self, name: &str) -> bool {
        self.sheets.get(name).is_some_and(SpriteSheet::is_pending)
    }

    /// Check if a tile's image can be cut from its tileset
    pub fn is_valid_tile(&self, tile: &Tile) -> bool {
        match tile.source() {
            TileSource::Sheet { tileset, rect } => self
                .sheets
                .get(tileset)
                .is_some_and(|sheet| sheet.region(*rect).is_some()),
            TileSource::Placeholder => false,
        }
    }

    /// Sprite for a tile at display size, or a white placeholder square
    pub fn sprite_for(&self, tile: &Tile) -> Sprite {
        let display = Vec2::splat(TILE_SIZE as f32);
        let sprite = match tile.source() {
            TileSource::Sheet { tileset, rect } => self
                .sheets
                .get(tileset)
                .and_then(|sheet| sheet.sprite_at(*rect, display)),
            TileSource::Placeholder => None,
        };
        sprite.unwrap_or_else(|| Sprite::from_color(Color::WHITE, display))
    }

    /// Promote loading sheets to ready or failed based on the asset server
    pub fn refresh(&mut self, asset_server: &AssetServer, images: &Assets<Image>) {
        for (name, sheet) in self.sheets.iter_mut().filter(|(_, s)| s.is_pending()) {
            match asset_server.load_state(sheet.image.id()) {
                LoadState::Loaded => {
                    if let Some(image) = images.get(&sheet.image) {
                        sheet.status = SheetStatus::Ready(image.size());
                        info!("Tileset '{}' loaded ({}x{})", name, image.width(), image.height());
                    }
                }
                LoadState::Failed(err) => {
                    sheet.status = SheetStatus::Failed;
                    warn!("Tileset '{}' failed to load: {}", name, err);
                }
                _ => {}
            }
        }
    }
}

impl Default for TilesetRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register(DEFAULT_TILESET, SNOW_TILESET_PATH);
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_registry() -> TilesetRegistry {
        let mut registry = TilesetRegistry::default();
        let mut sheet = SpriteSheet::new(Handle::default());
        sheet.status = SheetStatus::Ready(UVec2::new(128, 128));
        registry.insert_sheet("snow", sheet);
        registry
    }

    #[test]
    fn test_default_knows_snow() {
        let registry = TilesetRegistry::default();
        assert_eq!(registry.paths.get("snow").map(String::as_str), Some(SNOW_TILESET_PATH));
        assert!(!registry.paths.contains_key("desert"));
        assert!(!registry.is_pending("snow"));
    }

    #[test]
    fn test_is_valid_tile() {
        let registry = ready_registry();
        assert!(registry.is_valid_tile(&Tile::from_code("0101fs@snow").unwrap()));
        // Outside the 128x128 image
        assert!(!registry.is_valid_tile(&Tile::from_code("0400ts@snow").unwrap()));
        // Tileset never loaded
        assert!(!registry.is_valid_tile(&Tile::from_code("0000ts@desert").unwrap()));
    }

    #[test]
    fn test_sprite_for_placeholder() {
        let registry = ready_registry();
        let mut tile = Tile::from_code("0000ts@snow").unwrap();
        assert_eq!(
            registry.sprite_for(&tile).rect,
            Some(Rect::new(0.0, 0.0, 32.0, 32.0))
        );

        tile.invalidate();
        let sprite = registry.sprite_for(&tile);
        assert_eq!(sprite.rect, None);
        assert_eq!(sprite.color, Color::WHITE);
        assert_eq!(sprite.custom_size, Some(Vec2::splat(64.0)));
    }
}
