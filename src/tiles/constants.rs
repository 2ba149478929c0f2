/// Number of tile rows in a map (the height of the game window in tiles)
pub const MAP_ROWS: usize = 12;

/// Number of tile columns in a map (the width of the game window in tiles)
pub const MAP_COLS: usize = 16;

/// Total number of cells in one map layer
pub const MAP_AREA: usize = MAP_ROWS * MAP_COLS; // 192 cells

/// Pixel size of a tile inside its tileset image
pub const SOURCE_TILE_SIZE: i32 = 32;

/// Tiles are drawn at twice their source size
pub const TILE_SCALE: i32 = 2;

/// Pixel size of a tile on screen
pub const TILE_SIZE: i32 = SOURCE_TILE_SIZE * TILE_SCALE; // 64 pixels

// Layer configuration
/// Number of tile layers per map
pub const NUM_LAYERS: usize = 2;

/// Layer indices
pub const LAYER_BACKGROUND: usize = 0; // Drawn below entities
pub const LAYER_FOREGROUND: usize = 1; // Drawn above entities

/// Z-positions for each layer in world space
pub const LAYER_Z_BACKGROUND: f32 = 0.0;
pub const LAYER_Z_ENTITIES: f32 = 1.0;
pub const LAYER_Z_FOREGROUND: f32 = 2.0;

/// Helper to get Z position for a layer index
pub const fn layer_z_position(layer: usize) -> f32 {
    match layer {
        LAYER_BACKGROUND => LAYER_Z_BACKGROUND,
        LAYER_FOREGROUND => LAYER_Z_FOREGROUND,
        _ => LAYER_Z_BACKGROUND,
    }
}

// Tile codes
/// Cell value meaning "no tile here"
pub const EMPTY_TILE_CODE: &str = "00000000000";

/// Passability flag marking a tile as impassable
pub const IMPASSABLE_FLAG: char = 'f';

/// Separator between the tile descriptor and its tileset name
pub const TILESET_SEPARATOR: char = '@';

/// Tileset used when a code does not name one
pub const DEFAULT_TILESET: &str = "snow";

/// Asset path of the snow tileset
pub const SNOW_TILESET_PATH: &str = "tilesets/snow_tiles.png";

/// Plain snow, passable
pub const TILE_SNOW: &str = "0000ts@snow";

/// Ice sheet, impassable
pub const TILE_ICE: &str = "0101fs@snow";

/// Chance out of 100 that a generated cell is snow rather than ice
pub const SNOW_WEIGHT: u32 = 70;
