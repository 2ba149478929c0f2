use super::map::TileMap;
use crate::tiles::{Tile, TileCodeError, LAYER_BACKGROUND, MAP_COLS, MAP_ROWS, SNOW_WEIGHT, TILE_ICE, TILE_SNOW};
use rand::Rng;

/// Generate a background layer by rolling 1-100 for every cell
/// Rolls up to `common_weight` produce `common`, the rest produce `rare`
pub fn generate_map<R: Rng>(rng: &mut R, common: &Tile, rare: &Tile, common_weight: u32) -> TileMap {
    let mut map = TileMap::empty();

    for y in 0..MAP_ROWS {
        for x in 0..MAP_COLS {
            let roll: u32 = rng.gen_range(1..=100);
            let tile = if roll <= common_weight { common } else { rare };
            map.set_tile(LAYER_BACKGROUND, x, y, Some(tile.clone()));
        }
    }

    // Foreground layer remains empty

    map
}

/// Generate a field of snow with scattered ice
pub fn generate_snowfield<R: Rng>(rng: &mut R) -> Result<TileMap, TileCodeError> {
    let snow = Tile::from_code(TILE_SNOW)?;
    let ice = Tile::from_code(TILE_ICE)?;
    Ok(generate_map(rng, &snow, &ice, SNOW_WEIGHT))
}
