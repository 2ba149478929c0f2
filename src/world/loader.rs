use super::generator;
use super::manager::WorldManager;
use crate::config::GameConfig;
use crate::data::GameData;
use crate::entities::{spawn_player, Direction, PartyMember, Position};
use crate::tiles::{layer_z_position, TilesetRegistry, NUM_LAYERS, TILE_SIZE};
use bevy::prelude::*;

/// Startup system: camera, starting map and the player
pub fn setup_world(
    mut commands: Commands,
    mut world: ResMut<WorldManager>,
    config: Res<GameConfig>,
    data: Option<Res<GameData>>,
    asset_server: Res<AssetServer>,
    mut texture_atlas_layouts: ResMut<Assets<TextureAtlasLayout>>,
) {
    commands.spawn(Camera2d);

    let loaded = match &config.starting_map {
        Some(file_name) => match world.load_map(file_name) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to load map {:?}: {}, generating a snowfield", file_name, e);
                false
            }
        },
        None => false,
    };
    if !loaded {
        match generator::generate_snowfield(&mut rand::thread_rng()) {
            Ok(map) => {
                info!("Generated a random snowfield");
                world.replace_map(map);
            }
            Err(e) => error!("Failed to generate a map: {}", e),
        }
    }

    let spawn = world.spawn_point_or(&config.entry_spawn, config.default_spawn);
    let player = spawn_player(
        &mut commands,
        Position::new(spawn.x, spawn.y),
        Direction::South,
        &config,
        &asset_server,
        &mut texture_atlas_layouts,
    );
    info!("Spawned player at ({}, {})", spawn.x, spawn.y);

    let Some(data) = data else {
        warn!("Game data missing, player has no party member");
        return;
    };
    let Some(job) = data.jobs.get(&config.starting_job) else {
        warn!("Unknown starting job {:?}", config.starting_job);
        return;
    };
    let member = PartyMember::recruit(&config.starting_member, job, &data.spells, 1);
    for spell in member.spells.iter().filter_map(|id| data.spells.get(id)) {
        debug!(
            "{} slots {} ({})",
            member.name,
            spell.name,
            spell.damage(&member.stats, member.level)
        );
    }
    info!("{} joins as a level {} {}", member.name, member.level, member.job);
    commands.entity(player).insert(member);
}

/// System to promote tileset sheets once the asset server has settled them
pub fn track_tileset_loads(
    mut registry: ResMut<TilesetRegistry>,
    asset_server: Res<AssetServer>,
    images: Res<Assets<Image>>,
) {
    registry.refresh(&asset_server, &images);
}

/// System to request every tileset the active map uses before it is drawn
pub fn request_map_tilesets(
    world: Res<WorldManager>,
    mut registry: ResMut<TilesetRegistry>,
    asset_server: Res<AssetServer>,
) {
    if world.layers_drawn {
        return;
    }
    for tileset in world.map.tilesets() {
        registry.request(tileset, &asset_server);
    }
}

/// System to draw both layers of the active map once its tilesets have settled
pub fn draw_map_layers(
    mut commands: Commands,
    mut world: ResMut<WorldManager>,
    registry: Res<TilesetRegistry>,
    config: Res<GameConfig>,
) {
    if world.layers_drawn {
        return;
    }
    if world.map.tilesets().into_iter().any(|tileset| registry.is_pending(tileset)) {
        return;
    }

    for entity in world.layer_entities.drain(..) {
        commands.entity(entity).despawn();
    }

    let invalidated = world.map.revalidate(|tile| registry.is_valid_tile(tile));
    if invalidated > 0 {
        warn!("Replaced {} tiles with placeholders", invalidated);
    }

    let size = IVec2::splat(TILE_SIZE);
    let mut spawned = Vec::new();
    for layer in 0..NUM_LAYERS {
        let z = layer_z_position(layer);
        for (x, y, tile) in world.map.tiles(layer) {
            let top_left = IVec2::new(x as i32, y as i32) * TILE_SIZE;
            let pos = config.screen_to_world(top_left, size);
            let entity = commands
                .spawn((registry.sprite_for(tile), Transform::from_xyz(pos.x, pos.y, z)))
                .id();
            spawned.push(entity);
        }
    }

    world.layer_entities = spawned;
    world.layers_drawn = true;
    info!("Drew map layers. {}", world.stats());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::sheet::{SheetStatus, SpriteSheet};
    use crate::entities::{SHEET_COLUMNS, SHEET_FRAME_SIZE, SHEET_ROWS};
    use crate::tiles::{
        Tile, DEFAULT_TILESET, LAYER_BACKGROUND, LAYER_FOREGROUND, MAP_AREA, MAP_COLS,
        SNOW_TILESET_PATH, TILE_SNOW,
    };
    use crate::world::map::TileMap;
    use bevy::ecs::system::RunSystemOnce;

    /// Snow background everywhere, one foreground rock at (2, 3)
    fn test_map() -> TileMap {
        let mut map = TileMap::empty();
        for (x, y) in (0..MAP_AREA).map(|i| (i % MAP_COLS, i / MAP_COLS)) {
            map.set_tile(LAYER_BACKGROUND, x, y, Tile::from_code(TILE_SNOW).ok());
        }
        map.set_tile(LAYER_FOREGROUND, 2, 3, Tile::from_code("0300fs@snow").ok());
        map
    }

    fn test_world(status: SheetStatus) -> World {
        let mut registry = TilesetRegistry::default();
        let mut sheet = SpriteSheet::new(Handle::default());
        sheet.status = status;
        registry.insert_sheet("snow", sheet);

        let mut manager = WorldManager::default();
        manager.replace_map(test_map());

        let mut world = World::new();
        world.insert_resource(manager);
        world.insert_resource(registry);
        world.insert_resource(GameConfig::default());
        world
    }

    fn drawn_sprites(world: &mut World) -> Vec<(Sprite, Transform)> {
        let mut query = world.query::<(&Sprite, &Transform)>();
        query
            .iter(world)
            .map(|(sprite, transform)| (sprite.clone(), *transform))
            .collect()
    }

    #[test]
    fn test_waits_for_pending_tileset() {
        let mut world = test_world(SheetStatus::Loading);
        world.run_system_once(draw_map_layers).expect("system should run");

        let manager = world.resource::<WorldManager>();
        assert!(!manager.layers_drawn);
        assert!(manager.layer_entities.is_empty());
        assert!(drawn_sprites(&mut world).is_empty());
    }

    #[test]
    fn test_failed_tileset_draws_placeholders() {
        let mut world = test_world(SheetStatus::Failed);
        world.run_system_once(draw_map_layers).expect("system should run");

        let manager = world.resource::<WorldManager>();
        assert!(manager.layers_drawn);
        assert_eq!(manager.layer_entities.len(), MAP_AREA + 1);
        assert!(manager.map.tiles(LAYER_BACKGROUND).all(|(_, _, t)| t.is_placeholder()));
        assert!(!manager.map.background(0, 0).unwrap().is_passable());

        let sprites = drawn_sprites(&mut world);
        assert_eq!(sprites.len(), MAP_AREA + 1);
        assert!(sprites
            .iter()
            .all(|(sprite, _)| sprite.rect.is_none() && sprite.color == Color::WHITE));
    }

    #[test]
    fn test_layers_drawn_at_their_depth() {
        // 64x64 sheet: the snow tile fits, the rock at x = 96 does not
        let mut world = test_world(SheetStatus::Ready(UVec2::new(64, 64)));
        world.run_system_once(draw_map_layers).expect("system should run");

        let manager = world.resource::<WorldManager>();
        assert!(manager.map.background(0, 0).is_some_and(|t| !t.is_placeholder()));
        assert!(manager.map.foreground(2, 3).is_some_and(Tile::is_placeholder));

        let sprites = drawn_sprites(&mut world);
        let background = sprites.iter().filter(|(_, t)| t.translation.z == 0.0).count();
        let foreground: Vec<_> = sprites.iter().filter(|(_, t)| t.translation.z == 2.0).collect();
        assert_eq!(background, MAP_AREA);
        assert_eq!(foreground.len(), 1);

        // Cell (2, 3) covers (128, 192)..(192, 256); its centre is 352 left and 160 up
        let (rock, transform) = foreground[0];
        assert_eq!(rock.rect, None);
        assert_eq!(transform.translation.truncate(), Vec2::new(-352.0, 160.0));
    }

    #[test]
    fn test_replacing_map_redraws_layers() {
        let mut world = test_world(SheetStatus::Failed);
        world.run_system_once(draw_map_layers).expect("system should run");
        let old_entities = world.resource::<WorldManager>().layer_entities.clone();

        let mut map = TileMap::empty();
        map.set_tile(LAYER_BACKGROUND, 0, 0, Tile::from_code(TILE_SNOW).ok());
        world.resource_mut::<WorldManager>().replace_map(map);
        world.run_system_once(draw_map_layers).expect("system should run");

        assert!(old_entities.iter().all(|e| world.get_entity(*e).is_err()));
        assert_eq!(world.resource::<WorldManager>().layer_entities.len(), 1);
        assert_eq!(drawn_sprites(&mut world).len(), 1);
    }

    /// Width and height from the IHDR chunk of a shipped PNG
    fn png_size(path: &str) -> UVec2 {
        let bytes = std::fs::read(format!("assets/{}", path)).expect("image should be shipped");
        assert_eq!(&bytes[1..4], b"PNG");
        let read = |at: usize| {
            u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
        };
        UVec2::new(read(16), read(20))
    }

    #[test]
    fn test_shipped_tileset_covers_sample_map() {
        let mut registry = TilesetRegistry::default();
        let mut sheet = SpriteSheet::new(Handle::default());
        sheet.status = SheetStatus::Ready(png_size(SNOW_TILESET_PATH));
        registry.insert_sheet(DEFAULT_TILESET, sheet);

        let mut map = TileMap::load("assets/maps/northsalkstonmap.ini").unwrap();
        assert_eq!(map.revalidate(|tile| registry.is_valid_tile(tile)), 0);
    }

    #[test]
    fn test_shipped_player_sheet_fits_atlas() {
        let config = GameConfig::default();
        assert_eq!(
            png_size(&config.player_sheet),
            UVec2::new(SHEET_COLUMNS as u32, SHEET_ROWS as u32) * SHEET_FRAME_SIZE
        );
    }
}
