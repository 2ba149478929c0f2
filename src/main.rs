use bevy::prelude::*;

mod config;
mod data;
mod entities;
mod tiles;
mod world;

use config::GameConfig;
use data::load_game_data;
use entities::{animate_sprites, handle_movement_keys, move_entities, sync_position_with_transform};
use tiles::TilesetRegistry;
use world::{
    compile_collisions, draw_map_layers, request_map_tilesets, setup_world, track_tileset_loads,
    CollisionSet, WorldManager,
};

fn main() {
    let config = GameConfig::default();

    App::new()
        .add_plugins(
            DefaultPlugins
                .set(ImagePlugin::default_nearest())
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Mirror Game".to_string(),
                        resolution: (config.screen_size.x, config.screen_size.y).into(),
                        resizable: false,
                        ..default()
                    }),
                    ..default()
                }),
        )
        .insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
        .insert_resource(WorldManager::new(config.map_directory.clone()))
        .insert_resource(config)
        .init_resource::<CollisionSet>()
        .init_resource::<TilesetRegistry>()
        .add_systems(Startup, (load_game_data, setup_world).chain())
        .add_systems(
            Update,
            (
                handle_movement_keys,
                (request_map_tilesets, track_tileset_loads, draw_map_layers).chain(),
                sync_position_with_transform,
            ),
        )
        .add_systems(
            FixedUpdate,
            (compile_collisions, move_entities, animate_sprites).chain(),
        )
        .run();
}
