use super::{
    AnimationIndices, AnimationState, Direction, MoveSpeed, Player, Position, Velocity, WalkCycle,
    ENTITY_SIZE, SHEET_COLUMNS, SHEET_FRAME_SIZE, SHEET_ROWS,
};
use crate::config::GameConfig;
use crate::tiles::LAYER_Z_ENTITIES;
use bevy::prelude::*;

/// Spawns the player character at the given position
pub fn spawn_player(
    commands: &mut Commands,
    position: Position,
    facing: Direction,
    config: &GameConfig,
    assets: &AssetServer,
    texture_atlas_layouts: &mut Assets<TextureAtlasLayout>,
) -> Entity {
    let texture = assets.load(config.player_sheet.clone());
    let layout = TextureAtlasLayout::from_grid(
        UVec2::splat(SHEET_FRAME_SIZE),
        SHEET_COLUMNS as u32,
        SHEET_ROWS as u32,
        None,
        None,
    );
    let texture_atlas_layout = texture_atlas_layouts.add(layout);

    let size = IVec2::splat(ENTITY_SIZE);
    let world_pos = config.screen_to_world(position.as_ivec2(), size);

    let mut sprite = Sprite::from_atlas_image(
        texture,
        TextureAtlas {
            layout: texture_atlas_layout,
            index: AnimationIndices::idle(facing).first,
        },
    );
    // Sheet frames are 32px, drawn at twice that
    sprite.custom_size = Some(size.as_vec2());

    commands
        .spawn((
            Player,
            position,
            Velocity::zero(),
            facing,
            AnimationState::Idle,
            WalkCycle::default(),
            MoveSpeed::new(config.walk_rate, config.sprint_multiplier),
            sprite,
            Transform::from_xyz(world_pos.x, world_pos.y, LAYER_Z_ENTITIES),
        ))
        .id()
}
