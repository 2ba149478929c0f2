use super::{
    press_key, release_key, AnimationIndices, AnimationState, Direction, MoveKey, MoveSpeed,
    Player, Position, Velocity, WalkCycle, ENTITY_SIZE,
};
use crate::config::GameConfig;
use crate::world::{CollisionSet, WorldManager};
use bevy::input::keyboard::KeyboardInput;
use bevy::input::ButtonState;
use bevy::prelude::*;

/// Applies key presses and releases to the player's velocity in arrival order
pub fn handle_movement_keys(
    mut keys: MessageReader<KeyboardInput>,
    mut query: Query<(&mut Velocity, &mut MoveSpeed), With<Player>>,
    mut exit: MessageWriter<AppExit>,
) {
    let Ok((mut velocity, mut speed)) = query.single_mut() else {
        return;
    };

    for event in keys.read() {
        if event.repeat {
            continue;
        }
        let Some(key) = MoveKey::from_key_code(event.key_code) else {
            continue;
        };
        match event.state {
            ButtonState::Pressed => press_key(key, &mut velocity, &mut speed),
            ButtonState::Released => {
                if release_key(key, &mut velocity, &mut speed) {
                    info!("Quit requested");
                    exit.write(AppExit::Success);
                }
            }
        }
    }
}

/// Move by `velocity` unless the probe rectangle hits an obstacle.
/// Returns true if the position changed.
pub fn try_move(position: &mut Position, velocity: &Velocity, collisions: &CollisionSet) -> bool {
    if velocity.is_zero() || collisions.overlaps(position.probe_rect(velocity)) {
        return false;
    }
    position.x += velocity.x;
    position.y += velocity.y;
    true
}

/// Updates entity positions from velocity, blocked by the collision set
///
/// Nothing moves until the map layers are drawn, since drawing can still turn
/// unusable tiles into impassable placeholders.
pub fn move_entities(
    world: Res<WorldManager>,
    collisions: Res<CollisionSet>,
    mut query: Query<(&mut Position, &Velocity)>,
) {
    if !world.layers_drawn {
        return;
    }
    for (mut position, velocity) in &mut query {
        // Avoid tripping change detection when standing still or blocked
        let mut next = *position;
        if try_move(&mut next, velocity, &collisions) {
            *position = next;
        }
    }
}

/// Step the animation state machine one tick
///
/// Walking entities face their direction of travel and advance the walk cycle.
/// Idle entities keep their last facing. Returns the new state and sheet index.
pub fn advance_animation(
    velocity: &Velocity,
    facing: &mut Direction,
    cycle: &mut WalkCycle,
    frame_delay: u32,
) -> (AnimationState, usize) {
    match AnimationState::from_velocity(velocity) {
        AnimationState::Walking(direction) => {
            *facing = direction;
            cycle.tick(frame_delay);
            let index = AnimationIndices::walk(direction).first + cycle.frame;
            (AnimationState::Walking(direction), index)
        }
        AnimationState::Idle => (AnimationState::Idle, AnimationIndices::idle(*facing).first),
    }
}

/// Animates sprites from their velocity
pub fn animate_sprites(
    config: Res<GameConfig>,
    mut query: Query<(
        &Velocity,
        &mut Direction,
        &mut WalkCycle,
        &mut AnimationState,
        &mut Sprite,
    )>,
) {
    for (velocity, mut facing, mut cycle, mut state, mut sprite) in &mut query {
        let (next_state, index) =
            advance_animation(velocity, &mut facing, &mut cycle, config.frame_delay);
        state.set_if_neq(next_state);

        let stale = sprite
            .texture_atlas
            .as_ref()
            .is_some_and(|atlas| atlas.index != index);
        if stale {
            if let Some(atlas) = &mut sprite.texture_atlas {
                atlas.index = index;
            }
        }
    }
}

/// Syncs entity Position component with Transform for rendering
pub fn sync_position_with_transform(
    config: Res<GameConfig>,
    mut query: Query<(&Position, &mut Transform), Changed<Position>>,
) {
    let size = IVec2::splat(ENTITY_SIZE);
    for (position, mut transform) in &mut query {
        let world_pos = config.screen_to_world(position.as_ivec2(), size);
        transform.translation.x = world_pos.x;
        transform.translation.y = world_pos.y;
    }
}
