use bevy::prelude::*;
use std::path::PathBuf;

/// Game-wide settings
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Window size in pixels
    pub screen_size: UVec2,
    /// Update ticks per second
    pub tick_hz: f64,
    /// Ticks to wait between walk animation frames
    pub frame_delay: u32,
    /// Pixels moved per tick when walking
    pub walk_rate: i32,
    /// Walk rate multiplier while sprinting
    pub sprint_multiplier: i32,
    pub map_directory: PathBuf,
    pub data_directory: PathBuf,
    /// Map loaded at startup; a random map is generated when None or on failure
    pub starting_map: Option<String>,
    /// Spawn point the player enters the starting map from
    pub entry_spawn: String,
    /// Where the player appears when the map has no matching spawn point
    pub default_spawn: IVec2,
    /// Asset path of the player sprite sheet
    pub player_sheet: String,
    pub starting_member: String,
    pub starting_job: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_size: UVec2::new(1024, 768),
            tick_hz: 60.0,
            frame_delay: 3,
            walk_rate: 2,
            sprint_multiplier: 2,
            map_directory: PathBuf::from("assets/maps"),
            data_directory: PathBuf::from("assets/data"),
            starting_map: Some("northsalkstonmap.ini".to_string()),
            entry_spawn: "start".to_string(),
            default_spawn: IVec2::new(512, 384),
            player_sheet: "sprites/anna_basic.png".to_string(),
            starting_member: "Anna".to_string(),
            starting_job: "Mage".to_string(),
        }
    }
}

impl GameConfig {
    /// Convert a pixel-space rectangle (top-left origin, y down) to the
    /// world-space centre bevy draws it at (screen centre origin, y up)
    pub fn screen_to_world(&self, top_left: IVec2, size: IVec2) -> Vec2 {
        let centre = top_left.as_vec2() + size.as_vec2() / 2.0;
        let half_screen = self.screen_size.as_vec2() / 2.0;
        Vec2::new(centre.x - half_screen.x, half_screen.y - centre.y)
    }
}
