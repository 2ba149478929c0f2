pub mod collision;
pub mod generator;
pub mod loader;
pub mod manager;
pub mod map;

// Re-export commonly used items
pub use collision::{compile_collisions, CollisionSet};
pub use loader::{draw_map_layers, request_map_tilesets, setup_world, track_tileset_loads};
pub use manager::WorldManager;
