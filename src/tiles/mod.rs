pub mod constants;
pub mod registry;
pub mod sheet;
pub mod types;

// Re-export commonly used items
pub use constants::*;
pub use registry::TilesetRegistry;
pub use types::{Tile, TileCodeError};
