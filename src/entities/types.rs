use crate::data::{BaseStats, Job, SpellBook};
use crate::world::collision::pixel_rect;
use bevy::prelude::*;

/// Pixel size of an entity sprite on screen
pub const ENTITY_SIZE: i32 = 64;

/// Inset of the collision rectangle from the sprite's top-left corner
pub const COLLISION_INSET: i32 = 4;

/// Side length of the collision rectangle
pub const COLLISION_SIZE: i32 = 60;

/// How far a probe rectangle reaches ahead in the direction of travel
pub const PROBE_REACH: i32 = 4;

/// Pixel size of a frame in a character sprite sheet
pub const SHEET_FRAME_SIZE: u32 = 32;

/// Columns in a character sheet: one idle frame followed by the walk cycle
pub const SHEET_COLUMNS: usize = 7;

/// Rows in a character sheet, one per direction
pub const SHEET_ROWS: usize = 4;

/// Frames in a walk cycle
pub const WALK_FRAMES: usize = 6;

/// Screen position of an entity's top-left corner (pixels, y down)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn as_ivec2(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    /// Slightly smaller rectangle used for collisions
    pub fn collision_rect(&self) -> IRect {
        pixel_rect(
            self.x + COLLISION_INSET,
            self.y + COLLISION_INSET,
            COLLISION_SIZE,
            COLLISION_SIZE,
        )
    }

    /// Rectangle tested before moving with `velocity`
    ///
    /// The collision rectangle is stretched by PROBE_REACH along the axis of
    /// travel and shifted toward it. Vertical movement takes priority.
    pub fn probe_rect(&self, velocity: &Velocity) -> IRect {
        let inset = COLLISION_INSET;
        let long = COLLISION_SIZE + PROBE_REACH;
        match Direction::from_velocity(velocity) {
            Some(Direction::North) => pixel_rect(self.x + inset, self.y, COLLISION_SIZE, long),
            Some(Direction::South) => {
                pixel_rect(self.x + inset, self.y + 2 * inset, COLLISION_SIZE, long)
            }
            Some(Direction::West) => pixel_rect(self.x, self.y + inset, long, COLLISION_SIZE),
            Some(Direction::East) => {
                pixel_rect(self.x + 2 * inset, self.y + inset, long, COLLISION_SIZE)
            }
            None => self.collision_rect(),
        }
    }
}

/// Velocity component - pixels moved per tick on each axis
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Velocity {
    pub x: i32,
    pub y: i32,
}

impl Velocity {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self { x: 0, y: 0 }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Rescale non-zero components to `rate`, keeping their sign
    pub fn rescale(&mut self, rate: i32) {
        self.x = self.x.signum() * rate;
        self.y = self.y.signum() * rate;
    }
}

/// Direction the entity is facing
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    South = 0, // Row 0 in sprite sheets
    North = 1, // Row 1 in sprite sheets
    West = 2,  // Row 2 in sprite sheets
    East = 3,  // Row 3 in sprite sheets
}

impl Direction {
    /// Direction of travel; horizontal velocity only counts when vertical is zero
    pub fn from_velocity(velocity: &Velocity) -> Option<Self> {
        match (velocity.x.signum(), velocity.y.signum()) {
            (_, -1) => Some(Direction::North),
            (_, 1) => Some(Direction::South),
            (-1, 0) => Some(Direction::West),
            (1, 0) => Some(Direction::East),
            _ => None,
        }
    }

    /// Get the row index in the sprite sheet for this direction
    pub fn sprite_row(&self) -> usize {
        *self as usize
    }
}

/// Animation state machine
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationState {
    #[default]
    Idle,
    Walking(Direction),
}

impl AnimationState {
    pub fn from_velocity(velocity: &Velocity) -> Self {
        match Direction::from_velocity(velocity) {
            Some(direction) => AnimationState::Walking(direction),
            None => AnimationState::Idle,
        }
    }
}

/// First and last sheet index of an animation
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationIndices {
    pub first: usize,
    pub last: usize,
}

impl AnimationIndices {
    pub fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    /// Walk cycle frames for a direction
    pub fn walk(direction: Direction) -> Self {
        let first = direction.sprite_row() * SHEET_COLUMNS + 1;
        Self::new(first, first + WALK_FRAMES - 1)
    }

    /// Idle frame for a direction
    pub fn idle(direction: Direction) -> Self {
        let index = direction.sprite_row() * SHEET_COLUMNS;
        Self::new(index, index)
    }
}

/// Walk cycle progress, counted in update ticks
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkCycle {
    /// Current frame within the cycle
    pub frame: usize,
    /// Ticks since the last frame change
    pub delay: u32,
}

impl WalkCycle {
    /// Count one tick; the frame advances every `frame_delay + 1` ticks
    pub fn tick(&mut self, frame_delay: u32) {
        if self.delay < frame_delay {
            self.delay += 1;
        } else {
            self.delay = 0;
            self.frame = (self.frame + 1) % WALK_FRAMES;
        }
    }
}

/// Movement speed, with the sprint modifier
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveSpeed {
    pub base: i32,
    pub multiplier: i32,
    pub sprinting: bool,
}

impl MoveSpeed {
    pub fn new(base: i32, multiplier: i32) -> Self {
        Self {
            base,
            multiplier,
            sprinting: false,
        }
    }

    pub fn rate(&self) -> i32 {
        if self.sprinting {
            self.base * self.multiplier
        } else {
            self.base
        }
    }
}

/// Keys that steer the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKey {
    Up,
    Down,
    Left,
    Right,
    Sprint,
    Quit,
}

impl MoveKey {
    pub fn from_key_code(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyW | KeyCode::ArrowUp => Some(MoveKey::Up),
            KeyCode::KeyS | KeyCode::ArrowDown => Some(MoveKey::Down),
            KeyCode::KeyA | KeyCode::ArrowLeft => Some(MoveKey::Left),
            KeyCode::KeyD | KeyCode::ArrowRight => Some(MoveKey::Right),
            KeyCode::Space => Some(MoveKey::Sprint),
            KeyCode::Escape => Some(MoveKey::Quit),
            _ => None,
        }
    }
}

/// Apply a key press to the velocity. Moving on one axis stops the other.
pub fn press_key(key: MoveKey, velocity: &mut Velocity, speed: &mut MoveSpeed) {
    let rate = speed.rate();
    match key {
        MoveKey::Up => *velocity = Velocity::new(0, -rate),
        MoveKey::Down => *velocity = Velocity::new(0, rate),
        MoveKey::Left => *velocity = Velocity::new(-rate, 0),
        MoveKey::Right => *velocity = Velocity::new(rate, 0),
        MoveKey::Sprint => {
            speed.sprinting = true;
            velocity.rescale(speed.rate());
        }
        MoveKey::Quit => {}
    }
}

/// Apply a key release to the velocity. Returns true when the game should quit.
pub fn release_key(key: MoveKey, velocity: &mut Velocity, speed: &mut MoveSpeed) -> bool {
    match key {
        MoveKey::Up | MoveKey::Down => velocity.y = 0,
        MoveKey::Left | MoveKey::Right => velocity.x = 0,
        MoveKey::Sprint => {
            speed.sprinting = false;
            velocity.rescale(speed.rate());
        }
        MoveKey::Quit => return true,
    }
    false
}

/// The party member currently shown by the player sprite
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PartyMember {
    pub name: String,
    pub job: String,
    pub level: u32,
    pub stats: BaseStats,
    pub passives: Vec<String>,
    /// Spell ids slotted in the spellbook
    pub spells: Vec<String>,
}

impl PartyMember {
    /// A new recruit of `job` at `level`, with the job's starting spells that
    /// exist in `spells` and allow the job
    pub fn recruit(name: &str, job: &Job, spells: &SpellBook, level: u32) -> Self {
        Self {
            name: name.to_string(),
            job: job.name.clone(),
            level,
            stats: job.base_stats(),
            passives: job.passives_at(level).map(String::from).collect(),
            spells: job
                .start_spells_at(level)
                .filter(|id| spells.get(id).is_some_and(|spell| spell.allows_job(&job.name)))
                .map(String::from)
                .collect(),
        }
    }
}

/// Marker component for the player character
#[derive(Component)]
pub struct Player;
