use crate::tiles::{
    Tile, TileCodeError, EMPTY_TILE_CODE, LAYER_BACKGROUND, LAYER_FOREGROUND, MAP_AREA, MAP_COLS,
    MAP_ROWS, NUM_LAYERS,
};
use bevy::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Line that terminates the spawn table
const END_OF_FILE: &str = "END OF FILE";

/// Map name that means "this map has no name"
const NO_NAME: &str = "none";

/// Error type for map loading operations
#[derive(Debug)]
pub enum MapError {
    Io(io::Error),
    UnexpectedEof { line: usize },
    InvalidHeader { line: usize },
    MalformedRow { line: usize, found: usize },
    InvalidTile { line: usize, column: usize, source: TileCodeError },
    InvalidSpawn { line: usize },
}

impl From<io::Error> for MapError {
    fn from(err: io::Error) -> Self {
        MapError::Io(err)
    }
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::Io(e) => write!(f, "IO error: {}", e),
            MapError::UnexpectedEof { line } => write!(f, "Unexpected end of file at line {}", line),
            MapError::InvalidHeader { line } => write!(f, "Invalid header at line {}", line),
            MapError::MalformedRow { line, found } => write!(
                f,
                "Line {}: expected {} tile codes, found {}",
                line, MAP_COLS, found
            ),
            MapError::InvalidTile { line, column, source } => {
                write!(f, "Line {}, column {}: {}", line, column, source)
            }
            MapError::InvalidSpawn { line } => write!(f, "Invalid spawn point at line {}", line),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Io(e) => Some(e),
            MapError::InvalidTile { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Header line of a map file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MapHeader {
    /// Zone the map belongs to (a town, a dungeon, ...)
    pub zone: String,
    pub name: Option<String>,
    /// Number of enemy encounters to spawn when entering this map
    pub encounter_rate: u32,
}

/// A single screen of tiles: a background and a foreground layer plus spawn points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    /// None for generated maps
    pub header: Option<MapHeader>,
    /// Each layer holds MAP_AREA cells in row-major order
    layers: [Vec<Option<Tile>>; NUM_LAYERS],
    /// Named player spawn points in pixel coordinates
    pub spawns: BTreeMap<String, IVec2>,
}

impl TileMap {
    /// Create a map with both layers empty
    pub fn empty() -> Self {
        Self {
            header: None,
            layers: std::array::from_fn(|_| vec![None; MAP_AREA]),
            spawns: BTreeMap::new(),
        }
    }

    /// Get tile at grid coordinates for a specific layer
    pub fn get_tile(&self, layer: usize, x: usize, y: usize) -> Option<&Tile> {
        if layer >= NUM_LAYERS || x >= MAP_COLS || y >= MAP_ROWS {
            return None;
        }
        self.layers[layer][y * MAP_COLS + x].as_ref()
    }

    /// Set tile at grid coordinates for a specific layer
    pub fn set_tile(&mut self, layer: usize, x: usize, y: usize, tile: Option<Tile>) -> bool {
        if layer >= NUM_LAYERS || x >= MAP_COLS || y >= MAP_ROWS {
            return false;
        }
        self.layers[layer][y * MAP_COLS + x] = tile;
        true
    }

    pub fn background(&self, x: usize, y: usize) -> Option<&Tile> {
        self.get_tile(LAYER_BACKGROUND, x, y)
    }

    pub fn foreground(&self, x: usize, y: usize) -> Option<&Tile> {
        self.get_tile(LAYER_FOREGROUND, x, y)
    }

    /// All present tiles of a layer with their grid coordinates
    pub fn tiles(&self, layer: usize) -> impl Iterator<Item = (usize, usize, &Tile)> {
        self.layers[layer]
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.as_ref().map(|tile| (i % MAP_COLS, i / MAP_COLS, tile)))
    }

    /// Names of every tileset referenced by the map
    pub fn tilesets(&self) -> BTreeSet<&str> {
        self.layers
            .iter()
            .flatten()
            .flatten()
            .filter_map(Tile::tileset)
            .collect()
    }

    /// Invalidate every tile the check rejects. Returns how many were invalidated.
    pub fn revalidate(&mut self, is_valid: impl Fn(&Tile) -> bool) -> usize {
        let mut invalidated = 0;
        for tile in self.layers.iter_mut().flatten().flatten() {
            if !tile.is_placeholder() && !is_valid(tile) {
                tile.invalidate();
                invalidated += 1;
            }
        }
        invalidated
    }

    pub fn spawn_point(&self, name: &str) -> Option<IVec2> {
        self.spawns.get(name).copied()
    }

    /// Load a map from a text file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse the pipe-delimited text map format
    ///
    /// Sections appear in fixed order, each preceded by a label line that is
    /// skipped: header, 12 background rows, 12 foreground rows, then spawn
    /// points until `END OF FILE`.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let mut lines = MapLines::new(text);
        let mut map = Self::empty();

        // Header
        lines.next_line()?;
        let (line_no, line) = lines.next_line()?;
        map.header = Some(parse_header(line, line_no)?);

        // Tile layers
        for layer in [LAYER_BACKGROUND, LAYER_FOREGROUND] {
            lines.next_line()?;
            for y in 0..MAP_ROWS {
                let (line_no, line) = lines.next_line()?;
                let fields: Vec<&str> = line.split('|').collect();
                if fields.len() < MAP_COLS {
                    return Err(MapError::MalformedRow {
                        line: line_no,
                        found: fields.len(),
                    });
                }
                for (x, field) in fields.iter().take(MAP_COLS).enumerate() {
                    map.set_tile(layer, x, y, parse_cell(field, line_no, x)?);
                }
            }
        }

        // Player spawn locations
        lines.next_line()?;
        while let Some((line_no, line)) = lines.next_opt() {
            let line = line.trim();
            if line == END_OF_FILE {
                break;
            }
            if line.is_empty() {
                continue;
            }
            let (name, point) = parse_spawn(line, line_no)?;
            map.spawns.insert(name, point);
        }

        Ok(map)
    }
}

/// Line reader that tracks 1-based line numbers
struct MapLines<'a> {
    inner: std::str::Lines<'a>,
    line_no: usize,
}

impl<'a> MapLines<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.lines(),
            line_no: 0,
        }
    }

    fn next_opt(&mut self) -> Option<(usize, &'a str)> {
        let line = self.inner.next()?;
        self.line_no += 1;
        Some((self.line_no, line))
    }

    fn next_line(&mut self) -> Result<(usize, &'a str), MapError> {
        self.next_opt().ok_or(MapError::UnexpectedEof {
            line: self.line_no + 1,
        })
    }
}

fn parse_header(line: &str, line_no: usize) -> Result<MapHeader, MapError> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    if fields.len() < 3 {
        return Err(MapError::InvalidHeader { line: line_no });
    }
    let name = match fields[1] {
        NO_NAME => None,
        name => Some(name.to_string()),
    };
    let encounter_rate = fields[2]
        .parse()
        .map_err(|_| MapError::InvalidHeader { line: line_no })?;

    Ok(MapHeader {
        zone: fields[0].to_string(),
        name,
        encounter_rate,
    })
}

fn parse_cell(field: &str, line_no: usize, column: usize) -> Result<Option<Tile>, MapError> {
    let code = field.trim();
    if code == EMPTY_TILE_CODE {
        return Ok(None);
    }
    Tile::from_code(code)
        .map(Some)
        .map_err(|source| MapError::InvalidTile {
            line: line_no,
            column: column + 1,
            source,
        })
}

fn parse_spawn(line: &str, line_no: usize) -> Result<(String, IVec2), MapError> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    let [name, x, y, ..] = fields.as_slice() else {
        return Err(MapError::InvalidSpawn { line: line_no });
    };
    let x = x.parse().map_err(|_| MapError::InvalidSpawn { line: line_no })?;
    let y = y.parse().map_err(|_| MapError::InvalidSpawn { line: line_no })?;
    Ok((name.to_string(), IVec2::new(x, y)))
}
