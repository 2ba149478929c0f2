use super::constants::*;
use bevy::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Error raised when a tile code cannot be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileCodeError {
    TooShort(String),
    InvalidCoordinate(String),
}

impl fmt::Display for TileCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileCodeError::TooShort(code) => write!(f, "Tile code too short: {:?}", code),
            TileCodeError::InvalidCoordinate(code) => {
                write!(f, "Invalid tileset coordinate in tile code: {:?}", code)
            }
        }
    }
}

impl std::error::Error for TileCodeError {}

/// Decoded form of a tile code such as `0101fs@snow`
///
/// Layout: two digits of tileset x index, two digits of tileset y index,
/// one passability flag, an optional kind character, then `@` and the
/// tileset name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileCode {
    pub sheet_x: i32,
    pub sheet_y: i32,
    pub passable: bool,
    pub kind: Option<char>,
    pub tileset: String,
}

impl TileCode {
    /// Pixel rectangle of this tile inside its tileset image
    pub fn source_rect(&self) -> IRect {
        let x = self.sheet_x * SOURCE_TILE_SIZE;
        let y = self.sheet_y * SOURCE_TILE_SIZE;
        IRect::new(x, y, x + SOURCE_TILE_SIZE, y + SOURCE_TILE_SIZE)
    }
}

impl FromStr for TileCode {
    type Err = TileCodeError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = code.chars().collect();
        if chars.len() < 5 {
            return Err(TileCodeError::TooShort(code.to_string()));
        }

        let digits = |range: std::ops::Range<usize>| -> Result<i32, TileCodeError> {
            let part = &chars[range];
            if !part.iter().all(|c| c.is_ascii_digit()) {
                return Err(TileCodeError::InvalidCoordinate(code.to_string()));
            }
            Ok(part
                .iter()
                .fold(0, |acc, c| acc * 10 + c.to_digit(10).unwrap_or(0) as i32))
        };

        let sheet_x = digits(0..2)?;
        let sheet_y = digits(2..4)?;
        let passable = chars[4] != IMPASSABLE_FLAG;
        let kind = chars.get(5).copied().filter(|c| *c != TILESET_SEPARATOR);
        let tileset = match code.split_once(TILESET_SEPARATOR) {
            Some((_, name)) => name.to_string(),
            None => DEFAULT_TILESET.to_string(),
        };

        Ok(Self {
            sheet_x,
            sheet_y,
            passable,
            kind,
            tileset,
        })
    }
}

/// Where a tile's image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileSource {
    /// A region of a named tileset
    Sheet { tileset: String, rect: IRect },
    /// Solid fill used when the source image could not be found
    Placeholder,
}

/// A single map tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    code: String,
    source: TileSource,
    passable: bool,
}

impl Tile {
    /// Build a tile from its code
    pub fn from_code(code: &str) -> Result<Self, TileCodeError> {
        let decoded: TileCode = code.parse()?;
        Ok(Self {
            code: code.to_string(),
            source: TileSource::Sheet {
                rect: decoded.source_rect(),
                tileset: decoded.tileset,
            },
            passable: decoded.passable,
        })
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn source(&self) -> &TileSource {
        &self.source
    }

    pub fn is_passable(&self) -> bool {
        self.passable
    }

    /// Name of the tileset this tile is drawn from, if it still has one
    pub fn tileset(&self) -> Option<&str> {
        match &self.source {
            TileSource::Sheet { tileset, .. } => Some(tileset),
            TileSource::Placeholder => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.source == TileSource::Placeholder
    }

    /// Turn this tile into an impassable placeholder
    pub fn invalidate(&mut self) {
        self.source = TileSource::Placeholder;
        self.passable = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ice_code() {
        let tile = Tile::from_code("0101fs@snow").unwrap();
        assert!(!tile.is_passable());
        assert_eq!(
            tile.source(),
            &TileSource::Sheet {
                tileset: "snow".to_string(),
                rect: IRect::new(32, 32, 64, 64),
            }
        );
        assert_eq!(tile.code(), "0101fs@snow");
    }

    #[test]
    fn test_first_pair_is_horizontal() {
        let code: TileCode = "0300ts@snow".parse().unwrap();
        assert_eq!(code.source_rect(), IRect::new(96, 0, 128, 32));
        assert_eq!(code.kind, Some('s'));
    }

    #[test]
    fn test_passability_flag() {
        for flag in ['t', 'x', 'F', '0', '-'] {
            let tile = Tile::from_code(&format!("0000{}s@snow", flag)).unwrap();
            assert!(tile.is_passable(), "flag {:?} should be passable", flag);
        }
        let tile = Tile::from_code("0000f").unwrap();
        assert!(!tile.is_passable());
    }

    #[test]
    fn test_missing_tileset_defaults_to_snow() {
        let code: TileCode = "0202t".parse().unwrap();
        assert_eq!(code.tileset, DEFAULT_TILESET);
        assert_eq!(code.kind, None);
    }

    #[test]
    fn test_invalid_codes() {
        assert_eq!(
            "010".parse::<TileCode>(),
            Err(TileCodeError::TooShort("010".to_string()))
        );
        assert!(matches!(
            "0a01fs@snow".parse::<TileCode>(),
            Err(TileCodeError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn test_invalidate() {
        let mut tile = Tile::from_code(TILE_SNOW).unwrap();
        assert!(tile.is_passable());
        assert_eq!(tile.tileset(), Some("snow"));

        tile.invalidate();
        assert!(!tile.is_passable());
        assert!(tile.is_placeholder());
        assert_eq!(tile.tileset(), None);
    }
}
