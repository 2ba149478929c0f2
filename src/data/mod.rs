pub mod jobs;
pub mod spells;

pub use jobs::{BaseStats, Job, JobTable};
pub use spells::SpellBook;

use bevy::prelude::*;
use std::fs;
use std::path::Path;

pub const JOBS_FILE: &str = "jobs.json";
pub const SPELLS_FILE: &str = "spells.json";

/// Errors that can occur while loading game data tables
#[derive(Debug)]
pub enum DataError {
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidRank { spell: String, rank: u8 },
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::Io(e) => write!(f, "IO error: {}", e),
            DataError::Json(e) => write!(f, "JSON error: {}", e),
            DataError::InvalidRank { spell, rank } => {
                write!(f, "Spell {} has rank {}, expected 1 to 7", spell, rank)
            }
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Io(e) => Some(e),
            DataError::Json(e) => Some(e),
            DataError::InvalidRank { .. } => None,
        }
    }
}

impl From<std::io::Error> for DataError {
    fn from(err: std::io::Error) -> Self {
        DataError::Io(err)
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::Json(err)
    }
}

/// Job and spell tables
#[derive(Resource, Debug, Clone, Default)]
pub struct GameData {
    pub jobs: JobTable,
    pub spells: SpellBook,
}

impl GameData {
    /// Load `jobs.json` and `spells.json` from `dir`
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, DataError> {
        let dir = dir.as_ref();
        let jobs = JobTable::from_json(&fs::read_to_string(dir.join(JOBS_FILE))?)?;
        let spells = SpellBook::from_json(&fs::read_to_string(dir.join(SPELLS_FILE))?)?;
        Ok(Self { jobs, spells })
    }

    /// Starting spells named by a job that have no spell table entry,
    /// as (job, spell) pairs
    pub fn unknown_start_spells(&self) -> Vec<(&str, &str)> {
        self.jobs
            .iter()
            .flat_map(|job| {
                job.start_spells
                    .values()
                    .flatten()
                    .map(move |spell| (job.name.as_str(), spell.as_str()))
            })
            .filter(|(_, spell)| !self.spells.contains(spell))
            .collect()
    }
}

/// Startup system that reads the data tables into the `GameData` resource
pub fn load_game_data(mut commands: Commands, config: Res<crate::config::GameConfig>) {
    let data = match GameData::load(&config.data_directory) {
        Ok(data) => {
            info!(
                "Loaded {} jobs and {} spells from {:?}",
                data.jobs.len(),
                data.spells.len(),
                config.data_directory
            );
            data
        }
        Err(e) => {
            error!("Failed to load game data from {:?}: {}", config.data_directory, e);
            GameData::default()
        }
    };

    for (job, spell) in data.unknown_start_spells() {
        debug!("Job {} starts with unknown spell {}", job, spell);
    }

    commands.insert_resource(data);
}
