use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Level 1 attributes of a party member
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u32,
    pub mp: u32,
    pub strength: u32,
    pub agility: u32,
    pub constitution: u32,
    pub intelligence: u32,
    pub will: u32,
    pub luck: u32,
}

/// Growth coefficients of a job
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Growth {
    pub hp: f32,
    pub mp: f32,
    #[serde(rename = "str")]
    pub strength: f32,
    #[serde(rename = "agi")]
    pub agility: f32,
    #[serde(rename = "con")]
    pub constitution: f32,
    #[serde(rename = "int")]
    pub intelligence: f32,
    pub will: f32,
    pub luck: f32,
}

/// Gear equipped when a character is first recruited
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartGear {
    pub main_hand: Option<String>,
    pub off_hand: Option<String>,
    pub armor: Option<String>,
    pub accessory1: Option<String>,
    pub accessory2: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    pub growth: Growth,
    /// Weapon and armor kinds the job can equip
    #[serde(default)]
    pub equipset: Vec<String>,
    /// Passive learned at each level
    #[serde(default)]
    pub passive_learnset: BTreeMap<u32, String>,
    #[serde(default)]
    pub ability_learnset: BTreeMap<u32, String>,
    #[serde(default)]
    pub heroics: Vec<String>,
    #[serde(default)]
    pub start_gear: StartGear,
    /// Spells in the spellbook on recruitment, by level
    #[serde(default)]
    pub start_spells: BTreeMap<u32, Vec<String>>,
}

impl Job {
    /// Stats of a level 1 character with this job
    pub fn base_stats(&self) -> BaseStats {
        let g = &self.growth;
        let scaled = |coefficient: f32, factor: f32| (coefficient * factor).round() as u32;
        BaseStats {
            hp: scaled(g.hp, 20.0),
            mp: scaled(g.mp, 20.0),
            strength: scaled(g.strength, 10.0),
            agility: scaled(g.agility, 10.0),
            constitution: scaled(g.constitution, 10.0),
            intelligence: scaled(g.intelligence, 10.0),
            will: scaled(g.will, 10.0),
            luck: scaled(g.luck, 10.0),
        }
    }

    /// Passives learned at or below `level`, in level order
    pub fn passives_at(&self, level: u32) -> impl Iterator<Item = &str> {
        self.passive_learnset
            .range(..=level)
            .map(|(_, passive)| passive.as_str())
    }

    /// Starting spells for a character recruited at `level`
    pub fn start_spells_at(&self, level: u32) -> impl Iterator<Item = &str> {
        self.start_spells
            .range(..=level)
            .flat_map(|(_, spells)| spells.iter().map(String::as_str))
    }
}

/// All jobs, keyed by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobTable {
    jobs: BTreeMap<String, Job>,
}

impl JobTable {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let jobs: Vec<Job> = serde_json::from_str(text)?;
        Ok(Self::from_jobs(jobs))
    }

    pub fn from_jobs(jobs: impl IntoIterator<Item = Job>) -> Self {
        Self {
            jobs: jobs.into_iter().map(|job| (job.name.clone(), job)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Job> {
        self.jobs.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}
