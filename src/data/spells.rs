use super::jobs::BaseStats;
use super::DataError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Highest spell slot rank
pub const MAX_SPELL_RANK: u8 = 7;

/// School of magic a spell belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum School {
    Nature,
    Elemental,
    Crystal,
}

impl School {
    /// Attribute that scales spells of this school
    pub fn primary_stat(self, stats: &BaseStats) -> u32 {
        match self {
            School::Nature => stats.will,
            School::Elemental => stats.intelligence,
            School::Crystal => stats.luck,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spell {
    pub id: String,
    pub name: String,
    pub school: School,
    /// How the spell behaves, e.g. "heal", "single"
    #[serde(default)]
    pub flags: Vec<String>,
    /// Jobs that can slot this spell
    #[serde(default)]
    pub allowed_jobs: Vec<String>,
    /// Spell slot rank, 1 to 7
    pub rank: u8,
    pub potency: u32,
}

impl Spell {
    pub fn allows_job(&self, job: &str) -> bool {
        self.allowed_jobs.iter().any(|allowed| allowed == job)
    }

    /// Damage or healing when cast by a caster with `stats` at `level`
    pub fn damage(&self, stats: &BaseStats, level: u32) -> u64 {
        spell_damage(self.school.primary_stat(stats), level, self.potency)
    }
}

/// Direct damage and healing of a spell
///
/// X = P + P * floor(L^2 / 2), output = X + floor(X * S / 100)
///
/// Integer arithmetic throughout; results beyond `u64::MAX` saturate there.
pub fn spell_damage(stat: u32, level: u32, potency: u32) -> u64 {
    let level = u64::from(level);
    let potency = u64::from(potency);
    let base = (level * level / 2)
        .saturating_mul(potency)
        .saturating_add(potency);
    let scaled = u128::from(base) + u128::from(base) * u128::from(stat) / 100;
    u64::try_from(scaled).unwrap_or(u64::MAX)
}

/// All spells, keyed by id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpellBook {
    spells: BTreeMap<String, Spell>,
}

impl SpellBook {
    pub fn from_json(text: &str) -> Result<Self, DataError> {
        let spells: Vec<Spell> = serde_json::from_str(text)?;
        Self::from_spells(spells)
    }

    /// Build the book, rejecting spells ranked outside 1 to 7
    pub fn from_spells(spells: impl IntoIterator<Item = Spell>) -> Result<Self, DataError> {
        let mut book = BTreeMap::new();
        for spell in spells {
            if !(1..=MAX_SPELL_RANK).contains(&spell.rank) {
                return Err(DataError::InvalidRank {
                    spell: spell.id,
                    rank: spell.rank,
                });
            }
            book.insert(spell.id.clone(), spell);
        }
        Ok(Self { spells: book })
    }

    pub fn get(&self, id: &str) -> Option<&Spell> {
        self.spells.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.spells.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPELLS: &str = include_str!("../../assets/data/spells.json");

    #[test]
    fn test_spell_damage() {
        // X = 30 + 30 * 0 = 30 at level 1
        assert_eq!(spell_damage(0, 1, 30), 30);
        assert_eq!(spell_damage(50, 1, 30), 45);
        // Level 3: floor(9 / 2) = 4, X = 150
        assert_eq!(spell_damage(25, 3, 30), 187);
        assert_eq!(spell_damage(100, 10, 10), 1020);
    }

    #[test]
    fn test_spell_damage_large_inputs() {
        // Well past u32::MAX but still exact
        assert_eq!(spell_damage(0, 100_000, 1_000_000_000), 5_000_000_001_000_000_000);
        assert_eq!(spell_damage(100, 100_000, 1_000_000_000), 10_000_000_002_000_000_000);
        assert_eq!(spell_damage(u32::MAX, u32::MAX, u32::MAX), u64::MAX);
    }

    #[test]
    fn test_lesser_mend() {
        let book = SpellBook::from_json(SPELLS).unwrap();
        let mend = book.get("lessermend").expect("lessermend should be defined");

        assert_eq!(mend.name, "Lesser Mend");
        assert_eq!(mend.school, School::Nature);
        assert_eq!(mend.flags, ["heal", "single"]);
        assert!(mend.allows_job("Storm Shaman"));
        assert!(!mend.allows_job("Fighter"));
        assert!(mend.allows_job("Mage"));

        // Nature spells scale with will
        let caster = BaseStats {
            will: 50,
            intelligence: 90,
            ..BaseStats::default()
        };
        assert_eq!(mend.damage(&caster, 1), 45);
        assert_eq!(mend.damage(&caster, 3), 225);
    }

    #[test]
    fn test_rejects_invalid_rank() {
        let text = r#"[{
            "id": "miracle", "name": "Miracle", "school": "Nature",
            "rank": 8, "potency": 100
        }]"#;
        assert!(matches!(
            SpellBook::from_json(text),
            Err(DataError::InvalidRank { rank: 8, .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_school() {
        let text = r#"[{
            "id": "shadow", "name": "Shadow", "school": "Void",
            "rank": 1, "potency": 10
        }]"#;
        assert!(matches!(SpellBook::from_json(text), Err(DataError::Json(_))));
    }
}
