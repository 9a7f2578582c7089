use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const UNKNOWN_TEAM: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InjuryStatus {
    #[default]
    Active,
    Probable,
    Questionable,
    #[serde(rename = "OUT", alias = "Out")]
    Out,
}

impl InjuryStatus {
    pub fn label(self) -> &'static str {
        match self {
            InjuryStatus::Active => "Active",
            InjuryStatus::Probable => "Probable",
            InjuryStatus::Questionable => "Questionable",
            InjuryStatus::Out => "OUT",
        }
    }
}

impl fmt::Display for InjuryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryRecord {
    pub player: String,
    pub status: InjuryStatus,
    #[serde(default)]
    pub injury: Option<String>,
    #[serde(default = "unknown_team")]
    pub team: String,
}

fn unknown_team() -> String {
    UNKNOWN_TEAM.to_string()
}

impl InjuryRecord {
    pub fn new(player: &str, status: InjuryStatus, injury: Option<&str>, team: &str) -> Self {
        Self {
            player: player.to_string(),
            status,
            injury: injury.map(str::to_string),
            team: team.to_string(),
        }
    }

    /// Record returned when nobody in the table matches.
    pub fn healthy(player: &str) -> Self {
        Self {
            player: player.to_string(),
            status: InjuryStatus::Active,
            injury: None,
            team: unknown_team(),
        }
    }
}

/// Injury reference table. Iteration order is insertion order and decides
/// which entry wins when several match.
#[derive(Debug, Clone, Default)]
pub struct InjuryTable {
    entries: Vec<InjuryRecord>,
}

impl InjuryTable {
    pub fn new(entries: Vec<InjuryRecord>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[InjuryRecord] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Table shipped with the app; replaced by `INJURY_TABLE_PATH` when set.
    pub fn builtin() -> Self {
        use InjuryStatus::*;
        Self::new(vec![
            InjuryRecord::new("Kevin Durant", Active, None, "HOU"),
            InjuryRecord::new("Karl-Anthony Towns", Active, None, "NYK"),
            InjuryRecord::new("Dillon Brooks", Active, None, "PHX"),
            InjuryRecord::new("Desmond Bane", Active, None, "ORL"),
            InjuryRecord::new("Cade Cunningham", Active, None, "DET"),
            InjuryRecord::new("Anthony Black", Active, None, "ORL"),
            InjuryRecord::new("Devin Booker", Out, Some("Hip Strain"), "PHX"),
            InjuryRecord::new("Franz Wagner", Out, Some("Ankle"), "ORL"),
            InjuryRecord::new("Jalen Suggs", Questionable, Some("Back"), "ORL"),
            InjuryRecord::new("Fred VanVleet", Out, Some("Knee"), "HOU"),
            InjuryRecord::new("Joel Embiid", Out, Some("Knee"), "PHI"),
            InjuryRecord::new("Giannis Antetokounmpo", Probable, Some("Knee"), "MIL"),
        ])
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let entries: Vec<InjuryRecord> =
            serde_json::from_str(raw.trim()).context("invalid injury table json")?;
        Ok(Self::new(entries))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read injury table {}", path.display()))?;
        Self::from_json(&raw)
    }

    pub fn resolve(&self, player_name: &str) -> InjuryRecord {
        resolve_injury(player_name, self)
    }
}

/// Finds the first table entry whose name contains the player name, or is
/// contained in it, ignoring case.
///
/// Short fragments match loosely: "Black" would also hit "Anthony Blackwell".
/// Callers rely on that to absorb suffixes and partial names from the feed.
pub fn resolve_injury(player_name: &str, table: &InjuryTable) -> InjuryRecord {
    let needle = player_name.to_lowercase();
    for entry in &table.entries {
        let name = entry.player.to_lowercase();
        if name.contains(&needle) || needle.contains(&name) {
            return entry.clone();
        }
    }
    InjuryRecord::healthy(player_name)
}
