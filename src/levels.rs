//! Level configuration
//!
//! Five built-in levels of increasing difficulty. Hosts may supply their own
//! table as JSON. Lookups of unknown level numbers fall back to the first
//! level instead of failing.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::ConfigError;

/// Stage props the ball can bounce off
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObstacleKind {
    /// Wedge floor monitor (80x60)
    StageMonitor,
    /// Stacked amplifiers (70x100)
    AmpStack,
    /// Rotating stage light (r=25). Spin is cosmetic.
    SpinningLight {
        #[serde(default = "default_spin_speed")]
        spin_speed: f32,
    },
}

fn default_spin_speed() -> f32 {
    2.0
}

impl ObstacleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObstacleKind::StageMonitor => "stage_monitor",
            ObstacleKind::AmpStack => "amp_stack",
            ObstacleKind::SpinningLight { .. } => "spinning_light",
        }
    }
}

/// An obstacle placed in a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    #[serde(flatten)]
    pub kind: ObstacleKind,
    pub x: f32,
    pub y: f32,
}

impl ObstacleSpec {
    pub fn new(kind: ObstacleKind, x: f32, y: f32) -> Self {
        Self { kind, x, y }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Per-level parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Multiplier for glass size and scoring radius
    pub glass_size: f32,
    pub starting_balls: u32,
    /// Hits needed to clear the level
    pub goal_shots: u32,
    /// Multiplier on the crowd bump interval (higher = less frequent)
    #[serde(default = "one")]
    pub crowd_bump_frequency: f32,
    /// Multiplier on the crowd bump offset
    #[serde(default = "one")]
    pub crowd_bump_strength: f32,
    #[serde(default)]
    pub obstacles: Vec<ObstacleSpec>,
    #[serde(default)]
    pub tutorial: bool,
}

fn one() -> f32 {
    1.0
}

/// Ordered list of levels (ids are 1-based). Never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LevelConfig>", into = "Vec<LevelConfig>")]
pub struct LevelTable {
    levels: Vec<LevelConfig>,
}

impl TryFrom<Vec<LevelConfig>> for LevelTable {
    type Error = ConfigError;

    fn try_from(levels: Vec<LevelConfig>) -> Result<Self, Self::Error> {
        Self::new(levels)
    }
}

impl From<LevelTable> for Vec<LevelConfig> {
    fn from(table: LevelTable) -> Self {
        table.levels
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelTable {
    /// The shipped campaign
    pub fn builtin() -> Self {
        use ObstacleKind::*;

        let levels = vec![
            LevelConfig {
                id: 1,
                name: "Sound Check".into(),
                description: "Get familiar with the controls".into(),
                glass_size: 1.0,
                starting_balls: 10,
                goal_shots: 1,
                crowd_bump_frequency: 1.2,
                crowd_bump_strength: 0.7,
                obstacles: Vec::new(),
                tutorial: true,
            },
            LevelConfig {
                id: 2,
                name: "Opening Act".into(),
                description: "Things are heating up".into(),
                glass_size: 0.9,
                starting_balls: 10,
                goal_shots: 2,
                crowd_bump_frequency: 1.0,
                crowd_bump_strength: 0.9,
                obstacles: vec![ObstacleSpec::new(StageMonitor, 500.0, 270.0)],
                tutorial: false,
            },
            LevelConfig {
                id: 3,
                name: "Main Set".into(),
                description: "The crowd is going wild!".into(),
                glass_size: 0.75,
                starting_balls: 10,
                goal_shots: 3,
                crowd_bump_frequency: 0.9,
                crowd_bump_strength: 1.0,
                obstacles: vec![
                    ObstacleSpec::new(StageMonitor, 500.0, 270.0),
                    ObstacleSpec::new(AmpStack, 270.0, 250.0),
                ],
                tutorial: false,
            },
            LevelConfig {
                id: 4,
                name: "Encore".into(),
                description: "Pure chaos on stage!".into(),
                glass_size: 0.65,
                starting_balls: 10,
                goal_shots: 4,
                crowd_bump_frequency: 0.8,
                crowd_bump_strength: 1.2,
                obstacles: vec![
                    ObstacleSpec::new(StageMonitor, 500.0, 270.0),
                    ObstacleSpec::new(AmpStack, 230.0, 250.0),
                    ObstacleSpec::new(SpinningLight { spin_speed: 3.0 }, 130.0, 180.0),
                ],
                tutorial: false,
            },
            LevelConfig {
                id: 5,
                name: "Legendary Show".into(),
                description: "Only legends survive this!".into(),
                glass_size: 0.55,
                starting_balls: 10,
                goal_shots: 5,
                crowd_bump_frequency: 0.7,
                crowd_bump_strength: 1.4,
                obstacles: vec![
                    ObstacleSpec::new(StageMonitor, 470.0, 270.0),
                    ObstacleSpec::new(StageMonitor, 570.0, 270.0),
                    ObstacleSpec::new(AmpStack, 230.0, 250.0),
                    ObstacleSpec::new(SpinningLight { spin_speed: 4.0 }, 130.0, 180.0),
                    ObstacleSpec::new(SpinningLight { spin_speed: 3.0 }, 700.0, 180.0),
                ],
                tutorial: false,
            },
        ];

        Self { levels }
    }

    /// Parse a level table from a JSON array of levels
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let levels: Vec<LevelConfig> = serde_json::from_str(json)?;
        Self::new(levels)
    }

    /// Build a table, sorting by id and rejecting unusable levels
    pub fn new(mut levels: Vec<LevelConfig>) -> Result<Self, ConfigError> {
        if levels.is_empty() {
            return Err(ConfigError::Invalid("level table is empty".into()));
        }
        levels.sort_by_key(|l| l.id);
        for level in &levels {
            if level.goal_shots == 0 {
                return Err(ConfigError::Invalid(format!(
                    "level {} has goal_shots = 0",
                    level.id
                )));
            }
            if level.glass_size <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "level {} has non-positive glass_size",
                    level.id
                )));
            }
        }
        log::info!("Level table with {} levels", levels.len());
        Ok(Self { levels })
    }

    /// Look up a level, falling back to the first one when it doesn't exist
    pub fn get(&self, level: u32) -> &LevelConfig {
        match self.levels.iter().find(|l| l.id == level) {
            Some(config) => config,
            None => {
                log::warn!("Level {} not found, returning level {}", level, self.levels[0].id);
                &self.levels[0]
            }
        }
    }

    pub fn exists(&self, level: u32) -> bool {
        self.levels.iter().any(|l| l.id == level)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn first_id(&self) -> u32 {
        self.levels[0].id
    }

    /// Id of the level after `level`, if any
    pub fn next_id(&self, level: u32) -> Option<u32> {
        self.levels.iter().map(|l| l.id).find(|&id| id > level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_level_falls_back_to_first() {
        let table = LevelTable::builtin();
        assert_eq!(table.get(999), table.get(1));
        assert_eq!(table.get(0).id, 1);
        assert!(!table.exists(999));
    }

    #[test]
    fn test_difficulty_progression() {
        let table = LevelTable::builtin();
        assert_eq!(table.len(), 5);
        for pair in (1..=4).map(|i| (table.get(i), table.get(i + 1))) {
            assert!(pair.1.glass_size < pair.0.glass_size);
            assert!(pair.1.goal_shots > pair.0.goal_shots);
        }
        assert_eq!(table.next_id(5), None);
        assert_eq!(table.next_id(2), Some(3));
    }

    #[test]
    fn test_from_json() {
        let json = r#"[
            { "id": 2, "name": "Two", "glass_size": 0.5, "starting_balls": 3, "goal_shots": 1,
              "obstacles": [ { "type": "spinning_light", "x": 10.0, "y": 20.0 } ] },
            { "id": 1, "name": "One", "glass_size": 1.0, "starting_balls": 5, "goal_shots": 2 }
        ]"#;
        let table = LevelTable::from_json(json).unwrap();
        assert_eq!(table.first_id(), 1);
        let two = table.get(2);
        assert_eq!(two.crowd_bump_frequency, 1.0);
        assert_eq!(
            two.obstacles[0].kind,
            ObstacleKind::SpinningLight { spin_speed: 2.0 }
        );
    }

    #[test]
    fn test_zero_goal_rejected() {
        let json = r#"[ { "id": 1, "name": "Bad", "glass_size": 1.0, "starting_balls": 5, "goal_shots": 0 } ]"#;
        assert!(matches!(
            LevelTable::from_json(json),
            Err(ConfigError::Invalid(_))
        ));
        assert!(LevelTable::new(Vec::new()).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        assert!(serde_json::from_str::<LevelTable>("[]").is_err());
        assert!(serde_json::from_str::<LevelTable>(r#"{ "levels": [] }"#).is_err());

        let json = serde_json::to_string(&LevelTable::builtin()).unwrap();
        let table: LevelTable = serde_json::from_str(&json).unwrap();
        assert_eq!(table, LevelTable::builtin());
        assert_eq!(table.first_id(), 1);
    }
}
