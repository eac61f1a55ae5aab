//! Static data tables (terrain, modifiers, unit templates)
//!
//! Loaded once from TOML and treated as immutable. A lookup by an unknown
//! key is a configuration error and is surfaced immediately.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{CoreError, Result};
use crate::map::terrain::{Modifier, TerrainData, TileType};

/// Built-in tables shipped with the crate
const BUILTIN_TABLES: &str = include_str!("../../data/tables.toml");

/// Per-modifier row as written in the tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierData {
    pub weight: f64,
    pub image: String,
}

/// Unit stat sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTemplate {
    /// Movement points restored every turn
    pub movement: f64,
    pub health: f64,
    /// Production needed for a settlement to complete this unit
    pub cost: f64,
    /// Can found a settlement
    #[serde(default)]
    pub settles: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticData {
    #[serde(default)]
    pub terrain: BTreeMap<String, TerrainData>,
    #[serde(default)]
    pub modifiers: BTreeMap<String, ModifierData>,
    #[serde(default)]
    pub units: BTreeMap<String, UnitTemplate>,
}

impl StaticData {
    /// The tables embedded in the crate
    pub fn builtin() -> Result<Self> {
        Self::parse_toml(BUILTIN_TABLES)
    }

    /// Load tables from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse tables from a TOML string and validate them
    pub fn parse_toml(content: &str) -> Result<Self> {
        let data: StaticData = toml::from_str(content)?;
        data.validate()?;
        Ok(data)
    }

    /// Every terrain type needs a row and every weight must be usable as a cost
    pub fn validate(&self) -> Result<()> {
        for tile_type in TileType::all() {
            self.terrain(tile_type)?;
        }
        for (name, terrain) in &self.terrain {
            if !(terrain.weight.is_finite() && terrain.weight >= 0.0) {
                return Err(CoreError::InvalidConfig(format!(
                    "terrain '{}' has invalid weight {}",
                    name, terrain.weight
                )));
            }
        }
        for (name, modifier) in &self.modifiers {
            if !(modifier.weight.is_finite() && modifier.weight >= 0.0) {
                return Err(CoreError::InvalidConfig(format!(
                    "modifier '{}' has invalid weight {}",
                    name, modifier.weight
                )));
            }
        }
        let positive = |v: f64| v.is_finite() && v > 0.0;
        for (name, unit) in &self.units {
            if !(positive(unit.movement) && positive(unit.health) && positive(unit.cost)) {
                return Err(CoreError::InvalidConfig(format!(
                    "unit '{}' needs finite positive movement, health and cost",
                    name
                )));
            }
        }
        Ok(())
    }

    pub fn terrain(&self, tile_type: TileType) -> Result<&TerrainData> {
        self.terrain
            .get(tile_type.key())
            .ok_or_else(|| CoreError::UnknownTerrain(tile_type.key().to_string()))
    }

    /// Resolve a modifier by name
    pub fn modifier(&self, name: &str) -> Result<Modifier> {
        let data = self
            .modifiers
            .get(name)
            .ok_or_else(|| CoreError::UnknownModifier(name.to_string()))?;
        Ok(Modifier {
            name: name.to_string(),
            weight: data.weight,
            image: data.image.clone(),
        })
    }

    pub fn unit(&self, name: &str) -> Result<&UnitTemplate> {
        self.units
            .get(name)
            .ok_or_else(|| CoreError::UnknownUnitTemplate(name.to_string()))
    }

    pub fn modifier_names(&self) -> impl Iterator<Item = &str> {
        self.modifiers.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_load() {
        let data = StaticData::builtin().unwrap();
        assert_eq!(data.terrain(TileType::Land).unwrap().weight, 1.0);
        assert!(data.modifier("forest").is_ok());
        assert!(data.unit("settler").unwrap().settles);
        assert!(!data.unit("warrior").unwrap().settles);
    }

    #[test]
    fn test_unknown_modifier_is_config_error() {
        let data = StaticData::builtin().unwrap();
        let err = data.modifier("lava").unwrap_err();
        assert!(matches!(err, CoreError::UnknownModifier(ref name) if name == "lava"));
        assert!(err.is_config_error());
    }

    #[test]
    fn test_missing_terrain_row_rejected() {
        let toml = r##"
            [terrain.land]
            weight = 1.0
            color = "#00ff00"
        "##;
        let err = StaticData::parse_toml(toml).unwrap_err();
        assert!(matches!(err, CoreError::UnknownTerrain(_)));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut data = StaticData::builtin().unwrap();
        data.modifiers.insert(
            "pit".into(),
            ModifierData {
                weight: -3.0,
                image: "pit".into(),
            },
        );
        assert!(data.validate().is_err());
    }

    #[test]
    fn test_nan_unit_stats_rejected() {
        let base = StaticData::builtin().unwrap();
        let spoilers: [fn(&mut UnitTemplate); 3] = [
            |u| u.movement = f64::NAN,
            |u| u.health = f64::NAN,
            |u| u.cost = f64::INFINITY,
        ];
        for spoil in spoilers {
            let mut data = base.clone();
            if let Some(warrior) = data.units.get_mut("warrior") {
                spoil(warrior);
            }
            let err = data.validate().unwrap_err();
            assert!(err.is_config_error());
        }
    }
}
