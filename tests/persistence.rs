//! Map snapshot integration tests

use std::sync::Arc;

use hex_dominion::core::config::GameConfig;
use hex_dominion::data::StaticData;
use hex_dominion::map::*;

fn data() -> Arc<StaticData> {
    Arc::new(StaticData::builtin().unwrap())
}

#[test]
fn test_generated_map_survives_json() {
    let config = GameConfig::default().with_size(24, 18).with_seed(11);
    let grid = generate(&config, data()).unwrap();

    let json = serde_json::to_string(&grid.snapshot()).unwrap();
    let snapshot: MapSnapshot = serde_json::from_str(&json).unwrap();
    let restored = HexGrid::restore(&snapshot, &config, data()).unwrap();

    assert_eq!(restored.tile_count(), grid.tile_count());
    for (a, b) in grid.tiles().zip(restored.tiles()) {
        assert_eq!(a.coord(), b.coord());
        assert_eq!(a.tile_type(), b.tile_type());
        assert_eq!(a.modifier(), b.modifier());
        assert_eq!(a.weight(), b.weight());
        assert_eq!(a.pos(), b.pos());
    }
}

#[test]
fn test_persisted_tile_shape() {
    let config = GameConfig::default().with_size(2, 1);
    let mut grid = HexGrid::new(&config, data(), TileType::DarkLand).unwrap();
    grid.set_modifier(MapCoord::new(1, 0), Some("road")).unwrap();

    let value = serde_json::to_value(grid.snapshot()).unwrap();
    let tile = &value["tiles"][1];
    assert_eq!(tile["type"], "dark_land");
    assert_eq!(tile["mapPos"]["col"], 1);
    assert_eq!(tile["displayModifier"], true);
    assert_eq!(tile["modifier"], "road");
    assert!(tile.get("pos").is_none());
    assert!(value["tiles"][0]["modifier"].is_null());
}

#[test]
fn test_snapshot_from_other_tables_is_rejected() {
    let config = GameConfig::default().with_size(3, 3);
    let mut grid = HexGrid::new(&config, data(), TileType::Land).unwrap();
    grid.set_modifier(MapCoord::new(0, 0), Some("forest")).unwrap();
    let snapshot = grid.snapshot();

    let mut sparse = StaticData::builtin().unwrap();
    sparse.modifiers.remove("forest");
    let err = HexGrid::restore(&snapshot, &config, Arc::new(sparse)).unwrap_err();
    assert!(err.is_config_error());
}
