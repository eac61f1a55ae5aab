//! Pathfinding integration tests

use std::sync::Arc;

use proptest::prelude::*;

use hex_dominion::core::config::GameConfig;
use hex_dominion::data::{ModifierData, StaticData};
use hex_dominion::map::*;

fn land_grid(width: u32, height: u32, data: StaticData) -> HexGrid {
    let config = GameConfig::default().with_size(width, height);
    HexGrid::new(&config, Arc::new(data), TileType::Land).unwrap()
}

/// Cheapest entry cost from `start` to every tile, by relaxing edges until
/// nothing changes
fn brute_force_costs(grid: &HexGrid, start: MapCoord) -> Vec<(MapCoord, f64)> {
    let coords: Vec<MapCoord> = grid.coords().collect();
    let mut cost: Vec<f64> = coords
        .iter()
        .map(|&c| if c == start { 0.0 } else { f64::INFINITY })
        .collect();
    let index = |c: MapCoord| (c.row as usize) * grid.width() as usize + c.col as usize;

    let mut changed = true;
    while changed {
        changed = false;
        for &from in &coords {
            let base = cost[index(from)];
            if base.is_infinite() {
                continue;
            }
            for to in grid.neighbors(from, 1) {
                let candidate = base + grid.tile(to).unwrap().weight();
                if candidate < cost[index(to)] - 1e-9 {
                    cost[index(to)] = candidate;
                    changed = true;
                }
            }
        }
    }
    coords.into_iter().zip(cost).collect()
}

fn terrain_strategy() -> impl Strategy<Value = TileType> {
    prop::sample::select(TileType::all().to_vec())
}

#[test]
fn test_obstacle_is_routed_around() {
    let mut data = StaticData::builtin().unwrap();
    data.modifiers.insert(
        "wall".into(),
        ModifierData {
            weight: 9.0,
            image: "wall".into(),
        },
    );
    let mut grid = land_grid(5, 5, data);
    let obstacle = MapCoord::new(1, 0);
    grid.set_modifier(obstacle, Some("wall")).unwrap();
    assert_eq!(grid.tile(obstacle).unwrap().weight(), 10.0);

    let start = MapCoord::new(0, 0);
    let goal = MapCoord::new(2, 0);
    let path = find_path(&grid, start, goal).unwrap();

    assert!(!path.contains(&obstacle));
    assert_eq!(path.last(), Some(&goal));
    let through = path_cost(&grid, &[obstacle, goal]);
    assert!(path_cost(&grid, &path) < through);
}

#[test]
fn test_same_tile_path_is_empty() {
    let grid = land_grid(5, 5, StaticData::builtin().unwrap());
    let c = MapCoord::new(2, 2);
    assert_eq!(find_path(&grid, c, c).unwrap(), Vec::<MapCoord>::new());
}

#[test]
fn test_walled_off_goal_has_no_path() {
    let grid = land_grid(6, 6, StaticData::builtin().unwrap());
    let goal = MapCoord::new(3, 3);
    let mut ring = grid.neighbors(goal, 1);
    ring.sort();
    let result = find_path_filtered(&grid, MapCoord::new(0, 0), goal, |t| !ring.contains(&t.coord()));
    assert_eq!(
        result,
        Err(PathError::NoPath {
            start: MapCoord::new(0, 0),
            goal
        })
    );
}

#[test]
fn test_out_of_bounds_goal_has_no_path() {
    let grid = land_grid(4, 4, StaticData::builtin().unwrap());
    assert!(find_path(&grid, MapCoord::new(0, 0), MapCoord::new(9, 9)).is_err());
}

proptest! {
    #[test]
    fn prop_astar_matches_brute_force(
        terrain in prop::collection::vec(terrain_strategy(), 20),
        start in (0i32..5, 0i32..4),
        goal in (0i32..5, 0i32..4),
    ) {
        let mut grid = land_grid(5, 4, StaticData::builtin().unwrap());
        let coords: Vec<MapCoord> = grid.coords().collect();
        for (coord, tile_type) in coords.into_iter().zip(terrain) {
            grid.set_terrain(coord, tile_type).unwrap();
        }
        let start = MapCoord::new(start.0, start.1);
        let goal = MapCoord::new(goal.0, goal.1);

        let path = find_path(&grid, start, goal).unwrap();
        let expected = brute_force_costs(&grid, start)
            .into_iter()
            .find(|(c, _)| *c == goal)
            .map(|(_, cost)| cost)
            .unwrap();
        prop_assert!((path_cost(&grid, &path) - expected).abs() < 1e-9);

        // Well-formed: excludes start, ends at goal, every step adjacent
        prop_assert!(!path.contains(&start) || start == goal);
        if start != goal {
            prop_assert_eq!(path.last().copied(), Some(goal));
        }
        let mut prev = start;
        for &step in &path {
            prop_assert!(grid.are_adjacent(prev, step));
            prev = step;
        }
    }

    #[test]
    fn prop_dist_is_symmetric(
        a in (0i32..12, 0i32..12),
        b in (0i32..12, 0i32..12),
    ) {
        let grid = land_grid(12, 12, StaticData::builtin().unwrap());
        let a = MapCoord::new(a.0, a.1);
        let b = MapCoord::new(b.0, b.1);
        prop_assert_eq!(grid.dist(a, a), 0.0);
        prop_assert!((grid.dist(a, b) - grid.dist(b, a)).abs() < 1e-9);
    }
}
