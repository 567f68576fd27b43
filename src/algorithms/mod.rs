//! Implementation of search algorithms.
//!
//! Every strategy shares the expansion engine from [`crate::search`]. The
//! single-direction ones are a [`TreeSearch`] over a different frontier.

pub mod bidirectional;
pub mod frontier;
pub mod tree_search;

use derive_more::Display;
use thiserror::Error;

use crate::problem::MazeSpace;
use crate::search::Solution;
use crate::space::Coordinate;

pub use bidirectional::BidirectionalSearch;
pub use tree_search::TreeSearch;

use frontier::AStarRank;
use frontier::GreedyRank;
use frontier::Queue;
use frontier::Ranked;
use frontier::Stack;

pub type DepthFirstSearch<'s> = TreeSearch<'s, Stack>;
pub type BreadthFirstSearch<'s> = TreeSearch<'s, Queue>;
pub type GreedyBestFirstSearch<'s> = TreeSearch<'s, Ranked<GreedyRank>>;
pub type AStarSearch<'s> = TreeSearch<'s, Ranked<AStarRank>>;

/// Depth at which `CUS1` stops expanding nodes unless told otherwise.
pub const DEFAULT_DEPTH_LIMIT: u32 = 12;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Strategy {
    #[display("DFS")]
    Dfs,
    #[display("BFS")]
    Bfs,
    #[display("GBFS")]
    Gbfs,
    #[display("AS")]
    AStar,
    #[display("CUS1")]
    DepthLimited { limit: u32 },
    #[display("CUS2")]
    Bidirectional,
}

impl Strategy {
    /// Searches for a path from `start` to `goal`.
    #[must_use]
    pub fn run(&self, space: &MazeSpace, start: Coordinate, goal: Coordinate) -> Solution {
        log::debug!("{self} search from {start} to {goal}");
        match *self {
            Strategy::Dfs => DepthFirstSearch::new(space, start, goal).run(),
            Strategy::Bfs => BreadthFirstSearch::new(space, start, goal).run(),
            Strategy::Gbfs => GreedyBestFirstSearch::new(space, start, goal).run(),
            Strategy::AStar => AStarSearch::new(space, start, goal).run(),
            Strategy::DepthLimited { limit } => DepthFirstSearch::new(space, start, goal)
                .with_depth_limit(limit)
                .run(),
            Strategy::Bidirectional => BidirectionalSearch::new(space, start, goal).run(),
        }
    }

    pub fn name(&self) -> StrategyName {
        match self {
            Strategy::Dfs => StrategyName::Dfs,
            Strategy::Bfs => StrategyName::Bfs,
            Strategy::Gbfs => StrategyName::Gbfs,
            Strategy::AStar => StrategyName::As,
            Strategy::DepthLimited { .. } => StrategyName::Cus1,
            Strategy::Bidirectional => StrategyName::Cus2,
        }
    }
}

/// The method names strategies are selected by.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum StrategyName {
    #[display("DFS")]
    Dfs,
    #[display("BFS")]
    Bfs,
    #[display("GBFS")]
    Gbfs,
    #[display("AS")]
    As,
    #[display("CUS1")]
    Cus1,
    #[display("CUS2")]
    Cus2,
}

impl StrategyName {
    pub const ALL: [StrategyName; 6] = [
        StrategyName::Dfs,
        StrategyName::Bfs,
        StrategyName::Gbfs,
        StrategyName::As,
        StrategyName::Cus1,
        StrategyName::Cus2,
    ];

    /// The strategy behind this name. Only `CUS1` uses `depth_limit`.
    pub fn strategy(&self, depth_limit: u32) -> Strategy {
        match self {
            StrategyName::Dfs => Strategy::Dfs,
            StrategyName::Bfs => Strategy::Bfs,
            StrategyName::Gbfs => Strategy::Gbfs,
            StrategyName::As => Strategy::AStar,
            StrategyName::Cus1 => Strategy::DepthLimited { limit: depth_limit },
            StrategyName::Cus2 => Strategy::Bidirectional,
        }
    }
}

impl From<StrategyName> for Strategy {
    fn from(name: StrategyName) -> Self {
        name.strategy(DEFAULT_DEPTH_LIMIT)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown search method '{0}'. Expected one of DFS, BFS, GBFS, AS, CUS1 or CUS2")]
pub struct UnknownStrategyError(pub String);

impl std::str::FromStr for StrategyName {
    type Err = UnknownStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyName::ALL
            .into_iter()
            .find(|name| name.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStrategyError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use indoc::indoc;
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    use super::*;
    use crate::problem::MazeSize;
    use crate::problem::Problem;
    use crate::search::SearchNode;
    use crate::search::Status;

    fn all() -> impl Iterator<Item = Strategy> {
        StrategyName::ALL.into_iter().map(Strategy::from)
    }

    fn assert_walkable(space: &MazeSpace, start: Coordinate, path: &[SearchNode]) {
        let mut at = start;
        for node in path {
            at = at.apply(node.direction.unwrap());
            assert_eq!(at, node.coordinates);
            assert!(space.is_free(&at));
        }
    }

    /// The classic robot navigation map.
    fn robot_nav() -> Problem {
        Problem::try_from(indoc! {"
            [5,11]
            (0,1)
            (7,0) | (10,3)
            (2,0,2,2)
            (8,0,1,2)
            (10,0,1,1)
            (2,3,1,2)
            (3,4,3,1)
            (9,3,1,1)
            (8,4,2,1)
        "})
        .unwrap()
    }

    #[test]
    fn parse_names() {
        assert_eq!(StrategyName::from_str("DFS"), Ok(StrategyName::Dfs));
        assert_eq!(StrategyName::from_str("as"), Ok(StrategyName::As));
        assert_eq!(StrategyName::from_str(" cus2 "), Ok(StrategyName::Cus2));
        assert_eq!(
            StrategyName::from_str("IDS"),
            Err(UnknownStrategyError("IDS".to_string()))
        );
        for name in StrategyName::ALL {
            assert_eq!(Strategy::from(name).name(), name);
            assert_eq!(Strategy::from(name).to_string(), name.to_string());
        }
        assert_eq!(
            StrategyName::Cus1.strategy(10),
            Strategy::DepthLimited { limit: 10 }
        );
    }

    #[test]
    fn bfs_open_maze() {
        let space = MazeSpace::new_empty(MazeSize::new(5, 5));
        let solution = Strategy::Bfs.run(&space, Coordinate::new(0, 0), Coordinate::new(4, 4));
        assert_eq!(solution.status, Status::Found);
        assert_eq!(solution.path.len(), 8);
        assert_walkable(&space, Coordinate::new(0, 0), &solution.path);
    }

    #[test]
    fn bfs_is_manhattan_on_open_mazes() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        for rows in 1..7 {
            for columns in 1..7 {
                let space = MazeSpace::new_empty(MazeSize::new(rows, columns));
                let start = space.random_state(&mut rng).unwrap();
                let goal = space.random_state(&mut rng).unwrap();
                let solution = Strategy::Bfs.run(&space, start, goal);
                assert_eq!(solution.path.len() as u32, start.manhattan(&goal));
            }
        }
    }

    #[test]
    fn astar_variants_agree_on_open_mazes() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for rows in 1..8 {
            for columns in 1..8 {
                let space = MazeSpace::new_empty(MazeSize::new(rows, columns));
                let start = space.random_state(&mut rng).unwrap();
                let goal = space.random_state(&mut rng).unwrap();
                let astar = Strategy::AStar.run(&space, start, goal);
                let bidirectional = Strategy::Bidirectional.run(&space, start, goal);
                assert_eq!(astar.path.len(), bidirectional.path.len());
                assert_eq!(astar.path.len() as u32, start.manhattan(&goal));
            }
        }
    }

    #[test]
    fn robot_nav_paths() {
        let p = robot_nav();
        let start = p.start();
        let goal = p.goals()[0];
        let dfs = "down; right; right; right; down; right; right; up; up; up; right; right";
        let shortest = "down; right; right; right; right; up; up; right; right; right";
        let informed = "right; down; right; right; right; up; up; right; right; right";
        let expected = [
            (Strategy::Dfs, dfs, 26),
            (Strategy::Bfs, shortest, 34),
            (Strategy::Gbfs, informed, 20),
            (Strategy::AStar, informed, 30),
            (Strategy::DepthLimited { limit: 13 }, dfs, 26),
            (Strategy::Bidirectional, informed, 35),
        ];
        for (strategy, path, nodes) in expected {
            let solution = strategy.run(p.space(), start, goal);
            assert_eq!(solution.status, Status::Found, "{strategy}");
            assert_eq!(solution.to_string(), path, "{strategy}");
            assert_eq!(solution.node_count(), nodes, "{strategy}");
            assert_walkable(p.space(), start, &solution.path);
            assert!(solution.path.last().unwrap().is_goal);
        }
    }

    #[test]
    fn depth_limit_cuts_long_paths() {
        let p = robot_nav();
        let goal = p.goals()[0];
        let solution = Strategy::DepthLimited { limit: 5 }.run(p.space(), p.start(), goal);
        assert_eq!(solution.status, Status::Fail);
        assert!(solution.path.is_empty());
        assert_eq!(solution.node_count(), 14);
        assert!(solution.search_tree.iter().all(|n| n.depth <= 5));

        // The goal sits at depth 12 in the DFS tree, recorded but never popped.
        let solution = Strategy::DepthLimited { limit: 12 }.run(p.space(), p.start(), goal);
        assert_eq!(solution.status, Status::Fail);
        assert!(solution.search_tree.iter().any(|n| n.is_goal && n.depth == 12));
    }

    #[test]
    fn huge_mazes_only_pay_for_what_they_search() {
        let space = MazeSpace::new(
            MazeSize::new(100_000, 100_000),
            vec![crate::problem::Wall::new(1, 0, 1, 2)],
        );
        let solution = Strategy::Bfs.run(&space, Coordinate::new(0, 0), Coordinate::new(0, 2));
        assert_eq!(solution.status, Status::Found);
        assert_eq!(solution.to_string(), "down; down");
        assert_eq!(solution.node_count(), 3);
    }

    #[test]
    fn start_is_goal() {
        let space = MazeSpace::new_empty(MazeSize::new(3, 3));
        let c = Coordinate::new(2, 1);
        for strategy in all() {
            let solution = strategy.run(&space, c, c);
            assert_eq!(solution.status, Status::Found, "{strategy}");
            assert!(solution.path.is_empty(), "{strategy}");
            assert_eq!(solution.node_count(), 1, "{strategy}");
            assert!(solution.search_tree[0].is_root());
        }
    }

    #[test]
    fn enclosed_goal() {
        let p = Problem::try_from(indoc! {"
            [6,6]
            (0,0)
            (4,4)
            (3,3,3,1)
            (3,4,1,2)
        "})
        .unwrap();
        for strategy in all() {
            let solution = strategy.run(p.space(), p.start(), p.goals()[0]);
            assert_eq!(solution.status, Status::Fail, "{strategy}");
            assert!(solution.path.is_empty(), "{strategy}");
            assert!(solution.node_count() > 0, "{strategy}");
        }
    }

    #[test]
    fn trees_are_graph_searches() {
        let p = robot_nav();
        for strategy in all().filter(|s| *s != Strategy::Bidirectional) {
            let solution = strategy.run(p.space(), p.start(), p.goals()[1]);
            let mut seen = rustc_hash::FxHashSet::default();
            for node in &solution.search_tree {
                assert!(seen.insert(node.coordinates), "{strategy} repeats {node}");
            }
            for node in &solution.path {
                assert!(solution.search_tree.contains(node), "{strategy} lost {node}");
            }
        }
    }

    #[test]
    fn deterministic() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let base = robot_nav();
        for _ in 0..10 {
            let p = base.randomize(&mut rng, 1).unwrap();
            for strategy in all() {
                let a = strategy.run(p.space(), p.start(), p.goals()[0]);
                let b = strategy.run(p.space(), p.start(), p.goals()[0]);
                assert_eq!(a, b, "{strategy}");
            }
        }
    }
}
