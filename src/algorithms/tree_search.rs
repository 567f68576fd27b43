//! The loop every single-direction strategy shares.
//!
//! Strategies only differ in their `Frontier` and whether they cap the depth
//! of the nodes they are willing to expand.

use smallvec::SmallVec;

use crate::algorithms::frontier::Frontier;
use crate::problem::MazeSpace;
use crate::search::NodeIndex;
use crate::search::SearchTree;
use crate::search::Solution;
use crate::search::expand;
use crate::search::initial_node;
use crate::space::Coordinate;

/// Outcome of a single iteration of the search loop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// The popped node is a goal.
    Goal(NodeIndex),
    /// The popped node was expanded.
    Expanded(NodeIndex),
    /// There was nothing left to pop.
    Exhausted,
}

/// A graph search from `start` to `goal` over a `MazeSpace`.
///
/// Every generated node is recorded in `search_tree`, and a coordinate already
/// in the tree is never generated again, no matter which branch reached it.
#[derive(Debug)]
pub struct TreeSearch<'s, F: Frontier> {
    space: &'s MazeSpace,
    goal: Coordinate,

    /// All the nodes generated so far.
    search_tree: SearchTree,
    /// Nodes waiting to be expanded.
    frontier: F,
    /// Nodes this deep are recorded but not expanded.
    depth_limit: Option<u32>,
}

impl<'s, F: Frontier + Default> TreeSearch<'s, F> {
    #[must_use]
    pub fn new(space: &'s MazeSpace, start: Coordinate, goal: Coordinate) -> Self {
        let search_tree = SearchTree::new(initial_node(start, goal));
        let mut frontier = F::default();
        frontier.extend(&search_tree, &[NodeIndex::ROOT]);

        Self {
            space,
            goal,
            search_tree,
            frontier,
            depth_limit: None,
        }
    }
}

impl<F: Frontier> TreeSearch<'_, F> {
    #[must_use]
    pub fn with_depth_limit(mut self, limit: u32) -> Self {
        self.depth_limit = Some(limit);
        self
    }

    #[inline(always)]
    pub fn goal(&self) -> Coordinate {
        self.goal
    }

    #[inline(always)]
    pub fn tree(&self) -> &SearchTree {
        &self.search_tree
    }

    #[inline(always)]
    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn into_tree(self) -> SearchTree {
        self.search_tree
    }

    /// Pops a node and expands it without looking at whether it's a goal.
    pub fn expand_next(&mut self) -> Option<NodeIndex> {
        let node_index = self.frontier.pop()?;
        self.expand_node(node_index);
        Some(node_index)
    }

    /// Pops a node, and either reports it as a goal or expands it.
    pub fn step(&mut self) -> Step {
        let Some(node_index) = self.frontier.pop() else {
            return Step::Exhausted;
        };
        if self.search_tree[node_index].is_goal {
            return Step::Goal(node_index);
        }
        self.expand_node(node_index);
        Step::Expanded(node_index)
    }

    /// Runs the search until it finds the goal or runs out of nodes.
    #[must_use]
    pub fn run(mut self) -> Solution {
        let start = self.search_tree[NodeIndex::ROOT].coordinates;
        loop {
            match self.step() {
                Step::Expanded(_) => {}
                Step::Goal(goal_index) => {
                    log::debug!(
                        "Reached {} from {start} generating {} nodes",
                        self.goal,
                        self.search_tree.len()
                    );
                    return Solution::found(self.search_tree, goal_index);
                }
                Step::Exhausted => {
                    log::debug!(
                        "No path to {} from {start} after generating {} nodes",
                        self.goal,
                        self.search_tree.len()
                    );
                    return Solution::fail(self.search_tree);
                }
            }
        }
    }

    fn expand_node(&mut self, node_index: NodeIndex) {
        let candidates = expand(self.space, &self.search_tree, node_index, &self.goal);

        let mut batch = SmallVec::<[NodeIndex; 4]>::new();
        for node in candidates {
            let depth = node.depth;
            let index = self.search_tree.push(node);
            if self.depth_limit.is_none_or(|limit| depth < limit) {
                batch.push(index);
            }
        }
        self.frontier.extend(&self.search_tree, &batch);
    }
}
