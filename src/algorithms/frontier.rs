//! Frontier disciplines.
//!
//! A frontier only holds `NodeIndex`es into the search tree. The nodes
//! themselves stay in the tree.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;
use std::marker::PhantomData;

use crate::search::NodeIndex;
use crate::search::SearchNode;
use crate::search::SearchTree;

pub trait Frontier: std::fmt::Debug {
    /// Adds a batch of freshly generated nodes, given in compass order.
    fn extend(&mut self, tree: &SearchTree, batch: &[NodeIndex]);
    /// Removes the next node to expand.
    fn pop(&mut self) -> Option<NodeIndex>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// LIFO frontier.
///
/// Batches are pushed backwards so the first direction is expanded first.
#[derive(Debug, Default)]
pub struct Stack {
    open: Vec<NodeIndex>,
}

impl Frontier for Stack {
    fn extend(&mut self, _tree: &SearchTree, batch: &[NodeIndex]) {
        self.open.extend(batch.iter().rev());
    }
    fn pop(&mut self) -> Option<NodeIndex> {
        self.open.pop()
    }
    fn len(&self) -> usize {
        self.open.len()
    }
}

/// FIFO frontier.
#[derive(Debug, Default)]
pub struct Queue {
    open: VecDeque<NodeIndex>,
}

impl Frontier for Queue {
    fn extend(&mut self, _tree: &SearchTree, batch: &[NodeIndex]) {
        self.open.extend(batch.iter());
    }
    fn pop(&mut self) -> Option<NodeIndex> {
        self.open.pop_front()
    }
    fn len(&self) -> usize {
        self.open.len()
    }
}

/// What a `Ranked` frontier minimises.
pub trait Ranking: std::fmt::Debug {
    fn rank(node: &SearchNode) -> u32;
}

/// Ranks by the distance left to the goal.
#[derive(Debug)]
pub struct GreedyRank;

impl Ranking for GreedyRank {
    #[inline(always)]
    fn rank(node: &SearchNode) -> u32 {
        node.distance_to_goal.from_current_node
    }
}

/// Ranks by the accumulated distance-to-goal of the whole path.
#[derive(Debug)]
pub struct AStarRank;

impl Ranking for AStarRank {
    #[inline(always)]
    fn rank(node: &SearchNode) -> u32 {
        node.distance_to_goal.from_starting_node
    }
}

/// A heap node carrying just ranking information and the index of the actual
/// search node.
///
/// Ties are broken by generation order, which matches a stable sort over
/// the frontier kept in insertion order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct RankedNode {
    pub rank: u32,
    pub node_index: NodeIndex,
}

/// Best-first frontier popping the node with the lowest `R::rank`.
#[derive(Debug)]
pub struct Ranked<R: Ranking> {
    open: BinaryHeap<Reverse<RankedNode>>,
    _phantom_ranking: PhantomData<R>,
}

impl<R: Ranking> Default for Ranked<R> {
    fn default() -> Self {
        Self {
            open: BinaryHeap::with_capacity(256),
            _phantom_ranking: PhantomData,
        }
    }
}

impl<R: Ranking> Frontier for Ranked<R> {
    fn extend(&mut self, tree: &SearchTree, batch: &[NodeIndex]) {
        for &node_index in batch {
            self.open.push(Reverse(RankedNode {
                rank: R::rank(&tree[node_index]),
                node_index,
            }));
        }
    }
    fn pop(&mut self) -> Option<NodeIndex> {
        self.open.pop().map(|Reverse(n)| n.node_index)
    }
    fn len(&self) -> usize {
        self.open.len()
    }
}
