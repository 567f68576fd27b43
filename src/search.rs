use derive_more::Display;
use nonmax::NonMaxU32;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::problem::MazeSpace;
use crate::space::Coordinate;
use crate::space::Direction;
use crate::space::HeuristicCost;

/// A reference to a `SearchNode` within its `SearchTree`.
///
/// It's the position in which the node was generated, so comparing indices
/// compares generation order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(NonMaxU32);

impl NodeIndex {
    /// The root of any tree.
    pub const ROOT: NodeIndex = NodeIndex(NonMaxU32::ZERO);

    #[inline(always)]
    fn new(position: usize) -> Self {
        debug_assert!(position < u32::MAX as usize);
        Self(NonMaxU32::new(position as u32).expect("SearchTree outgrew u32 indices"))
    }

    #[inline(always)]
    pub fn position(&self) -> usize {
        self.0.get() as usize
    }

    /// The same index after `by` nodes got placed in front of its tree.
    #[inline(always)]
    #[must_use]
    pub(crate) fn rebase(&self, by: usize) -> Self {
        Self::new(self.position() + by)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchNode {
    /// How this node was reached from its parent. `None` for roots.
    pub direction: Option<Direction>,
    pub coordinates: Coordinate,
    pub is_goal: bool,
    pub distance_to_goal: HeuristicCost,
    pub depth: u32,
    pub(crate) parent: Option<NodeIndex>,
}

impl SearchNode {
    #[inline(always)]
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    #[inline(always)]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    #[inline(always)]
    fn rebase(mut self, by: usize) -> Self {
        self.parent = self.parent.map(|p| p.rebase(by));
        self
    }
}

impl std::fmt::Display for SearchNode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.direction {
            Some(d) => write!(f, "{d}{}", self.coordinates),
            None => write!(f, "start{}", self.coordinates),
        }
    }
}

/// The root node of a search from `location` towards `goal`.
#[must_use]
pub fn initial_node(location: Coordinate, goal: Coordinate) -> SearchNode {
    SearchNode {
        direction: None,
        coordinates: location,
        is_goal: location == goal,
        distance_to_goal: HeuristicCost::root(&location, &goal),
        depth: 0,
        parent: None,
    }
}

/// Every node generated by a single search.
///
/// Nodes are never removed, and no two nodes share coordinates. Parents are
/// referenced by index, so a node's path is recovered by walking up the tree.
pub struct SearchTree {
    nodes: Vec<SearchNode>,
    /// The coordinates already present in the tree.
    node_map: FxHashMap<Coordinate, NodeIndex>,
}

impl SearchTree {
    #[must_use]
    pub fn new(root: SearchNode) -> Self {
        debug_assert!(root.is_root());
        let mut tree = Self {
            nodes: Vec::with_capacity(256),
            node_map: FxHashMap::default(),
        };
        tree.push(root);
        tree
    }

    #[inline(always)]
    pub fn push(&mut self, node: SearchNode) -> NodeIndex {
        debug_assert!(
            !self.contains(&node.coordinates),
            "{} is already in the search tree",
            node.coordinates
        );
        debug_assert!(node.parent.is_none_or(|p| p.position() < self.nodes.len()));

        let index = NodeIndex::new(self.nodes.len());
        self.node_map.insert(node.coordinates, index);
        self.nodes.push(node);

        self.verify();
        index
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline(always)]
    pub fn contains(&self, c: &Coordinate) -> bool {
        self.node_map.contains_key(c)
    }

    #[inline(always)]
    pub fn find(&self, c: &Coordinate) -> Option<NodeIndex> {
        self.node_map.get(c).copied()
    }

    pub fn into_nodes(self) -> Vec<SearchNode> {
        self.nodes
    }

    /// The ancestors of a node, root first, excluding the node itself.
    #[must_use]
    pub fn ancestors(&self, mut node_index: NodeIndex) -> Vec<NodeIndex> {
        let mut ancestors = Vec::with_capacity(self[node_index].depth as usize);
        while let Some(parent_index) = self[node_index].parent {
            debug_assert!(parent_index < node_index);
            ancestors.push(parent_index);
            node_index = parent_index;
        }
        ancestors.reverse();
        ancestors
    }

    /// The moves leading from the root to a node, ending with the node itself.
    ///
    /// The root is never part of a path.
    #[must_use]
    pub fn path(&self, node_index: NodeIndex) -> Vec<SearchNode> {
        let mut path: Vec<SearchNode> = self
            .ancestors(node_index)
            .into_iter()
            .skip(1)
            .map(|i| self[i])
            .collect();
        if !self[node_index].is_root() {
            path.push(self[node_index]);
        }
        path
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    pub(crate) fn verify(&self) {
        // All good... (hopefully)
    }
    #[cfg(feature = "verify")]
    pub(crate) fn verify(&self) {
        debug_assert_eq!(self.nodes.len(), self.node_map.len());
        for (i, node) in self.nodes.iter().enumerate() {
            // - Can be found by its coordinates.
            debug_assert_eq!(self.node_map[&node.coordinates].position(), i);
            // - Goes after its parent, one level deeper.
            match node.parent {
                Some(p) => {
                    debug_assert!(p.position() < i);
                    debug_assert_eq!(self.nodes[p.position()].depth + 1, node.depth);
                }
                None => debug_assert_eq!(node.depth, 0),
            }
        }
    }
}

impl std::ops::Index<NodeIndex> for SearchTree {
    type Output = SearchNode;

    #[inline(always)]
    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.position()]
    }
}

impl std::fmt::Debug for SearchTree {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SearchTree{{({} nodes)}}", self.len())
    }
}

/// The successors of a single node. There are at most four of them.
pub type Candidates = SmallVec<[SearchNode; 4]>;

/// Generates the successors of `parent_index` in compass order.
///
/// Candidates that fall outside of the maze, inside a wall, or on a coordinate
/// already present anywhere in `tree` are dropped. Nothing is mutated, it's up
/// to the caller to record the candidates.
#[must_use]
pub fn expand(
    space: &MazeSpace,
    tree: &SearchTree,
    parent_index: NodeIndex,
    goal: &Coordinate,
) -> Candidates {
    let parent = &tree[parent_index];
    let mut candidates = Candidates::new();

    for direction in Direction::COMPASS {
        let c = parent.coordinates.apply(direction);
        if space.is_wall(&c) || !space.in_bounds(&c) || tree.contains(&c) {
            continue;
        }

        candidates.push(SearchNode {
            direction: Some(direction),
            coordinates: c,
            is_goal: c == *goal,
            distance_to_goal: parent.distance_to_goal.child(&c, goal),
            depth: parent.depth + 1,
            parent: Some(parent_index),
        });
    }

    log::trace!(
        "Expanded {} into {} candidates",
        parent.coordinates,
        candidates.len()
    );
    candidates
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Status {
    Found,
    Fail,
}

/// The outcome of a search.
///
/// `search_tree` is kept even on failure, its length is the number of nodes
/// generated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    pub status: Status,
    /// The moves from the start (excluded) to the goal.
    pub path: Vec<SearchNode>,
    pub search_tree: Vec<SearchNode>,
}

impl Solution {
    #[must_use]
    pub fn found(tree: SearchTree, goal_index: NodeIndex) -> Self {
        debug_assert!(tree[goal_index].is_goal);
        Self {
            status: Status::Found,
            path: tree.path(goal_index),
            search_tree: tree.into_nodes(),
        }
    }

    #[must_use]
    pub fn fail(tree: SearchTree) -> Self {
        Self {
            status: Status::Fail,
            path: vec![],
            search_tree: tree.into_nodes(),
        }
    }

    /// A solution with nothing in it, the identity for [`Solution::append`].
    #[must_use]
    pub fn empty() -> Self {
        Self {
            status: Status::Found,
            path: vec![],
            search_tree: vec![],
        }
    }

    #[inline(always)]
    pub fn is_found(&self) -> bool {
        self.status == Status::Found
    }

    /// Number of nodes generated.
    #[inline(always)]
    pub fn node_count(&self) -> usize {
        self.search_tree.len()
    }

    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.path.iter().filter_map(|n| n.direction)
    }

    /// Where the path ends, if it moves at all.
    pub fn end(&self) -> Option<Coordinate> {
        self.path.last().map(|n| n.coordinates)
    }

    /// Chains `other` after `self`.
    ///
    /// Paths and trees are concatenated, duplicates are kept. The result is
    /// only `Found` if both parts were.
    pub fn append(&mut self, other: Solution) {
        let by = self.search_tree.len();
        self.path.extend(other.path.into_iter().map(|n| n.rebase(by)));
        self.search_tree
            .extend(other.search_tree.into_iter().map(|n| n.rebase(by)));
        if other.status == Status::Fail {
            self.status = Status::Fail;
        }
    }

    pub fn write_memory_stats<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        use size::Size;
        use std::mem::size_of;
        use thousands::Separable;

        writeln!(out, "Solution Stats ({}):", self.status)?;
        let s = size_of::<SearchNode>();
        let l = self.search_tree.len();
        writeln!(
            out,
            "  - |Nodes|: {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        let l = self.path.len();
        writeln!(
            out,
            "  - |Path|:  {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;

        Ok(())
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut first = true;
        for d in self.directions() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{d}")?;
            first = false;
        }
        Ok(())
    }
}
