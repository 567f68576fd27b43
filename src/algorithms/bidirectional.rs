//! Bidirectional A*.
//!
//! One A* runs from the start towards the goal and another one from the goal
//! towards the start. Both advance in lockstep until a node popped on one side
//! is already known to the other side, and the path is stitched through it.

use crate::algorithms::AStarSearch;
use crate::problem::MazeSpace;
use crate::search::NodeIndex;
use crate::search::SearchNode;
use crate::search::Solution;
use crate::search::Status;
use crate::space::Coordinate;
use crate::space::Direction;

#[derive(Debug)]
pub struct BidirectionalSearch<'s> {
    /// Searches from the start towards the goal.
    forward: AStarSearch<'s>,
    /// Searches from the goal towards the start.
    backward: AStarSearch<'s>,
}

impl<'s> BidirectionalSearch<'s> {
    #[must_use]
    pub fn new(space: &'s MazeSpace, start: Coordinate, goal: Coordinate) -> Self {
        Self {
            forward: AStarSearch::new(space, start, goal),
            backward: AStarSearch::new(space, goal, start),
        }
    }

    #[must_use]
    pub fn run(mut self) -> Solution {
        if self.forward.tree()[NodeIndex::ROOT].is_goal {
            return Solution::found(self.forward.into_tree(), NodeIndex::ROOT);
        }

        loop {
            let forward_popped = self.forward.expand_next();
            let backward_popped = self.backward.expand_next();
            if forward_popped.is_none() && backward_popped.is_none() {
                log::debug!(
                    "Frontiers from {} and {} never met",
                    self.start(),
                    self.goal()
                );
                return self.fail();
            }

            if let Some(i) = forward_popped {
                let c = self.forward.tree()[i].coordinates;
                if self.backward.tree().contains(&c) {
                    return self.stitch(c);
                }
            }
            if let Some(i) = backward_popped {
                let c = self.backward.tree()[i].coordinates;
                if self.forward.tree().contains(&c) {
                    return self.stitch(c);
                }
            }
        }
    }

    fn start(&self) -> Coordinate {
        self.forward.tree()[NodeIndex::ROOT].coordinates
    }

    fn goal(&self) -> Coordinate {
        self.forward.goal()
    }

    /// Both trees, forward first, with backward parents re-based.
    fn union(self) -> Vec<SearchNode> {
        let mut nodes = self.forward.into_tree().into_nodes();
        let by = nodes.len();
        nodes.extend(self.backward.into_tree().into_nodes().into_iter().map(|mut n| {
            n.parent = n.parent.map(|p| p.rebase(by));
            n
        }));
        nodes
    }

    fn fail(self) -> Solution {
        Solution {
            status: Status::Fail,
            path: vec![],
            search_tree: self.union(),
        }
    }

    /// Joins the path from the start to `meeting` with the reversed path from
    /// the goal to `meeting`.
    fn stitch(self, meeting: Coordinate) -> Solution {
        let goal = self.goal();
        let forward_tree = self.forward.tree();
        let backward_tree = self.backward.tree();
        let (Some(forward_meeting), Some(backward_meeting)) =
            (forward_tree.find(&meeting), backward_tree.find(&meeting))
        else {
            unreachable!("{meeting} must be in both search trees");
        };
        log::debug!("Frontiers from {} and {goal} met at {meeting}", self.start());

        // Where each stitched node lives in the union of both trees.
        let by = forward_tree.len();
        let mut stitched: Vec<(NodeIndex, &SearchNode)> = forward_tree
            .ancestors(forward_meeting)
            .into_iter()
            .chain(std::iter::once(forward_meeting))
            .map(|i| (i, &forward_tree[i]))
            .collect();
        stitched.extend(
            backward_tree
                .ancestors(backward_meeting)
                .into_iter()
                .rev()
                .map(|i| (i.rebase(by), &backward_tree[i])),
        );

        let path = relabel(&stitched, &goal);
        let search_tree = self.union();
        Solution {
            status: Status::Found,
            path,
            search_tree,
        }
    }
}

/// Turns a stitched coordinate sequence back into a forward path.
///
/// Directions are recomputed from consecutive coordinates, the labels on the
/// backward half point the wrong way.
fn relabel(stitched: &[(NodeIndex, &SearchNode)], goal: &Coordinate) -> Vec<SearchNode> {
    let mut path = Vec::with_capacity(stitched.len().saturating_sub(1));
    let Some((root_index, root)) = stitched.first() else {
        return path;
    };
    let mut previous = (*root_index, **root);

    for &(index, node) in &stitched[1..] {
        let (previous_index, previous_node) = previous;
        let Some(direction) = Direction::between(&previous_node.coordinates, &node.coordinates)
        else {
            unreachable!(
                "Broken stitch between {} and {}",
                previous_node.coordinates, node.coordinates
            );
        };

        let relabelled = SearchNode {
            direction: Some(direction),
            coordinates: node.coordinates,
            is_goal: node.coordinates == *goal,
            distance_to_goal: previous_node
                .distance_to_goal
                .child(&node.coordinates, goal),
            depth: previous_node.depth + 1,
            parent: Some(previous_index),
        };
        path.push(relabelled);
        previous = (index, relabelled);
    }

    path
}
