//! Geometry of the grid the robot moves on.
//!
//! States are plain [`Coordinate`]s and actions are the four orthogonal
//! [`Direction`]s. All moves cost the same, so the only "cost" carried around
//! is the [`HeuristicCost`] bookkeeping used to rank nodes.

use derive_more::Display;

pub type Coord = i32;

#[derive(Copy, Clone, Debug, Display, Default, PartialEq, Eq, Hash)]
#[display("({x},{y})")]
pub struct Coordinate {
    pub x: Coord,
    pub y: Coord,
}

impl Coordinate {
    #[inline(always)]
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// The coordinate reached by moving once towards `d`.
    ///
    /// The result may lie outside of the maze, validity is checked later.
    #[inline(always)]
    #[must_use]
    pub fn apply(&self, d: Direction) -> Self {
        let (dx, dy) = d.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// The Manhattan distance, `|dx| + |dy|`.
    ///
    /// ```
    /// use robot_nav::space::Coordinate;
    ///
    /// let a = Coordinate::new(0, 0);
    /// let b = Coordinate::new(4, -3);
    /// assert_eq!(a.manhattan(&b), 7);
    /// assert_eq!(b.manhattan(&a), 7);
    /// assert_eq!(a.manhattan(&a), 0);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn manhattan(&self, other: &Coordinate) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// A move of the robot.
///
/// Screen convention: `y` grows downwards, so `Up` decreases `y`.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Direction {
    #[display("up")]
    Up, // y--
    #[display("left")]
    Left, // x--
    #[display("down")]
    Down, // y++
    #[display("right")]
    Right, // x++
}

impl Direction {
    /// Fixed order in which successors are generated.
    pub const COMPASS: [Direction; 4] = [
        Direction::Up,
        Direction::Left,
        Direction::Down,
        Direction::Right,
    ];

    #[inline(always)]
    #[must_use]
    #[rustfmt::skip]
    pub const fn delta(&self) -> (Coord, Coord) {
        match self {
            Direction::Up    => ( 0, -1),
            Direction::Left  => (-1,  0),
            Direction::Down  => ( 0,  1),
            Direction::Right => ( 1,  0),
        }
    }

    /// Recovers the move that takes `from` into `to`.
    ///
    /// Returns `None` unless both coordinates are orthogonally adjacent.
    ///
    /// ```
    /// use robot_nav::space::{Coordinate, Direction};
    ///
    /// let c = Coordinate::new(3, 3);
    /// assert_eq!(Direction::between(&c, &Coordinate::new(3, 2)), Some(Direction::Up));
    /// assert_eq!(Direction::between(&c, &Coordinate::new(4, 3)), Some(Direction::Right));
    /// assert_eq!(Direction::between(&c, &Coordinate::new(4, 4)), None);
    /// assert_eq!(Direction::between(&c, &c), None);
    /// ```
    #[must_use]
    pub fn between(from: &Coordinate, to: &Coordinate) -> Option<Direction> {
        if from.manhattan(to) != 1 {
            return None;
        }
        if from.y > to.y {
            Some(Direction::Up)
        } else if from.x > to.x {
            Some(Direction::Left)
        } else if from.y < to.y {
            Some(Direction::Down)
        } else {
            Some(Direction::Right)
        }
    }
}

/// Ranking information attached to every search node.
///
/// `from_starting_node` is NOT a path cost. It accumulates the distance to the
/// goal of every node along the path, which is what A* ranks by.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct HeuristicCost {
    /// Manhattan distance from this node to the goal.
    pub from_current_node: u32,
    /// Sum of `from_current_node` over this node and all its ancestors.
    pub from_starting_node: u32,
    /// Number of ancestors, which is the length of the path so far.
    pub nodes_travelled: u32,
}

impl HeuristicCost {
    /// The cost of a node without ancestors.
    #[must_use]
    pub fn root(location: &Coordinate, goal: &Coordinate) -> Self {
        let h = location.manhattan(goal);
        Self {
            from_current_node: h,
            from_starting_node: h,
            nodes_travelled: 0,
        }
    }

    /// The cost of a node reached from a parent with cost `self`.
    #[must_use]
    pub fn child(&self, location: &Coordinate, goal: &Coordinate) -> Self {
        let h = location.manhattan(goal);
        Self {
            from_current_node: h,
            from_starting_node: self.from_starting_node.saturating_add(h),
            nodes_travelled: self.nodes_travelled + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compass_deltas_step_back() {
        let origin = Coordinate::new(5, 5);
        for d in Direction::COMPASS {
            let next = origin.apply(d);
            assert_eq!(origin.manhattan(&next), 1);
            assert_eq!(Direction::between(&origin, &next), Some(d));
        }
        assert_eq!(origin.apply(Direction::Up), Coordinate::new(5, 4));
        assert_eq!(origin.apply(Direction::Left), Coordinate::new(4, 5));
    }

    #[test]
    fn cumulative_heuristic() {
        let goal = Coordinate::new(4, 0);
        let root = HeuristicCost::root(&Coordinate::new(0, 0), &goal);
        assert_eq!(root.from_current_node, 4);
        assert_eq!(root.from_starting_node, 4);
        assert_eq!(root.nodes_travelled, 0);

        let child = root.child(&Coordinate::new(1, 0), &goal);
        assert_eq!(child.from_current_node, 3);
        assert_eq!(child.from_starting_node, 7);
        assert_eq!(child.nodes_travelled, 1);

        let grandchild = child.child(&Coordinate::new(1, 1), &goal);
        assert_eq!(grandchild.from_current_node, 4);
        assert_eq!(grandchild.from_starting_node, 11);
        assert_eq!(grandchild.nodes_travelled, 2);
    }

    #[test]
    fn display() {
        assert_eq!(Coordinate::new(7, -1).to_string(), "(7,-1)");
        assert_eq!(Direction::Down.to_string(), "down");
    }
}
