use derive_more::Display;
use thiserror::Error;

use crate::space::Coord;
use crate::space::Coordinate;

const MAX_ELEMENTS_DISPLAYED: usize = 40;
const RANDOM_STATE_MAX_TRIES: usize = 10_000;
/// Mazes with more cells than this answer wall queries from the wall list.
const MAX_MAP_CELLS: usize = 1 << 22;

/// Dimensions of a maze.
///
/// Valid coordinates satisfy `0 <= x < columns` and `0 <= y < rows`.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
#[display("[{rows},{columns}]")]
pub struct MazeSize {
    pub rows: Coord,
    pub columns: Coord,
}

impl MazeSize {
    pub const fn new(rows: Coord, columns: Coord) -> Self {
        Self { rows, columns }
    }

    #[inline(always)]
    pub fn contains(&self, c: &Coordinate) -> bool {
        0 <= c.x && c.x < self.columns && 0 <= c.y && c.y < self.rows
    }

    pub fn cells(&self) -> usize {
        (self.rows.max(0) as usize).saturating_mul(self.columns.max(0) as usize)
    }
}

/// An axis-aligned block of wall cells anchored at its top-left corner.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
#[display("({x},{y},{columns},{rows})")]
pub struct Wall {
    pub x: Coord,
    pub y: Coord,
    pub columns: Coord,
    pub rows: Coord,
}

impl Wall {
    pub const fn new(x: Coord, y: Coord, columns: Coord, rows: Coord) -> Self {
        Self {
            x,
            y,
            columns,
            rows,
        }
    }

    /// Whether a coordinate is covered by this wall.
    ///
    /// ```
    /// use robot_nav::problem::Wall;
    /// use robot_nav::space::Coordinate;
    ///
    /// let w = Wall::new(2, 0, 2, 3);
    /// assert!(w.contains(&Coordinate::new(2, 0)));
    /// assert!(w.contains(&Coordinate::new(3, 2)));
    /// assert!(!w.contains(&Coordinate::new(4, 0)));
    /// assert!(!w.contains(&Coordinate::new(2, 3)));
    /// ```
    #[inline(always)]
    pub fn contains(&self, c: &Coordinate) -> bool {
        self.x <= c.x && c.x < self.end_x() && self.y <= c.y && c.y < self.end_y()
    }

    /// First column past the wall, saturating at `Coord::MAX`.
    #[inline(always)]
    pub fn end_x(&self) -> Coord {
        self.x.saturating_add(self.columns)
    }

    /// First row past the wall, saturating at `Coord::MAX`.
    #[inline(always)]
    pub fn end_y(&self) -> Coord {
        self.y.saturating_add(self.rows)
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum MazeCell {
    #[display("░")]
    Empty,
    #[display("█")]
    Wall,
}

/// The static part of a problem, the grid and its walls.
///
/// Walls are kept as given, and also rasterised into `map` so cell queries
/// don't depend on the number of walls. Huge mazes skip the map and scan the
/// walls instead, so memory only grows with what a search touches.
#[derive(Clone, PartialEq, Eq)]
pub struct MazeSpace {
    size: MazeSize,
    walls: Vec<Wall>,
    map: Vec<Vec<MazeCell>>,
}

impl MazeSpace {
    pub fn new(size: MazeSize, walls: Vec<Wall>) -> Self {
        if size.cells() > MAX_MAP_CELLS {
            log::debug!("Not rasterising {size}, it has {} cells", size.cells());
            return Self {
                size,
                walls,
                map: vec![],
            };
        }

        let rows = size.rows.max(0) as usize;
        let columns = size.columns.max(0) as usize;
        let mut map = vec![vec![MazeCell::Empty; columns]; rows];

        for wall in &walls {
            // Clip to the maze, walls may hang over the border.
            let min_x = wall.x.max(0);
            let min_y = wall.y.max(0);
            let max_x = wall.end_x().min(size.columns);
            let max_y = wall.end_y().min(size.rows);
            for y in min_y..max_y {
                for x in min_x..max_x {
                    map[y as usize][x as usize] = MazeCell::Wall;
                }
            }
        }

        Self { size, walls, map }
    }

    pub fn new_empty(size: MazeSize) -> Self {
        Self::new(size, vec![])
    }

    #[inline(always)]
    pub fn size(&self) -> MazeSize {
        self.size
    }

    #[inline(always)]
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    #[inline(always)]
    pub fn in_bounds(&self, c: &Coordinate) -> bool {
        self.size.contains(c)
    }

    /// Whether a coordinate is covered by any wall.
    #[inline(always)]
    pub fn is_wall(&self, c: &Coordinate) -> bool {
        if self.in_bounds(c) {
            self.at(c) == MazeCell::Wall
        } else {
            self.walls.iter().any(|w| w.contains(c))
        }
    }

    /// Whether the robot may stand on a coordinate.
    #[inline(always)]
    pub fn is_free(&self, c: &Coordinate) -> bool {
        self.in_bounds(c) && self.at(c) == MazeCell::Empty
    }

    #[inline(always)]
    fn at(&self, c: &Coordinate) -> MazeCell {
        debug_assert!(self.in_bounds(c));
        if self.map.is_empty() {
            if self.walls.iter().any(|w| w.contains(c)) {
                return MazeCell::Wall;
            }
            return MazeCell::Empty;
        }
        self.map[c.y as usize][c.x as usize]
    }

    /// Coordinates of the top-left corner of the maze that fit on a screen,
    /// row by row.
    fn displayed_rows(&self) -> impl Iterator<Item = impl Iterator<Item = Coordinate>> {
        let rows = self.size.rows.clamp(0, MAX_ELEMENTS_DISPLAYED as Coord);
        let columns = self.size.columns.clamp(0, MAX_ELEMENTS_DISPLAYED as Coord);
        (0..rows).map(move |y| (0..columns).map(move |x| Coordinate::new(x, y)))
    }

    pub fn random_state<R: rand::Rng>(&self, r: &mut R) -> Option<Coordinate> {
        if self.size.cells() == 0 {
            return None;
        }
        for _tries in 0..RANDOM_STATE_MAX_TRIES {
            let c = Coordinate::new(
                r.random_range(0..self.size.columns),
                r.random_range(0..self.size.rows),
            );
            if self.is_free(&c) {
                return Some(c);
            }
        }

        None
    }
}

impl std::fmt::Display for MazeSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "Maze{}:", self.size)?;
        for line in self.displayed_rows() {
            for c in line {
                write!(f, "{}", self.at(&c))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for MazeSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Maze{}{{{} walls}}", self.size, self.walls.len())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProblemError {
    #[error("Maze {0} has no cells")]
    EmptyMaze(MazeSize),
    #[error("No goals given")]
    NoGoals,
    #[error("Start {0} is outside of the maze")]
    StartOutOfBounds(Coordinate),
    #[error("Start {0} is inside a wall")]
    StartInWall(Coordinate),
    #[error("Goal {0} is outside of the maze")]
    GoalOutOfBounds(Coordinate),
    #[error("Goal {0} is inside a wall")]
    GoalInWall(Coordinate),
}

/// A navigation query, where the robot starts and the goals it must reach.
///
/// Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Problem {
    space: MazeSpace,
    start: Coordinate,
    goals: Vec<Coordinate>,
}

impl Problem {
    pub fn new(
        space: MazeSpace,
        start: Coordinate,
        goals: Vec<Coordinate>,
    ) -> Result<Self, ProblemError> {
        if space.size().cells() == 0 {
            return Err(ProblemError::EmptyMaze(space.size()));
        }
        if goals.is_empty() {
            return Err(ProblemError::NoGoals);
        }
        if !space.in_bounds(&start) {
            return Err(ProblemError::StartOutOfBounds(start));
        }
        if space.is_wall(&start) {
            return Err(ProblemError::StartInWall(start));
        }
        for goal in &goals {
            if !space.in_bounds(goal) {
                return Err(ProblemError::GoalOutOfBounds(*goal));
            }
            if space.is_wall(goal) {
                return Err(ProblemError::GoalInWall(*goal));
            }
        }

        Ok(Self {
            space,
            start,
            goals,
        })
    }

    #[inline(always)]
    pub fn space(&self) -> &MazeSpace {
        &self.space
    }
    #[inline(always)]
    pub fn start(&self) -> Coordinate {
        self.start
    }
    #[inline(always)]
    pub fn goals(&self) -> &[Coordinate] {
        &self.goals
    }

    pub fn is_goal(&self, c: &Coordinate) -> bool {
        self.goals.contains(c)
    }

    /// Draws a new instance over the same maze with a random start and
    /// `num_goals` random goals.
    pub fn randomize<R: rand::Rng>(&self, r: &mut R, num_goals: u16) -> Option<Problem> {
        let start = self.space.random_state(r)?;
        let mut goals = Vec::with_capacity(num_goals as usize);
        for _ in 0..num_goals {
            goals.push(self.space.random_state(r)?);
        }

        Problem::new(self.space.clone(), start, goals).ok()
    }
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(
            f,
            "Problem{} (s:{}, g:{:?}):",
            self.space.size(),
            self.start,
            self.goals
        )?;
        for line in self.space.displayed_rows() {
            for c in line {
                match (c == self.start, self.is_goal(&c)) {
                    (true, true) => write!(f, "!")?,
                    (true, false) => write!(f, "S")?,
                    (false, true) => write!(f, "G")?,
                    (false, false) => write!(f, "{}", self.space.at(&c))?,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::ChaCha8Rng;
    use rand_chacha::rand_core::SeedableRng;

    use super::*;

    fn space() -> MazeSpace {
        MazeSpace::new(
            MazeSize::new(3, 4),
            vec![Wall::new(1, 0, 1, 2), Wall::new(3, 2, 5, 5)],
        )
    }

    #[test]
    fn walls_and_bounds() {
        let s = space();
        assert!(s.is_wall(&Coordinate::new(1, 0)));
        assert!(s.is_wall(&Coordinate::new(1, 1)));
        assert!(!s.is_wall(&Coordinate::new(1, 2)));
        assert!(s.is_wall(&Coordinate::new(3, 2)));
        // Walls hanging over the border still count outside of it.
        assert!(s.is_wall(&Coordinate::new(5, 4)));
        assert!(!s.in_bounds(&Coordinate::new(5, 4)));

        assert!(s.is_free(&Coordinate::new(0, 0)));
        assert!(!s.is_free(&Coordinate::new(-1, 0)));
        assert!(!s.is_free(&Coordinate::new(0, 3)));
        assert!(!s.is_free(&Coordinate::new(4, 0)));
    }

    #[test]
    fn walls_near_the_coordinate_limits() {
        let far = Wall::new(Coord::MAX, 0, 1, 1);
        assert_eq!(far.end_x(), Coord::MAX);
        assert!(!far.contains(&Coordinate::new(Coord::MAX - 1, 0)));

        let wide = Wall::new(-5, 1, Coord::MAX, 1);
        assert!(wide.contains(&Coordinate::new(3, 1)));
        assert!(wide.contains(&Coordinate::new(Coord::MAX - 6, 1)));

        let s = MazeSpace::new(MazeSize::new(3, 4), vec![far, wide]);
        for x in 0..4 {
            assert!(s.is_free(&Coordinate::new(x, 0)));
            assert!(s.is_wall(&Coordinate::new(x, 1)));
        }
    }

    #[test]
    fn huge_mazes_are_not_rasterised() {
        let size = MazeSize::new(100_000, 100_000);
        let s = MazeSpace::new(size, vec![Wall::new(1, 0, 1, 2), Wall::new(99_998, 99_999, 5, 5)]);
        assert!(s.map.is_empty());
        assert!(s.is_wall(&Coordinate::new(1, 1)));
        assert!(s.is_wall(&Coordinate::new(99_999, 99_999)));
        assert!(s.is_free(&Coordinate::new(0, 1)));
        assert!(!s.is_free(&Coordinate::new(100_000, 0)));

        let p = Problem::new(s, Coordinate::new(0, 0), vec![Coordinate::new(0, 2)]).unwrap();
        let drawn = p.to_string();
        assert_eq!(drawn.lines().count(), 1 + MAX_ELEMENTS_DISPLAYED);
        assert!(drawn.lines().nth(1).unwrap().starts_with("S█░"));
        assert!(drawn.lines().nth(3).unwrap().starts_with("G░░"));
    }

    #[test]
    fn validation() {
        let start = Coordinate::new(0, 0);
        let goal = Coordinate::new(2, 2);
        assert!(Problem::new(space(), start, vec![goal]).is_ok());
        assert_eq!(
            Problem::new(space(), start, vec![]),
            Err(ProblemError::NoGoals)
        );
        assert_eq!(
            Problem::new(space(), Coordinate::new(1, 1), vec![goal]),
            Err(ProblemError::StartInWall(Coordinate::new(1, 1)))
        );
        assert_eq!(
            Problem::new(space(), start, vec![goal, Coordinate::new(4, 0)]),
            Err(ProblemError::GoalOutOfBounds(Coordinate::new(4, 0)))
        );
        assert_eq!(
            Problem::new(MazeSpace::new_empty(MazeSize::new(0, 3)), start, vec![goal]),
            Err(ProblemError::EmptyMaze(MazeSize::new(0, 3)))
        );
    }

    #[test]
    fn display_marks_start_and_goals() {
        let p = Problem::new(space(), Coordinate::new(0, 0), vec![Coordinate::new(2, 2)]).unwrap();
        let drawn = p.to_string();
        let lines: Vec<&str> = drawn.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "S█░░");
        assert_eq!(lines[2], "░█░░");
        assert_eq!(lines[3], "░░G█");
    }

    #[test]
    fn randomize_picks_free_cells() {
        let base = Problem::new(space(), Coordinate::new(0, 0), vec![Coordinate::new(2, 2)]).unwrap();
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let p = base.randomize(&mut rng, 3).unwrap();
            assert!(p.space().is_free(&p.start()));
            assert_eq!(p.goals().len(), 3);
            for g in p.goals() {
                assert!(p.space().is_free(g));
            }
        }
    }
}
