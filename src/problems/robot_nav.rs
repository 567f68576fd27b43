//! The robot navigation text format.
//!
//! ```text
//! [rows,columns]
//! (start_x,start_y)
//! (goal_x,goal_y) | (goal_x,goal_y) | ...
//! (wall_x,wall_y,wall_columns,wall_rows)
//! ...
//! ```
//!
//! Blank lines are skipped and whitespace inside tuples is ignored.

use std::path::PathBuf;

use thiserror::Error;

use crate::problem::MazeSize;
use crate::problem::MazeSpace;
use crate::problem::Problem;
use crate::problem::ProblemError;
use crate::problem::Wall;
use crate::space::Coord;
use crate::space::Coordinate;

#[derive(Debug, Error)]
pub enum RobotNavParseError {
    #[error("Empty input")]
    EmptyInput,
    #[error("Missing {expected} line")]
    MissingLine { expected: &'static str },
    #[error("Line {line}: expected {expected}, found '{found}'")]
    Malformed {
        line: usize,
        expected: &'static str,
        found: String,
    },
    #[error("Line {line}: invalid integer '{found}'")]
    InvalidInteger { line: usize, found: String },
    #[error("Invalid problem: {0}")]
    InvalidProblem(#[from] ProblemError),
    #[error("I/O error when loading '{p}': {e}")]
    IOError {
        p: std::path::PathBuf,
        e: std::io::Error,
    },
}

/// Parses `<open>a,b,...<close>` into exactly `N` integers.
fn parse_tuple<const N: usize>(
    line: usize,
    text: &str,
    (open, close): (char, char),
    expected: &'static str,
) -> Result<[Coord; N], RobotNavParseError> {
    let malformed = || RobotNavParseError::Malformed {
        line,
        expected,
        found: text.to_string(),
    };

    let inner = text
        .trim()
        .strip_prefix(open)
        .and_then(|t| t.strip_suffix(close))
        .ok_or_else(malformed)?;

    let mut values = [0 as Coord; N];
    let mut parts = inner.split(',');
    for value in values.iter_mut() {
        let part = parts.next().ok_or_else(malformed)?.trim();
        *value = part
            .parse::<Coord>()
            .map_err(|_| RobotNavParseError::InvalidInteger {
                line,
                found: part.to_string(),
            })?;
    }
    if parts.next().is_some() {
        return Err(malformed());
    }

    Ok(values)
}

impl std::convert::TryFrom<&str> for Problem {
    type Error = RobotNavParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        // 1-based line numbers, skipping blanks.
        let mut lines = s
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim()))
            .filter(|(_, l)| !l.is_empty());

        let (line, text) = lines.next().ok_or(RobotNavParseError::EmptyInput)?;
        let [rows, columns] = parse_tuple::<2>(line, text, ('[', ']'), "[rows,columns]")?;

        let (line, text) = lines.next().ok_or(RobotNavParseError::MissingLine {
            expected: "start",
        })?;
        let [x, y] = parse_tuple::<2>(line, text, ('(', ')'), "(x,y)")?;
        let start = Coordinate::new(x, y);

        let (line, text) = lines.next().ok_or(RobotNavParseError::MissingLine {
            expected: "goals",
        })?;
        let goals = text
            .split('|')
            .map(|g| {
                parse_tuple::<2>(line, g, ('(', ')'), "(x,y) | (x,y) | ...")
                    .map(|[x, y]| Coordinate::new(x, y))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let walls = lines
            .map(|(line, text)| {
                parse_tuple::<4>(line, text, ('(', ')'), "(x,y,columns,rows)")
                    .map(|[x, y, w, h]| Wall::new(x, y, w, h))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let space = MazeSpace::new(MazeSize::new(rows, columns), walls);
        Ok(Problem::new(space, start, goals)?)
    }
}

impl std::convert::TryFrom<&std::path::Path> for Problem {
    type Error = RobotNavParseError;

    fn try_from(p: &std::path::Path) -> Result<Self, Self::Error> {
        let text = std::fs::read_to_string(p).map_err(|e| RobotNavParseError::IOError {
            p: PathBuf::from(p),
            e,
        })?;
        Problem::try_from(text.as_str())
    }
}

/// Writes a problem back in the robot navigation format.
pub fn write_problem<W: std::io::Write>(problem: &Problem, mut out: W) -> std::io::Result<()> {
    let space = problem.space();
    writeln!(out, "{}", space.size())?;
    writeln!(out, "{}", problem.start())?;
    let goals: Vec<String> = problem.goals().iter().map(|g| g.to_string()).collect();
    writeln!(out, "{}", goals.join(" | "))?;
    for wall in space.walls() {
        writeln!(out, "{wall}")?;
    }
    Ok(())
}
