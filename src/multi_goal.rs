//! Visiting several goals.
//!
//! Goals are visited greedily: from wherever the agent stands, every remaining
//! goal is searched for and the one with the shortest path is visited next.
//! This is not an optimal tour.

use crate::algorithms::Strategy;
use crate::problem::MazeSpace;
use crate::problem::Problem;
use crate::search::Solution;
use crate::search::Status;
use crate::space::Coordinate;

/// A single search between two stops of a tour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leg {
    /// Position of `goal` within the goals it was picked from.
    pub index: usize,
    pub goal: Coordinate,
    pub solution: Solution,
}

/// Searches from `from` to each of `goals`, in order, and returns the leg with
/// the shortest path. Ties go to the earlier goal.
///
/// When no goal can be reached the first goal's failed leg is returned, so
/// callers still get to see how much was searched. Returns `None` only when
/// there are no goals at all.
#[must_use]
pub fn nearest_leg(
    space: &MazeSpace,
    from: Coordinate,
    goals: &[Coordinate],
    strategy: &Strategy,
) -> Option<Leg> {
    let mut legs = goals.iter().enumerate().map(|(index, &goal)| Leg {
        index,
        goal,
        solution: strategy.run(space, from, goal),
    });

    let first = legs.next()?;
    let mut nearest = first.solution.is_found().then(|| first.clone());
    for leg in legs {
        if !leg.solution.is_found() {
            continue;
        }
        match &nearest {
            Some(n) if n.solution.path.len() <= leg.solution.path.len() => {}
            _ => nearest = Some(leg),
        }
    }

    Some(nearest.unwrap_or(first))
}

/// Runs `strategy` against the goal nearest to the start.
///
/// With a single goal this is just a search for it.
#[must_use]
pub fn search<S: Into<Strategy>>(problem: &Problem, strategy: S) -> Solution {
    let strategy = strategy.into();
    match nearest_leg(problem.space(), problem.start(), problem.goals(), &strategy) {
        Some(leg) => leg.solution,
        None => Solution::empty(),
    }
}

/// The result of visiting every goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tour {
    /// Goals in the order they were reached.
    pub visits: Vec<Coordinate>,
    /// Every leg chained together.
    pub solution: Solution,
}

impl Tour {
    #[inline(always)]
    pub fn is_complete(&self) -> bool {
        self.solution.is_found()
    }
}

/// Visits every goal in `problem`, always heading for the nearest one left.
///
/// The tour stops at the first point where none of the remaining goals can be
/// reached, and is then marked as failed.
#[must_use]
pub fn plan_tour<S: Into<Strategy>>(problem: &Problem, strategy: S) -> Tour {
    let strategy = strategy.into();
    let space = problem.space();
    let mut remaining = problem.goals().to_vec();
    let mut at = problem.start();
    let mut visits = Vec::with_capacity(remaining.len());
    let mut solution = Solution::empty();

    while let Some(leg) = nearest_leg(space, at, &remaining, &strategy) {
        if leg.solution.status == Status::Fail {
            log::warn!(
                "{strategy}: none of {} remaining goals can be reached from {at}",
                remaining.len()
            );
            solution.append(leg.solution);
            break;
        }

        log::info!(
            "{strategy}: {at} -> {} in {} moves ({} nodes)",
            leg.goal,
            leg.solution.path.len(),
            leg.solution.node_count()
        );
        solution.append(leg.solution);
        remaining.remove(leg.index);
        visits.push(leg.goal);
        at = leg.goal;
    }

    Tour { visits, solution }
}

/// Visits every goal in `problem` and returns the chained solution.
#[must_use]
pub fn search_all_goals<S: Into<Strategy>>(problem: &Problem, strategy: S) -> Solution {
    plan_tour(problem, strategy).solution
}
