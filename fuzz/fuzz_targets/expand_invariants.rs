#![no_main]

use libfuzzer_sys::fuzz_target;

use robot_nav::algorithms::StrategyName;
use robot_nav::problem::MazeSize;
use robot_nav::problem::MazeSpace;
use robot_nav::problem::Problem;
use robot_nav::problem::Wall;
use robot_nav::space::Coordinate;

/// Builds a small maze out of raw bytes.
///
/// `[rows, columns, start_x, start_y, goal_x, goal_y, (x, y, w, h)*]`
fn problem(data: &[u8]) -> Option<Problem> {
    let (head, walls) = data.split_first_chunk::<6>()?;
    let small = |b: u8| (b % 16) as i32;
    let size = MazeSize::new(small(head[0]) + 1, small(head[1]) + 1);
    let walls = walls
        .chunks_exact(4)
        .map(|w| Wall::new(small(w[0]), small(w[1]), small(w[2]) % 4, small(w[3]) % 4))
        .collect();
    let start = Coordinate::new(small(head[2]), small(head[3]));
    let goal = Coordinate::new(small(head[4]), small(head[5]));
    Problem::new(MazeSpace::new(size, walls), start, vec![goal]).ok()
}

fuzz_target!(|data: &[u8]| {
    let Some(p) = problem(data) else {
        return;
    };
    let goal = p.goals()[0];

    let mut lengths = vec![];
    for name in StrategyName::ALL {
        let solution = robot_nav::search(&p, name);
        assert!(solution.node_count() > 0);

        // Paths are walkable and end on the goal.
        let mut at = p.start();
        for node in &solution.path {
            at = at.apply(node.direction.unwrap());
            assert_eq!(at, node.coordinates);
            assert!(p.space().is_free(&at));
        }
        if solution.is_found() {
            assert_eq!(at, goal);
            lengths.push((name, solution.path.len()));
        } else {
            assert!(solution.path.is_empty());
        }

        // A single tree never holds a coordinate twice.
        if name != StrategyName::Cus2 {
            let mut seen = std::collections::HashSet::new();
            assert!(solution.search_tree.iter().all(|n| seen.insert(n.coordinates)));
        }
    }

    // BFS finds the shortest path whenever anything does.
    if let Some(&(_, shortest)) = lengths.iter().find(|(n, _)| *n == StrategyName::Bfs) {
        for (name, len) in lengths {
            assert!(len >= shortest, "{name} beat BFS");
        }
    } else {
        assert!(lengths.is_empty());
    }
});
