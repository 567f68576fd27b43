use shadow_rs::shadow;

shadow!(build);

// Internals
// ---------
pub mod debug;

// Search space and problems
// -------------------------
pub mod problem;
pub mod search;
pub mod space;

// Problems
// --------
pub mod problems;

// Algorithms
// ----------
pub mod algorithms;
pub mod multi_goal;

pub use algorithms::Strategy;
pub use algorithms::StrategyName;
pub use multi_goal::search;
pub use multi_goal::search_all_goals;
