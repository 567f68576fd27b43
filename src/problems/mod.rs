//! Readers and writers for problem descriptions.
//!
//! The search itself only sees structured `Problem`s, these adapters build
//! them from (and dump them to) text.

pub mod robot_nav;
