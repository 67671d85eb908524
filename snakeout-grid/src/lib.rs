//! Board and occupancy types for the Snake-Out level generator.
//!
//! This crate owns everything the generation strategies share: the immutable
//! [`Board`] built from a request, the mutable [`Occupancy`] view a single
//! generation attempt works against, orthogonal neighborhood and raycast
//! queries, and the exit-depth BFS used by start-cell heuristics.

#[macro_use]
extern crate serde_derive;

pub mod board;
pub mod cell;
pub mod distance;
pub mod occupancy;
pub mod raycast;
pub mod wire;

pub use board::{Board, GridError, Obstacle};
pub use cell::{Cell, Delta, Direction};
pub use distance::DistanceMap;
pub use occupancy::{CellState, Occupancy};
pub use raycast::{has_any_exit, neighbors, ray_exits};
