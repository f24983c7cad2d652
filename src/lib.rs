//! Genetic Inverse Kinematics - Library
//!
//! Finds a valid robot state inside (or close to) a goal region given only
//! a distance function, using a genetic search hybridized with hill
//! climbing. The result is meant to seed a motion planner with a concrete
//! goal configuration.

pub mod config;
pub mod error;
pub mod evaluator;
pub mod goal;
pub mod hill_climb;
pub mod individual;
pub mod phase;
pub mod population;
pub mod real_vector;
pub mod refiner;
pub mod solver;
pub mod space;

pub use config::GaikConfig;
pub use error::{ConfigError, Error};
pub use evaluator::ValidityPolicy;
pub use goal::GoalRegion;
pub use hill_climb::{Acceptance, HillClimbing, LocalSearch};
pub use individual::{Fitness, Individual};
pub use phase::Phase;
pub use solver::{Gaik, GenerationStats, SearchReport};
pub use space::StateSpace;
