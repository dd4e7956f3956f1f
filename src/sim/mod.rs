//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - One step per frame
//! - Seeded RNG only, so a run is reproducible from its seed
//! - The arena state is passed explicitly, no back-references

pub mod collision;
pub mod mutation;
pub mod state;
pub mod tick;

pub use collision::{Side, hitcheck, in_paddle_window};
pub use mutation::{ArenaMutation, BallMutation, Mutation, PaddleMutation, Spawn};
pub use state::{Ball, Direction, GameState, Paddle};
pub use tick::{GameEvent, tick};
