//! Suite graph images
//!
//! Plans and renders the cycling, initial and final graph images of a
//! suite by shelling out to the scheduler's `graph` command.

pub mod executor;
pub mod experiment;
