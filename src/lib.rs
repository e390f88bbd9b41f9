//! Swarm Arena: a top-down survival shooter simulation on Bevy + Avian.
//!
//! Integration tests in `tests/` are compiled as separate crates;
//! they build a headless app through [`game::configure_headless`].

pub mod common;
pub mod game;
pub mod plugins;
