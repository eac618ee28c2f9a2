//! Rockfall: a vertical asteroid shooter built on Bevy and Rapier2D.
//!
//! The gameplay ([`gameplay::GamePlugin`]) runs headless; [`harness::GameHarness`]
//! drives it frame by frame for tests. The binary adds a window, rendering
//! and keyboard controls on top.

pub mod collision;
pub mod config;
pub mod constants;
pub mod controls;
pub mod error;
pub mod gameplay;
pub mod harness;
pub mod rendering;
pub mod session;
pub mod ship;
pub mod spawner;
