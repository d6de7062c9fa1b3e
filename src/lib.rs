//! Group fitness tracking with weekly streaks.
//!
//! The computational core is the Monday-aligned streak engine in
//! [`streaks`], built on the week primitives in [`week`]. [`ranking`] and
//! [`calendar`] derive group standings and per-season grids from it; the
//! rest of the crate is the persistence and HTTP plumbing around them.

pub mod calendar;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod ranking;
pub mod routes;
pub mod services;
pub mod streaks;
pub mod week;
