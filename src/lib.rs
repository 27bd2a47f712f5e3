//! Catalog Explorer: load a titles catalog once, then recompute five
//! dashboard charts whenever the year, type or country filter changes.

pub mod app;
pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod recompute;
pub mod state;
pub mod ui;
