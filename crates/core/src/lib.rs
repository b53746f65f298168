//! Domain types shared by the taskboard store and API crates.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod tasks;
pub mod types;
