//! Database module for jukebox
//!
//! This module handles all database operations using SQLx with SQLite.

mod engine;
pub mod tables;

pub use engine::{setup_sqlite, DbEngine};
pub use tables::*;
