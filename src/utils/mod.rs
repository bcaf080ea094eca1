//! Utility modules for jukebox

pub mod auth;
pub mod tools;
