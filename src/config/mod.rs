//! Configuration module for jukebox
//!
//! This module contains the settings structure and path management.

mod app_config;
mod paths;

pub use app_config::AppConfig;
pub use paths::Paths;
