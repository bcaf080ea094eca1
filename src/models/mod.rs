//! Data models for jukebox

mod song;
mod user;

pub use song::Song;
pub use user::{PublicUser, User};
