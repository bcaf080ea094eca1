//! Database table operations

mod song_table;
mod user_table;

pub use song_table::SongTable;
pub use user_table::UserTable;
