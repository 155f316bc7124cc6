mod playlist_repository;
mod settings_repository;

pub use self::playlist_repository::*;
pub use self::settings_repository::*;
