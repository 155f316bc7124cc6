mod playlist;
mod playlist_table;
mod column_schema;
mod playlist_format;
mod settings;

pub use self::playlist::*;
pub use self::playlist_table::*;
pub use self::column_schema::*;
pub use self::playlist_format::*;
pub use self::settings::*;
