mod editor_error;

pub use self::editor_error::*;
