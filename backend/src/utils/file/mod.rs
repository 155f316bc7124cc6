mod file_utils;

pub use self::file_utils::*;
