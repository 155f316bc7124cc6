mod constants;
mod string_utils;
mod net_utils;
mod json_utils;

pub use self::constants::*;
pub use self::string_utils::*;
pub use self::net_utils::*;
pub use self::json_utils::*;
