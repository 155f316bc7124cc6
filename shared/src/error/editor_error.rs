use std::error::Error;
use std::fmt::{Display, Formatter, Result};

#[macro_export]
macro_rules! create_editor_error {
     ($kind: expr, $($arg:tt)*) => {
        $crate::error::EditorError::new($kind, format!($($arg)*))
    }
}
pub use create_editor_error;

#[macro_export]
macro_rules! create_editor_error_result {
     ($kind: expr, $($arg:tt)*) => {
        Err($crate::error::EditorError::new($kind, format!($($arg)*)))
    }
}
pub use create_editor_error_result;

#[macro_export]
macro_rules! validation_err_res {
    ($($arg:tt)*) => {
        Err($crate::error::EditorError::new($crate::error::EditorErrorKind::Validation, format!($($arg)*)))
    };
}
pub use validation_err_res;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EditorErrorKind {
    // reading or writing files
    Io,
    // content that could not be parsed or serialized
    Format,
    // rejected edits
    Validation,
    Player,
}

#[derive(Debug)]
pub struct EditorError {
    pub kind: EditorErrorKind,
    pub message: String,
}

impl EditorError {
    pub const fn new(kind: EditorErrorKind, message: String) -> Self {
        Self { kind, message }
    }
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        f.write_str(&self.message)
    }
}

impl Error for EditorError {}

impl From<std::io::Error> for EditorError {
    fn from(err: std::io::Error) -> Self {
        Self::new(EditorErrorKind::Io, err.to_string())
    }
}

impl From<serde_json::Error> for EditorError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(EditorErrorKind::Format, err.to_string())
    }
}
