use crate::error::{EditorError, EditorErrorKind};
use crate::create_editor_error_result;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum PlaylistFormat {
    M3u,
    M3u8,
    Txt,
    Json,
}

impl PlaylistFormat {
    const M3U: &'static str = "m3u";
    const M3U8: &'static str = "m3u8";
    const TXT: &'static str = "txt";
    const JSON: &'static str = "json";

    pub const fn extension(&self) -> &'static str {
        match self {
            Self::M3u => Self::M3U,
            Self::M3u8 => Self::M3U8,
            Self::Txt => Self::TXT,
            Self::Json => Self::JSON,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, EditorError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => Self::from_str(ext),
            None => create_editor_error_result!(EditorErrorKind::Format, "Unsupported playlist file {}", path.display()),
        }
    }
}

impl FromStr for PlaylistFormat {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ext = s.trim().trim_start_matches('.');
        if ext.eq_ignore_ascii_case(Self::M3U) {
            Ok(Self::M3u)
        } else if ext.eq_ignore_ascii_case(Self::M3U8) {
            Ok(Self::M3u8)
        } else if ext.eq_ignore_ascii_case(Self::TXT) {
            Ok(Self::Txt)
        } else if ext.eq_ignore_ascii_case(Self::JSON) {
            Ok(Self::Json)
        } else {
            create_editor_error_result!(EditorErrorKind::Format, "Unsupported playlist format {s}")
        }
    }
}

impl Display for PlaylistFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}
