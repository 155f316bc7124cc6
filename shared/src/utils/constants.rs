// reserved columns, they can be reordered but never renamed or removed
pub const FIELD_CHANNEL_NAME: &str = "ChannelName";
pub const FIELD_STREAM_URL: &str = "StreamUrl";
pub const FIELD_DURATION: &str = "Duration";
pub const RESERVED_COLUMNS: &[&str] = &[FIELD_CHANNEL_NAME, FIELD_STREAM_URL, FIELD_DURATION];

pub const ATTR_TVG_ID: &str = "tvg-id";
pub const ATTR_TVG_NAME: &str = "tvg-name";
pub const ATTR_TVG_LOGO: &str = "tvg-logo";
pub const ATTR_GROUP_TITLE: &str = "group-title";

// https://de.wikipedia.org/wiki/M3U
pub const M3U_HEADER: &str = "#EXTM3U";
pub const M3U_EXTINF: &str = "#EXTINF";
pub const M3U_EXTINF_PREFIX: &str = "#EXTINF:";

pub const DEFAULT_DURATION: &str = "-1";
pub const UNKNOWN_CHANNEL_NAME: &str = "Unknown Channel";
pub const NEW_CHANNEL_NAME: &str = "New Channel";
pub const NEW_COLUMN_NAME: &str = "new-column";

pub const SETTINGS_FILE: &str = "settings.json";

pub fn is_reserved_column(name: &str) -> bool {
    RESERVED_COLUMNS.iter().any(|c| c.eq_ignore_ascii_case(name))
}
