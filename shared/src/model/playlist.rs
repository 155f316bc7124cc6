use crate::utils::{escape_attribute_value, get_non_empty_str, is_blank, is_reserved_column, is_valid_url,
                   ATTR_GROUP_TITLE, ATTR_TVG_ID, ATTR_TVG_LOGO, ATTR_TVG_NAME, DEFAULT_DURATION,
                   FIELD_CHANNEL_NAME, FIELD_DURATION, FIELD_STREAM_URL, M3U_EXTINF_PREFIX, UNKNOWN_CHANNEL_NAME};
use indexmap::IndexMap;
use std::borrow::Cow;

// https://de.wikipedia.org/wiki/M3U
// https://siptv.eu/howto/playlist.html

pub trait FieldGetAccessor {
    fn get_field(&self, field: &str) -> Option<Cow<'_, str>>;
}
pub trait FieldSetAccessor {
    fn set_field(&mut self, field: &str, value: &str) -> bool;
}

/// One row of a playlist.
///
/// The reserved columns are plain fields, everything else (`tvg-id`, `group-title`, user defined
/// columns) lives in `attributes`, keyed by the column name and kept in column order by
/// [`crate::model::Playlist`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub name: String,
    pub url: String,
    pub duration: String,
    pub attributes: IndexMap<String, String>,
    // alternative stream urls found in a data file, never persisted
    pub url_candidates: Vec<String>,
}

impl PlaylistEntry {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            ..Default::default()
        }
    }

    pub fn get_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key)
            .or_else(|| self.attributes.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)).map(|(_, v)| v))
            .map(String::as_str)
    }

    /// Sets an attribute, an existing key with different case is overwritten in place.
    pub fn set_attribute(&mut self, key: &str, value: &str) {
        let existing = self.attributes.keys().find(|k| k.eq_ignore_ascii_case(key)).cloned();
        let key = existing.unwrap_or_else(|| key.to_string());
        self.attributes.insert(key, value.to_string());
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<String> {
        let existing = self.attributes.keys().find(|k| k.eq_ignore_ascii_case(key)).cloned();
        existing.and_then(|k| self.attributes.shift_remove(&k))
    }

    pub fn tvg_id(&self) -> &str {
        self.get_attribute(ATTR_TVG_ID).unwrap_or_default()
    }

    pub fn tvg_name(&self) -> &str {
        self.get_attribute(ATTR_TVG_NAME).unwrap_or_default()
    }

    pub fn tvg_logo(&self) -> &str {
        self.get_attribute(ATTR_TVG_LOGO).unwrap_or_default()
    }

    pub fn group_title(&self) -> &str {
        self.get_attribute(ATTR_GROUP_TITLE).unwrap_or_default()
    }

    pub fn has_valid_url(&self) -> bool {
        is_valid_url(&self.url)
    }

    /// Renders the `#EXTINF` line and the url line. Only the given columns are written as
    /// attributes, blank values are left out.
    pub fn to_m3u(&self, columns: &[String]) -> String {
        let duration = if is_blank(&self.duration) { DEFAULT_DURATION } else { self.duration.trim() };
        let mut line = format!("{M3U_EXTINF_PREFIX}{duration}");
        for column in columns.iter().filter(|c| !is_reserved_column(c)) {
            if let Some(value) = self.get_attribute(column) {
                if !is_blank(value) {
                    line.push(' ');
                    line.push_str(&to_attribute_key(column));
                    line.push_str("=\"");
                    line.push_str(&escape_attribute_value(&single_line(value)));
                    line.push('"');
                }
            }
        }
        let name = single_line(get_non_empty_str(&self.name, UNKNOWN_CHANNEL_NAME));
        format!("{line},{name}\n{}", single_line(&self.url))
    }
}

macro_rules! generate_field_accessor_impl_for_playlist_entry {
    ($(($prop:ident, $field:expr)),*;) => {
        impl FieldGetAccessor for PlaylistEntry {
            fn get_field(&self, field: &str) -> Option<Cow<'_, str>> {
                $(
                    if field.eq_ignore_ascii_case($field) {
                        return Some(Cow::Borrowed(self.$prop.as_str()));
                    }
                )*
                self.get_attribute(field).map(Cow::Borrowed)
            }
        }

        impl FieldSetAccessor for PlaylistEntry {
            fn set_field(&mut self, field: &str, value: &str) -> bool {
                $(
                    if field.eq_ignore_ascii_case($field) {
                        self.$prop = value.to_string();
                        return true;
                    }
                )*
                if self.get_attribute(field).is_some() {
                    self.set_attribute(field, value);
                    true
                } else {
                    false
                }
            }
        }
    }
}

generate_field_accessor_impl_for_playlist_entry!((name, FIELD_CHANNEL_NAME), (url, FIELD_STREAM_URL), (duration, FIELD_DURATION););

fn single_line(value: &str) -> Cow<'_, str> {
    if value.contains(['\r', '\n']) {
        Cow::Owned(value.replace("\r\n", " ").replace(['\r', '\n'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

pub fn is_valid_attribute_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

// column names from json files may contain characters the m3u attribute syntax can't carry
fn to_attribute_key(column: &str) -> Cow<'_, str> {
    if is_valid_attribute_key(column) {
        Cow::Borrowed(column)
    } else {
        Cow::Owned(column.trim().chars().map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '-' }).collect())
    }
}
