use shared::create_editor_error_result;
use shared::error::{EditorError, EditorErrorKind};
use shared::model::{FieldSetAccessor, Playlist, PlaylistEntry};
use shared::utils::{get_string_from_serde_value, is_reserved_column, ATTR_GROUP_TITLE, ATTR_TVG_ID, ATTR_TVG_LOGO,
                    ATTR_TVG_NAME, FIELD_CHANNEL_NAME, FIELD_STREAM_URL};
use crate::utils::debug_if_enabled;
use serde_json::{Map, Value};

// keys written by earlier exports
const LEGACY_KEYS: &[(&str, &str)] = &[
    ("Name2", FIELD_CHANNEL_NAME),
    ("Link", FIELD_STREAM_URL),
    ("Tvgname", ATTR_TVG_NAME),
    ("Tvgid", ATTR_TVG_ID),
    ("Tvglogo", ATTR_TVG_LOGO),
    ("Grouptitle", ATTR_GROUP_TITLE),
];
const IGNORED_KEYS: &[&str] = &["IsHighlighted", "StreamUrlCandidates"];

fn map_key(key: &str) -> &str {
    LEGACY_KEYS.iter()
        .find(|(legacy, _)| legacy.eq_ignore_ascii_case(key))
        .map_or(key, |&(_, column)| column)
}

fn entry_from_json(row: &Map<String, Value>) -> PlaylistEntry {
    let mut entry = PlaylistEntry::default();
    for (key, value) in row {
        if IGNORED_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key)) {
            continue;
        }
        let Some(text) = get_string_from_serde_value(value) else {
            debug_if_enabled!("Skipping non scalar value for {}", key);
            continue;
        };
        let column = map_key(key.trim());
        if column.is_empty() {
            continue;
        }
        if is_reserved_column(column) {
            entry.set_field(column, &text);
        } else {
            entry.set_attribute(column, &text);
        }
    }
    entry
}

/// A json array of objects, one object per row keyed by column name.
pub fn parse_json(content: &str) -> Result<Playlist, EditorError> {
    let value: Value = serde_json::from_str(content)?;
    let Value::Array(rows) = value else {
        return create_editor_error_result!(EditorErrorKind::Format, "A json playlist has to be an array of objects");
    };
    let mut playlist = Playlist::new();
    for row in &rows {
        match row {
            Value::Object(map) => {
                playlist.push_entry(entry_from_json(map));
            }
            _ => debug_if_enabled!("Skipping json row which is not an object"),
        }
    }
    Ok(playlist)
}

#[cfg(test)]
mod tests {
    use super::parse_json;
    use shared::error::EditorErrorKind;

    #[test]
    fn test_parse_json() {
        let content = r#"[
            {"ChannelName": "One", "StreamUrl": "http://host/1.ts", "Duration": -1, "tvg-id": "one", "group-title": null},
            {"ChannelName": "Two", "StreamUrl": "http://host/2.ts", "extra": {"nested": true}, "catchup": "append"}
        ]"#;
        let playlist = parse_json(content).unwrap();
        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.columns(), ["ChannelName", "StreamUrl", "Duration", "tvg-id", "group-title", "catchup"]);
        let one = playlist.entry(0).unwrap();
        assert_eq!(one.duration, "-1");
        assert_eq!(one.tvg_id(), "one");
        assert_eq!(one.group_title(), "");
        assert!(playlist.entry(1).unwrap().get_attribute("extra").is_none());
    }

    #[test]
    fn test_parse_legacy_json() {
        let content = r#"[{"Tvgname": "CCTV1", "Tvgid": "cctv1", "Tvglogo": "", "Grouptitle": "News", "Name2": "CCTV-1", "Link": "http://host/1.ts", "IsHighlighted": false}]"#;
        let playlist = parse_json(content).unwrap();
        let entry = playlist.entry(0).unwrap();
        assert_eq!(entry.name, "CCTV-1");
        assert_eq!(entry.url, "http://host/1.ts");
        assert_eq!(entry.tvg_name(), "CCTV1");
        assert_eq!(entry.group_title(), "News");
        assert!(entry.get_attribute("IsHighlighted").is_none());
    }

    #[test]
    fn test_round_trip() {
        let content = r#"[{"ChannelName": "One", "StreamUrl": "http://host/1.ts", "Duration": "-1", "tvg-id": "one"}]"#;
        let playlist = parse_json(content).unwrap();
        let reparsed = parse_json(&playlist.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, playlist);
    }

    #[test]
    fn test_invalid_json() {
        assert_eq!(parse_json("{\"a\": 1}").unwrap_err().kind, EditorErrorKind::Format);
        assert_eq!(parse_json("[{").unwrap_err().kind, EditorErrorKind::Format);
    }
}
