use shared::model::{Playlist, PlaylistEntry};
use shared::utils::{FIELD_CHANNEL_NAME, FIELD_STREAM_URL};
use crate::utils::debug_if_enabled;

const TXT_SEPARATOR: char = ',';

/// Plain text playlists, one `name,url` per line. The first row may be a
/// `ChannelName,StreamUrl` header.
pub fn parse_txt(content: &str) -> Playlist {
    let mut playlist = Playlist::new();
    let mut first_row = true;
    for raw_line in content.lines() {
        let line = raw_line.trim_start_matches('\u{feff}').trim();
        if line.is_empty() {
            continue;
        }
        let Some((name, url)) = line.split_once(TXT_SEPARATOR) else {
            debug_if_enabled!("Skipping line without url: {}", line);
            continue;
        };
        let (name, url) = (name.trim(), url.trim());
        if first_row {
            first_row = false;
            if name.eq_ignore_ascii_case(FIELD_CHANNEL_NAME) && url.eq_ignore_ascii_case(FIELD_STREAM_URL) {
                continue;
            }
        }
        playlist.push_entry(PlaylistEntry::new(name, url));
    }
    playlist
}

#[cfg(test)]
mod tests {
    use super::parse_txt;

    #[test]
    fn test_parse_txt() {
        let content = "channelname, streamurl\n\nCCTV-1,http://host/cctv1.m3u8\nbroken line\n  HBO , http://host/hbo.ts?a=1,b=2 \n";
        let playlist = parse_txt(content);
        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.entry(0).unwrap().name, "CCTV-1");
        assert_eq!(playlist.entry(1).unwrap().name, "HBO");
        assert_eq!(playlist.entry(1).unwrap().url, "http://host/hbo.ts?a=1,b=2");
        assert_eq!(playlist.columns(), ["ChannelName", "StreamUrl", "Duration"]);
    }

    #[test]
    fn test_header_only_on_first_row() {
        let content = "One,http://host/1.ts\nChannelName,StreamUrl\n";
        let playlist = parse_txt(content);
        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.entry(1).unwrap().name, "ChannelName");
    }

    #[test]
    fn test_rows_with_single_field_are_skipped() {
        let playlist = parse_txt("just a name\nanother\nName,\n");
        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist.entry(0).unwrap().url, "");
    }

    #[test]
    fn test_round_trip() {
        let content = "ChannelName,StreamUrl\nOne,http://host/1.ts\nTwo,http://host/2.ts\n";
        assert_eq!(parse_txt(content).to_txt(), content);
    }
}
