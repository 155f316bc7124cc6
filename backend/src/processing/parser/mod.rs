mod m3u;
mod txt;
mod json;

pub use self::m3u::*;
pub use self::txt::*;
pub use self::json::*;

use shared::error::EditorError;
use shared::model::{Playlist, PlaylistFormat};

pub fn parse_playlist(format: PlaylistFormat, content: &str) -> Result<Playlist, EditorError> {
    match format {
        PlaylistFormat::M3u | PlaylistFormat::M3u8 => Ok(parse_m3u(content)),
        PlaylistFormat::Txt => Ok(parse_txt(content)),
        PlaylistFormat::Json => parse_json(content),
    }
}

pub fn serialize_playlist(format: PlaylistFormat, playlist: &Playlist) -> Result<String, EditorError> {
    match format {
        PlaylistFormat::M3u | PlaylistFormat::M3u8 => Ok(playlist.to_m3u()),
        PlaylistFormat::Txt => Ok(playlist.to_txt()),
        PlaylistFormat::Json => playlist.to_json(),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_playlist, serialize_playlist};
    use shared::model::PlaylistFormat;

    const M3U: &str = "#EXTM3U\n#EXTINF:-1 tvg-id=\"one\" group-title=\"News\",One\nhttp://host/1.ts\n#EXTINF:-1,Two\nhttp://host/2.ts\n";

    #[test]
    fn test_convert_m3u_to_txt_and_back() {
        let playlist = parse_playlist(PlaylistFormat::M3u8, M3U).unwrap();
        let txt = serialize_playlist(PlaylistFormat::Txt, &playlist).unwrap();
        assert_eq!(txt, "ChannelName,StreamUrl\nOne,http://host/1.ts\nTwo,http://host/2.ts\n");
        let from_txt = parse_playlist(PlaylistFormat::Txt, &txt).unwrap();
        assert_eq!(from_txt.len(), playlist.len());
        for (a, b) in from_txt.entries().iter().zip(playlist.entries()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.url, b.url);
        }
    }

    #[test]
    fn test_convert_m3u_to_json_and_back() {
        let playlist = parse_playlist(PlaylistFormat::M3u, M3U).unwrap();
        let json = serialize_playlist(PlaylistFormat::Json, &playlist).unwrap();
        let from_json = parse_playlist(PlaylistFormat::Json, &json).unwrap();
        assert_eq!(from_json.columns(), playlist.columns());
        assert_eq!(serialize_playlist(PlaylistFormat::M3u, &from_json).unwrap(), M3U);
    }
}
