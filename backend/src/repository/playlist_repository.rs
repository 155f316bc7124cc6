use crate::processing::parser::{parse_playlist, serialize_playlist};
use crate::utils::write_file_atomic;
use log::{debug, info};
use shared::create_editor_error;
use shared::error::{EditorError, EditorErrorKind};
use shared::model::{Playlist, PlaylistFormat};
use std::path::Path;
use tokio::task;

macro_rules! cant_read {
    ($path:expr, $err:expr) => {
        create_editor_error!(EditorErrorKind::Io, "Can't read file {} - {}", $path.display(), $err)
    }
}

/// Reads and parses a playlist, the format follows the file extension.
pub async fn load_playlist(path: &Path) -> Result<Playlist, EditorError> {
    let format = PlaylistFormat::from_path(path)?;
    let bytes = tokio::fs::read(path).await.map_err(|err| cant_read!(path, err))?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());

    let playlist = task::spawn_blocking(move || {
        let content = String::from_utf8_lossy(&bytes);
        parse_playlist(format, &content)
    })
        .await
        .map_err(|err| cant_read!(path, err))??;

    info!("Loaded {} entries from {}", playlist.len(), path.display());
    Ok(playlist)
}

/// Serializes the playlist in the format of the target extension and replaces the file.
pub async fn save_playlist(path: &Path, playlist: &Playlist) -> Result<(), EditorError> {
    let format = PlaylistFormat::from_path(path)?;
    let playlist = playlist.clone();
    let target = path.to_path_buf();
    let count = playlist.len();

    task::spawn_blocking(move || -> Result<(), EditorError> {
        let content = serialize_playlist(format, &playlist)?;
        write_file_atomic(&target, content.as_bytes())
    })
        .await
        .map_err(|err| create_editor_error!(EditorErrorKind::Io, "Failed to write playlist {} - {err}", path.display()))??;

    info!("Saved {count} entries to {}", path.display());
    Ok(())
}
