use crate::utils::{path_exists, resolve_file_path};
use log::info;
use shared::create_editor_error_result;
use shared::error::{EditorError, EditorErrorKind};
use shared::model::AppSettings;
use shared::utils::is_blank;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// The player to launch, a player given on the command line wins over the settings.
pub fn resolve_player(settings: &AppSettings, player_override: Option<&str>) -> Result<PathBuf, EditorError> {
    let player = player_override
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .or_else(|| settings.player_path());
    let Some(player) = player else {
        return create_editor_error_result!(EditorErrorKind::Player, "No player configured, set one with --player");
    };
    let path = resolve_file_path(player);
    if !path_exists(&path) {
        return create_editor_error_result!(EditorErrorKind::Player, "Player {} not found", path.display());
    }
    Ok(path)
}

/// Starts the player detached with the stream url as its only argument.
pub fn launch_player(player: &Path, url: &str) -> Result<(), EditorError> {
    if is_blank(url) {
        return create_editor_error_result!(EditorErrorKind::Validation, "The selected channel has no stream url");
    }
    match Command::new(player)
        .arg(url.trim())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn() {
        Ok(child) => {
            info!("Started {} (pid {}) for {}", player.display(), child.id(), url.trim());
            Ok(())
        }
        Err(err) => create_editor_error_result!(EditorErrorKind::Player, "Failed to start player {} - {err}", player.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::{launch_player, resolve_player};
    use shared::error::EditorErrorKind;
    use shared::model::AppSettings;
    use std::path::Path;

    #[test]
    fn test_resolve_player() {
        let dir = tempfile::tempdir().unwrap();
        let player = dir.path().join("player.exe");
        std::fs::write(&player, "").unwrap();

        let mut settings = AppSettings::default();
        assert_eq!(resolve_player(&settings, None).unwrap_err().kind, EditorErrorKind::Player);
        assert_eq!(resolve_player(&settings, Some("  ")).unwrap_err().kind, EditorErrorKind::Player);

        settings.player_path = Some(player.to_string_lossy().to_string());
        assert_eq!(resolve_player(&settings, None).unwrap(), player);

        let missing = dir.path().join("other.exe");
        let err = resolve_player(&settings, Some(&missing.to_string_lossy())).unwrap_err();
        assert_eq!(err.kind, EditorErrorKind::Player);
    }

    #[test]
    fn test_launch_player() {
        assert_eq!(launch_player(Path::new("/bin/sh"), " ").unwrap_err().kind, EditorErrorKind::Validation);
        let dir = tempfile::tempdir().unwrap();
        let err = launch_player(&dir.path().join("missing"), "http://host/1.ts").unwrap_err();
        assert_eq!(err.kind, EditorErrorKind::Player);
    }
}
