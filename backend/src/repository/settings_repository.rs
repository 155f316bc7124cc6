use crate::utils::{file_reader, file_writer, get_exe_path, path_exists};
use log::{debug, warn};
use shared::error::EditorError;
use shared::model::AppSettings;
use shared::utils::SETTINGS_FILE;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn get_default_settings_path() -> PathBuf {
    get_exe_path().join(SETTINGS_FILE)
}

fn read_settings(path: &Path) -> Result<AppSettings, EditorError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(file_reader(file))?)
}

/// Missing or unreadable settings fall back to the defaults.
pub fn load_settings(path: &Path) -> AppSettings {
    if !path_exists(path) {
        debug!("No settings file at {}, using defaults", path.display());
        return AppSettings::default();
    }
    match read_settings(path) {
        Ok(settings) => settings,
        Err(err) => {
            warn!("Can't read settings {} - {err}, using defaults", path.display());
            AppSettings::default()
        }
    }
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> Result<(), EditorError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = file_writer(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, settings)?;
    writer.flush()?;
    debug!("Saved settings to {}", path.display());
    Ok(())
}
