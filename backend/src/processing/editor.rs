use crate::repository::{load_playlist, save_playlist};
use crate::tools::{launch_player, resolve_player};
use log::{error, info};
use shared::error::EditorError;
use shared::model::{AppSettings, ColumnEditor, FieldSetAccessor, Playlist, PlaylistEntry};
use shared::utils::is_reserved_column;
use shared::validation_err_res;
use std::path::{Path, PathBuf};

/// An editing session on one playlist.
///
/// Every operation leaves a message in [`PlaylistEditor::status`]. A failed
/// operation keeps the previously loaded playlist and selection.
#[derive(Debug, Default)]
pub struct PlaylistEditor {
    playlist: Option<Playlist>,
    file_path: Option<PathBuf>,
    selected: Option<usize>,
    status: String,
}

impl PlaylistEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn playlist(&self) -> Option<&Playlist> {
        self.playlist.as_ref()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&PlaylistEntry> {
        self.selected.and_then(|idx| self.playlist.as_ref()?.entry(idx))
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    fn set_status(&mut self, status: String) {
        info!("{status}");
        self.status = status;
    }

    fn report<T>(&mut self, result: Result<T, EditorError>) -> Result<T, EditorError> {
        if let Err(err) = &result {
            error!("{err}");
            self.status = err.to_string();
        }
        result
    }

    fn playlist_mut(&mut self) -> Result<&mut Playlist, EditorError> {
        match self.playlist.as_mut() {
            Some(playlist) => Ok(playlist),
            None => validation_err_res!("No playlist loaded"),
        }
    }

    fn loaded(&self) -> Result<&Playlist, EditorError> {
        match self.playlist.as_ref() {
            Some(playlist) => Ok(playlist),
            None => validation_err_res!("No playlist loaded"),
        }
    }

    fn selected_index(&self) -> Result<usize, EditorError> {
        match self.selected {
            Some(idx) => Ok(idx),
            None => validation_err_res!("No channel selected"),
        }
    }

    /// Replaces the current playlist with the content of `path`.
    pub async fn load_playlist_from_path(&mut self, path: &Path) -> Result<usize, EditorError> {
        let result = load_playlist(path).await;
        let playlist = self.report(result)?;
        let count = playlist.len();
        self.selected = if playlist.is_empty() { None } else { Some(0) };
        self.playlist = Some(playlist);
        self.file_path = Some(path.to_path_buf());
        self.set_status(format!("Loaded {count} channels from {}", path.display()));
        Ok(count)
    }

    pub async fn reload(&mut self) -> Result<usize, EditorError> {
        let Some(path) = self.file_path.clone() else {
            let result = validation_err_res!("No file to reload");
            return self.report(result);
        };
        self.load_playlist_from_path(&path).await
    }

    /// Saves to `path`, or to the file the playlist was loaded from. The format follows
    /// the extension of the target.
    pub async fn save(&mut self, path: Option<&Path>) -> Result<PathBuf, EditorError> {
        let result = self.save_to(path).await;
        let target = self.report(result)?;
        self.file_path = Some(target.clone());
        self.set_status(format!("Saved to {}", target.display()));
        Ok(target)
    }

    async fn save_to(&self, path: Option<&Path>) -> Result<PathBuf, EditorError> {
        let playlist = self.loaded()?;
        let Some(target) = path.or(self.file_path.as_deref()).map(Path::to_path_buf) else {
            return validation_err_res!("No file to save to");
        };
        save_playlist(&target, playlist).await?;
        Ok(target)
    }

    /// Writes the playlist as json next to the current file unless a path is given.
    pub async fn export_json(&mut self, path: Option<&Path>) -> Result<PathBuf, EditorError> {
        let target = match path {
            Some(p) => Some(p.to_path_buf()),
            None => self.file_path.as_ref().map(|p| p.with_extension("json")),
        };
        let result = match (self.loaded(), target) {
            (Err(err), _) => Err(err),
            (Ok(_), None) => validation_err_res!("No file to export to"),
            (Ok(playlist), Some(target)) => save_playlist(&target, playlist).await.map(|()| target),
        };
        let target = self.report(result)?;
        self.set_status(format!("Exported json to {}", target.display()));
        Ok(target)
    }

    /// Looks up alternative stream urls for every channel in another playlist file.
    pub async fn load_data_file(&mut self, path: &Path) -> Result<usize, EditorError> {
        let result = match self.loaded() {
            Ok(_) => load_playlist(path).await,
            Err(err) => Err(err),
        };
        let data = self.report(result)?;
        let matched = self.playlist_mut()?.apply_candidates(&data);
        self.set_status(format!("Found candidates for {matched} channels in {}", path.display()));
        Ok(matched)
    }

    pub fn select(&mut self, index: usize) -> Result<(), EditorError> {
        let result = match self.loaded() {
            Ok(playlist) if index < playlist.len() => Ok(()),
            Ok(_) => validation_err_res!("Row {index} out of range"),
            Err(err) => Err(err),
        };
        self.report(result)?;
        self.selected = Some(index);
        Ok(())
    }

    pub fn move_selected(&mut self, offset: isize) -> Result<usize, EditorError> {
        let result = self.selected_index()
            .and_then(|idx| self.playlist_mut().and_then(|playlist| playlist.move_entry(idx, offset)));
        let target = self.report(result)?;
        self.selected = Some(target);
        self.set_status(format!("Moved channel to row {target}"));
        Ok(target)
    }

    pub fn insert_after_selected(&mut self) -> Result<usize, EditorError> {
        let selected = self.selected;
        let result = self.playlist_mut().map(|playlist| playlist.insert_new_after(selected));
        let index = self.report(result)?;
        self.selected = Some(index);
        self.set_status(format!("Inserted channel at row {index}"));
        Ok(index)
    }

    pub fn delete_selected(&mut self) -> Result<PlaylistEntry, EditorError> {
        let result = self.selected_index()
            .and_then(|idx| self.playlist_mut().and_then(|playlist| playlist.remove_entry(idx)));
        let (removed, next) = self.report(result)?;
        self.selected = next;
        self.set_status(format!("Deleted channel {}", removed.name));
        Ok(removed)
    }

    /// Changes one cell of the selected row.
    pub fn set_selected_field(&mut self, column: &str, value: &str) -> Result<(), EditorError> {
        let result = self.selected_index().and_then(|idx| {
            let playlist = self.playlist_mut()?;
            let Some(column) = playlist.find_column(column).map(ToString::to_string) else {
                return validation_err_res!("Unknown column {column}");
            };
            let Some(entry) = playlist.entry_mut(idx) else {
                return validation_err_res!("Row {idx} out of range");
            };
            if is_reserved_column(&column) {
                entry.set_field(&column, value);
            } else {
                entry.set_attribute(&column, value);
            }
            Ok(column)
        });
        let column = self.report(result)?;
        self.set_status(format!("Changed {column}"));
        Ok(())
    }

    /// Runs `edit` on a column editor for the current schema and applies the result
    /// once it validates.
    pub fn edit_columns<F>(&mut self, edit: F) -> Result<(), EditorError>
    where
        F: FnOnce(&mut ColumnEditor) -> Result<(), EditorError>,
    {
        let result = self.playlist_mut().and_then(|playlist| {
            let mut editor = ColumnEditor::new(playlist.column_schema());
            edit(&mut editor)?;
            let schema = editor.result()?;
            playlist.apply_column_changes(&schema)
        });
        self.report(result)?;
        self.set_status("Columns updated".to_string());
        Ok(())
    }

    pub fn use_candidate(&mut self, candidate: usize) -> Result<(), EditorError> {
        let result = self.selected_index()
            .and_then(|idx| self.playlist_mut().and_then(|playlist| playlist.use_candidate(idx, candidate)));
        self.report(result)?;
        self.set_status("Stream url replaced".to_string());
        Ok(())
    }

    pub fn search(&mut self, column: &str, text: &str) -> Vec<usize> {
        let found = self.playlist.as_ref().map(|playlist| playlist.filter(column, text)).unwrap_or_default();
        self.set_status(format!("{} channels match", found.len()));
        found
    }

    pub fn search_regex(&mut self, column: &str, pattern: &str) -> Result<Vec<usize>, EditorError> {
        let result = self.loaded().and_then(|playlist| playlist.filter_regex(column, pattern));
        let found = self.report(result)?;
        self.set_status(format!("{} channels match", found.len()));
        Ok(found)
    }

    pub fn group_titles(&self) -> Vec<String> {
        self.playlist.as_ref().map(Playlist::group_titles).unwrap_or_default()
    }

    /// Opens the stream url of the selected channel in the external player.
    pub fn play(&mut self, settings: &AppSettings, player_override: Option<&str>) -> Result<(), EditorError> {
        let result = self.selected_index()
            .and_then(|_| match self.selected_entry() {
                Some(entry) => Ok(entry.url.clone()),
                None => validation_err_res!("No channel selected"),
            })
            .and_then(|url| resolve_player(settings, player_override).and_then(|player| launch_player(&player, &url)));
        self.report(result)?;
        self.set_status("Player started".to_string());
        Ok(())
    }
}
