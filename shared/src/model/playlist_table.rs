use crate::error::EditorError;
use crate::model::{validate_schema, ColumnSchemaEntry, FieldGetAccessor, PlaylistEntry};
use crate::utils::{contains_ignore_case, is_blank, is_reserved_column, ATTR_GROUP_TITLE, DEFAULT_DURATION,
                   FIELD_CHANNEL_NAME, FIELD_STREAM_URL, M3U_HEADER, NEW_CHANNEL_NAME, RESERVED_COLUMNS};
use crate::validation_err_res;
use indexmap::IndexMap;
use log::debug;
use regex::RegexBuilder;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// An ordered list of entries with a column schema.
///
/// The schema always holds the reserved columns. Every attribute key of an entry matches a
/// column name exactly, keys differing only in case are folded into the existing column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    columns: Vec<String>,
    entries: Vec<PlaylistEntry>,
}

impl Default for Playlist {
    fn default() -> Self {
        Self::new()
    }
}

impl Playlist {
    pub fn new() -> Self {
        Self {
            columns: RESERVED_COLUMNS.iter().map(ToString::to_string).collect(),
            entries: Vec::new(),
        }
    }

    pub fn from_entries(entries: Vec<PlaylistEntry>) -> Self {
        let mut playlist = Self::new();
        for entry in entries {
            playlist.push_entry(entry);
        }
        playlist
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&PlaylistEntry> {
        self.entries.get(index)
    }

    pub fn entry_mut(&mut self, index: usize) -> Option<&mut PlaylistEntry> {
        self.entries.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find_column(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.columns.iter().find(|c| c.eq_ignore_ascii_case(name)).map(String::as_str)
    }

    fn find_column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.columns.iter().position(|c| c.eq_ignore_ascii_case(name))
    }

    fn register_columns(&mut self, entry: &mut PlaylistEntry) {
        if entry.attributes.is_empty() {
            return;
        }
        let attributes = std::mem::take(&mut entry.attributes);
        let mut normalized = IndexMap::with_capacity(attributes.len());
        for (key, value) in attributes {
            if is_reserved_column(&key) {
                debug!("Ignoring attribute {key} which collides with a reserved column");
                continue;
            }
            let column = if let Some(existing) = self.find_column(&key) {
                existing.to_string()
            } else {
                self.columns.push(key.clone());
                key
            };
            normalized.insert(column, value);
        }
        entry.attributes = normalized;
    }

    pub fn push_entry(&mut self, mut entry: PlaylistEntry) -> usize {
        self.register_columns(&mut entry);
        self.entries.push(entry);
        self.entries.len() - 1
    }

    /// Inserts at `index`, indices past the end append.
    pub fn insert_entry(&mut self, index: usize, mut entry: PlaylistEntry) -> usize {
        self.register_columns(&mut entry);
        let index = index.min(self.entries.len());
        self.entries.insert(index, entry);
        index
    }

    /// Inserts a new blank channel after `selected`, or at the end without selection.
    pub fn insert_new_after(&mut self, selected: Option<usize>) -> usize {
        let entry = PlaylistEntry {
            name: NEW_CHANNEL_NAME.to_string(),
            duration: DEFAULT_DURATION.to_string(),
            ..Default::default()
        };
        let index = selected.map_or(self.entries.len(), |idx| idx.saturating_add(1));
        self.insert_entry(index, entry)
    }

    /// Removes a row and returns it with the index that should be selected afterward.
    pub fn remove_entry(&mut self, index: usize) -> Result<(PlaylistEntry, Option<usize>), EditorError> {
        if index >= self.entries.len() {
            return validation_err_res!("Row {index} out of range");
        }
        let removed = self.entries.remove(index);
        let next = if self.entries.is_empty() { None } else { Some(index.min(self.entries.len() - 1)) };
        Ok((removed, next))
    }

    pub fn can_move(&self, index: usize, offset: isize) -> bool {
        index < self.entries.len()
            && index.checked_add_signed(offset).is_some_and(|target| target < self.entries.len())
    }

    /// Moves a row by `offset` and returns its new index.
    pub fn move_entry(&mut self, index: usize, offset: isize) -> Result<usize, EditorError> {
        if index >= self.entries.len() {
            return validation_err_res!("Row {index} out of range");
        }
        if !self.can_move(index, offset) {
            return if offset < 0 {
                validation_err_res!("Already at the top of the list")
            } else {
                validation_err_res!("Already at the bottom of the list")
            };
        }
        let target = index.saturating_add_signed(offset);
        let entry = self.entries.remove(index);
        self.entries.insert(target, entry);
        Ok(target)
    }

    pub fn column_schema(&self) -> Vec<ColumnSchemaEntry> {
        self.columns.iter().map(|c| ColumnSchemaEntry::existing(c)).collect()
    }

    /// Applies an edited schema: columns are renamed through their original name, added ones
    /// start empty, the order follows the schema and non-reserved columns missing from it
    /// are dropped together with their values.
    pub fn apply_column_changes(&mut self, schema: &[ColumnSchemaEntry]) -> Result<(), EditorError> {
        validate_schema(schema)?;

        let mut columns = Vec::with_capacity(schema.len());
        // (current attribute key, new attribute key)
        let mut plan: Vec<(Option<String>, String)> = Vec::new();
        for item in schema {
            let target = item.name.trim().to_string();
            let existing = item.original_name.as_deref()
                .and_then(|name| self.find_column_index(name))
                .or_else(|| self.find_column_index(&target));
            let source = existing.map(|idx| self.columns[idx].clone());
            if !is_reserved_column(&target) {
                plan.push((source, target.clone()));
            }
            columns.push(target);
        }

        let kept = columns.iter().map(|c| c.to_lowercase()).collect::<HashSet<_>>();
        for reserved in RESERVED_COLUMNS {
            if !kept.contains(&reserved.to_lowercase()) {
                columns.push((*reserved).to_string());
            }
        }
        for column in &self.columns {
            if !kept.contains(&column.to_lowercase()) && !is_reserved_column(column) {
                debug!("Dropping column {column}");
            }
        }

        for entry in &mut self.entries {
            let old = std::mem::take(&mut entry.attributes);
            entry.attributes = plan.iter()
                .map(|(source, target)| {
                    let value = source.as_ref().and_then(|s| old.get(s)).cloned().unwrap_or_default();
                    (target.clone(), value)
                })
                .collect();
        }
        self.columns = columns;
        Ok(())
    }

    /// Indices of the rows whose `column` contains `text`, ignoring case.
    pub fn filter(&self, column: &str, text: &str) -> Vec<usize> {
        if is_blank(column) || is_blank(text) {
            return (0..self.entries.len()).collect();
        }
        let Some(column) = self.find_column(column) else {
            return Vec::new();
        };
        let needle = text.to_lowercase();
        self.entries.iter().enumerate()
            .filter(|(_, entry)| entry.get_field(column).is_some_and(|value| value.to_lowercase().contains(&needle)))
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Like [`Playlist::filter`] with a case-insensitive regular expression.
    pub fn filter_regex(&self, column: &str, pattern: &str) -> Result<Vec<usize>, EditorError> {
        if is_blank(column) || is_blank(pattern) {
            return Ok((0..self.entries.len()).collect());
        }
        let regex = match RegexBuilder::new(pattern).case_insensitive(true).build() {
            Ok(regex) => regex,
            Err(err) => return validation_err_res!("Invalid search pattern {pattern} - {err}"),
        };
        let Some(column) = self.find_column(column) else {
            return Ok(Vec::new());
        };
        Ok(self.entries.iter().enumerate()
            .filter(|(_, entry)| entry.get_field(column).is_some_and(|value| regex.is_match(&value)))
            .map(|(idx, _)| idx)
            .collect())
    }

    /// Distinct `group-title` values in order of appearance.
    pub fn group_titles(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries.iter()
            .map(|entry| entry.get_attribute(ATTR_GROUP_TITLE).unwrap_or_default().trim())
            .filter(|title| !title.is_empty() && seen.insert(title.to_lowercase()))
            .map(ToString::to_string)
            .collect()
    }

    /// Collects alternative stream urls from `data` for every row whose channel name is
    /// contained in a data row's name. Returns the number of rows with candidates.
    pub fn apply_candidates(&mut self, data: &Playlist) -> usize {
        let candidates: Vec<(&str, &str)> = data.entries.iter()
            .filter(|e| !is_blank(&e.name) && !is_blank(&e.url))
            .map(|e| (e.name.as_str(), e.url.as_str()))
            .collect();

        let mut matched_rows = 0;
        for entry in &mut self.entries {
            let mut urls: Vec<String> = Vec::new();
            if !is_blank(&entry.name) {
                for (name, url) in &candidates {
                    if !contains_ignore_case(name, &entry.name) {
                        continue;
                    }
                    if !is_blank(&entry.url) && url.eq_ignore_ascii_case(&entry.url) {
                        continue;
                    }
                    if !urls.iter().any(|u| u == url) {
                        urls.push((*url).to_string());
                    }
                }
            }
            if !urls.is_empty() {
                matched_rows += 1;
            }
            entry.url_candidates = urls;
        }
        matched_rows
    }

    /// Replaces the stream url of a row with one of its candidates, the previous url becomes
    /// a candidate itself.
    pub fn use_candidate(&mut self, index: usize, candidate: usize) -> Result<(), EditorError> {
        let Some(entry) = self.entries.get_mut(index) else {
            return validation_err_res!("Row {index} out of range");
        };
        if candidate >= entry.url_candidates.len() {
            return validation_err_res!("Row {index} has no candidate {candidate}");
        }
        let url = entry.url_candidates.remove(candidate);
        let previous = std::mem::replace(&mut entry.url, url);
        if !is_blank(&previous) {
            entry.url_candidates.insert(candidate, previous);
        }
        Ok(())
    }

    pub fn invalid_urls(&self) -> Vec<usize> {
        self.entries.iter().enumerate()
            .filter(|(_, entry)| !entry.has_valid_url())
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn to_m3u(&self) -> String {
        let mut content = String::with_capacity(self.entries.len() * 128 + 8);
        content.push_str(M3U_HEADER);
        content.push('\n');
        for entry in &self.entries {
            content.push_str(&entry.to_m3u(&self.columns));
            content.push('\n');
        }
        content
    }

    pub fn to_txt(&self) -> String {
        let mut content = format!("{FIELD_CHANNEL_NAME},{FIELD_STREAM_URL}\n");
        for entry in &self.entries {
            // the first comma separates name and url
            let name = entry.name.replace(',', " ");
            content.push_str(&format!("{},{}\n", name.trim(), entry.url.trim()));
        }
        content
    }

    pub fn to_json_value(&self) -> Value {
        Value::Array(self.entries.iter()
            .map(|entry| {
                let row: Map<String, Value> = self.columns.iter()
                    .map(|column| (column.clone(), Value::String(entry.get_field(column).unwrap_or_default().into_owned())))
                    .collect();
                Value::Object(row)
            })
            .collect())
    }

    pub fn to_json(&self) -> Result<String, EditorError> {
        Ok(serde_json::to_string_pretty(&self.to_json_value())?)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::EditorErrorKind;
    use crate::model::{ColumnEditor, ColumnSchemaEntry, Playlist, PlaylistEntry};

    fn entry(name: &str, url: &str, group: &str) -> PlaylistEntry {
        let mut entry = PlaylistEntry::new(name, url);
        entry.duration = "-1".to_string();
        entry.set_attribute("tvg-id", &name.to_lowercase());
        entry.set_attribute("group-title", group);
        entry
    }

    fn playlist() -> Playlist {
        Playlist::from_entries(vec![
            entry("CCTV-1", "http://tv.example/cctv1.m3u8", "News"),
            entry("CCTV-2", "http://tv.example/cctv2.m3u8", "news "),
            entry("HBO", "http://tv.example/hbo.ts", "Movies"),
        ])
    }

    #[test]
    fn test_columns_are_registered() {
        let mut playlist = playlist();
        assert_eq!(playlist.columns(), ["ChannelName", "StreamUrl", "Duration", "tvg-id", "group-title"]);
        let mut other = PlaylistEntry::new("X", "http://x");
        other.set_attribute("Group-Title", "Kids");
        other.set_attribute("duration", "5");
        playlist.push_entry(other);
        assert_eq!(playlist.columns().len(), 5);
        let last = playlist.entry(3).unwrap();
        assert_eq!(last.attributes.get("group-title").map(String::as_str), Some("Kids"));
        assert!(last.attributes.get("duration").is_none());
    }

    #[test]
    fn test_insert_new_after() {
        let mut playlist = playlist();
        assert_eq!(playlist.insert_new_after(Some(0)), 1);
        assert_eq!(playlist.entry(1).unwrap().name, "New Channel");
        assert_eq!(playlist.entry(1).unwrap().duration, "-1");
        assert_eq!(playlist.insert_new_after(None), 4);
        assert_eq!(playlist.insert_new_after(Some(100)), 5);
    }

    #[test]
    fn test_remove_entry() {
        let mut playlist = playlist();
        let (removed, next) = playlist.remove_entry(2).unwrap();
        assert_eq!(removed.name, "HBO");
        assert_eq!(next, Some(1));
        assert!(playlist.remove_entry(5).is_err());
        playlist.remove_entry(0).unwrap();
        let (_, next) = playlist.remove_entry(0).unwrap();
        assert_eq!(next, None);
        assert!(playlist.is_empty());
    }

    #[test]
    fn test_move_entry() {
        let mut playlist = playlist();
        assert!(playlist.move_entry(0, -1).is_err());
        assert!(playlist.move_entry(2, 1).is_err());
        assert_eq!(playlist.move_entry(0, 1).unwrap(), 1);
        let names: Vec<&str> = playlist.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["CCTV-2", "CCTV-1", "HBO"]);
        assert_eq!(playlist.move_entry(2, -1).unwrap(), 1);
        assert_eq!(playlist.entry(1).unwrap().name, "HBO");
    }

    #[test]
    fn test_apply_column_changes() {
        let mut playlist = playlist();
        let mut editor = ColumnEditor::new(playlist.column_schema());
        editor.rename(3, "tvg-chno").unwrap();
        editor.select(4).unwrap();
        editor.add_named_column("tvg-logo").unwrap();
        editor.select(0).unwrap();
        editor.move_selected(1).unwrap();
        playlist.apply_column_changes(&editor.result().unwrap()).unwrap();

        assert_eq!(playlist.columns(), ["StreamUrl", "ChannelName", "Duration", "tvg-chno", "group-title", "tvg-logo"]);
        let first = playlist.entry(0).unwrap();
        assert_eq!(first.get_attribute("tvg-chno"), Some("cctv-1"));
        assert_eq!(first.get_attribute("tvg-logo"), Some(""));
        assert!(first.get_attribute("tvg-id").is_none());
    }

    #[test]
    fn test_apply_column_changes_drops_missing_columns() {
        let mut playlist = playlist();
        let schema = vec![
            ColumnSchemaEntry::existing("ChannelName"),
            ColumnSchemaEntry::existing("group-title"),
        ];
        playlist.apply_column_changes(&schema).unwrap();
        assert_eq!(playlist.columns(), ["ChannelName", "group-title", "StreamUrl", "Duration"]);
        assert!(playlist.entries().iter().all(|e| e.get_attribute("tvg-id").is_none()));
        assert_eq!(playlist.entry(2).unwrap().group_title(), "Movies");
    }

    #[test]
    fn test_apply_column_changes_swaps_names() {
        let mut playlist = playlist();
        let schema = vec![
            ColumnSchemaEntry::new("group-title", false, Some("tvg-id")),
            ColumnSchemaEntry::new("tvg-id", false, Some("group-title")),
        ];
        playlist.apply_column_changes(&schema).unwrap();
        let hbo = playlist.entry(2).unwrap();
        assert_eq!(hbo.group_title(), "hbo");
        assert_eq!(hbo.tvg_id(), "Movies");
    }

    #[test]
    fn test_apply_column_changes_rejects_reserved_rename() {
        let mut playlist = playlist();
        let schema = vec![ColumnSchemaEntry::new("Name", true, Some("ChannelName"))];
        assert!(playlist.apply_column_changes(&schema).is_err());
        // the reserved flag follows the original column, not the caller
        let schema = vec![ColumnSchemaEntry::new("Name", false, Some("ChannelName"))];
        assert!(playlist.apply_column_changes(&schema).is_err());
        assert_eq!(playlist.columns().len(), 5);
    }

    #[test]
    fn test_apply_empty_column_schema() {
        let mut playlist = playlist();
        let err = playlist.apply_column_changes(&[]).unwrap_err();
        assert_eq!(err.kind, EditorErrorKind::Validation);
        assert_eq!(playlist.columns().len(), 5);
    }

    #[test]
    fn test_filter() {
        let playlist = playlist();
        assert_eq!(playlist.filter("ChannelName", "cctv"), vec![0, 1]);
        assert_eq!(playlist.filter("group-title", "MOVIES"), vec![2]);
        assert_eq!(playlist.filter("group-title", ""), vec![0, 1, 2]);
        assert!(playlist.filter("unknown", "x").is_empty());
    }

    #[test]
    fn test_filter_regex() {
        let playlist = playlist();
        assert_eq!(playlist.filter_regex("ChannelName", "^cctv-\\d$").unwrap(), vec![0, 1]);
        assert_eq!(playlist.filter_regex("group-title", "").unwrap(), vec![0, 1, 2]);
        assert!(playlist.filter_regex("ChannelName", "(").is_err());
    }

    #[test]
    fn test_group_titles() {
        assert_eq!(playlist().group_titles(), vec!["News".to_string(), "Movies".to_string()]);
    }

    #[test]
    fn test_apply_candidates() {
        let mut playlist = playlist();
        let data = Playlist::from_entries(vec![
            PlaylistEntry::new("CCTV-1 HD", "http://backup.example/cctv1"),
            PlaylistEntry::new("cctv-1 4K", "http://backup.example/cctv1-4k"),
            PlaylistEntry::new("CCTV-1", "http://tv.example/cctv1.m3u8"),
            PlaylistEntry::new("CCTV-1 HD", "http://backup.example/cctv1"),
            PlaylistEntry::new("CCTV-1", ""),
        ]);
        assert_eq!(playlist.apply_candidates(&data), 1);
        let first = playlist.entry(0).unwrap();
        assert_eq!(first.url_candidates, vec!["http://backup.example/cctv1", "http://backup.example/cctv1-4k"]);
        assert!(playlist.entry(2).unwrap().url_candidates.is_empty());

        playlist.use_candidate(0, 1).unwrap();
        let first = playlist.entry(0).unwrap();
        assert_eq!(first.url, "http://backup.example/cctv1-4k");
        assert_eq!(first.url_candidates, vec!["http://backup.example/cctv1", "http://tv.example/cctv1.m3u8"]);
        assert!(playlist.use_candidate(2, 0).is_err());
    }

    #[test]
    fn test_invalid_urls() {
        let mut playlist = playlist();
        playlist.insert_new_after(None);
        assert_eq!(playlist.invalid_urls(), vec![3]);
    }

    #[test]
    fn test_to_m3u() {
        let playlist = playlist();
        let content = playlist.to_m3u();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "#EXTM3U");
        assert_eq!(lines[1], "#EXTINF:-1 tvg-id=\"cctv-1\" group-title=\"News\",CCTV-1");
        assert_eq!(lines[2], "http://tv.example/cctv1.m3u8");
        assert_eq!(lines[5], "#EXTINF:-1 tvg-id=\"hbo\" group-title=\"Movies\",HBO");
    }

    #[test]
    fn test_to_txt() {
        let mut playlist = playlist();
        playlist.entry_mut(2).unwrap().name = "HBO, East".to_string();
        let content = playlist.to_txt();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "ChannelName,StreamUrl");
        assert_eq!(lines[3], "HBO  East,http://tv.example/hbo.ts");
    }

    #[test]
    fn test_to_json() {
        let playlist = playlist();
        let value = playlist.to_json_value();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        let keys: Vec<&String> = rows[0].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["ChannelName", "StreamUrl", "Duration", "tvg-id", "group-title"]);
        assert_eq!(rows[1]["group-title"], "news ");
        assert!(playlist.to_json().unwrap().contains("\"ChannelName\": \"HBO\""));
    }
}
