use crate::error::{EditorError, EditorErrorKind};
use crate::model::is_valid_attribute_key;
use crate::utils::{is_reserved_column, NEW_COLUMN_NAME};
use crate::{create_editor_error_result, validation_err_res};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One column as seen by the column editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchemaEntry {
    /// Displayed name, written back as the column name.
    pub name: String,
    /// Reserved columns can be moved but not renamed or removed.
    pub reserved: bool,
    /// Name of the existing column this entry stands for, `None` for added columns.
    pub original_name: Option<String>,
}

impl ColumnSchemaEntry {
    pub fn new(name: &str, reserved: bool, original_name: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            reserved,
            original_name: original_name.map(ToString::to_string),
        }
    }

    pub fn existing(name: &str) -> Self {
        Self::new(name, is_reserved_column(name), Some(name))
    }

    pub fn added(name: &str) -> Self {
        Self::new(name, false, None)
    }

    pub const fn can_remove(&self) -> bool {
        !self.reserved
    }

    fn is_reserved(&self) -> bool {
        self.reserved || self.original_name.as_deref().is_some_and(is_reserved_column)
    }
}

fn lowercase_set<'a>(names: impl Iterator<Item=&'a str>) -> HashSet<String> {
    names.map(str::to_lowercase).collect()
}

pub fn validate_schema(columns: &[ColumnSchemaEntry]) -> Result<(), EditorError> {
    if columns.is_empty() {
        return validation_err_res!("The column list can't be empty");
    }
    let mut seen = HashSet::new();
    for column in columns {
        let name = column.name.trim();
        if name.is_empty() {
            return validation_err_res!("Column names can't be empty");
        }
        if column.is_reserved() {
            if column.original_name.as_deref() != Some(name) {
                return validation_err_res!("Column {} is reserved and can't be renamed", column.original_name.as_deref().unwrap_or(name));
            }
        } else {
            if is_reserved_column(name) {
                return validation_err_res!("Column name {name} is reserved");
            }
            let changed = column.original_name.as_deref() != Some(name);
            if changed && !is_valid_attribute_key(name) {
                return validation_err_res!("Column name {name} may only contain letters, digits, '-' and '_'");
            }
        }
        if !seen.insert(name.to_lowercase()) {
            return validation_err_res!("Duplicate column name {name}");
        }
    }
    Ok(())
}

/// Working copy of a playlist's columns, edited before being applied with
/// [`crate::model::Playlist::apply_column_changes`].
#[derive(Debug, Clone)]
pub struct ColumnEditor {
    columns: Vec<ColumnSchemaEntry>,
    selected: Option<usize>,
}

impl ColumnEditor {
    pub fn new(columns: Vec<ColumnSchemaEntry>) -> Self {
        let selected = if columns.is_empty() { None } else { Some(0) };
        Self { columns, selected }
    }

    pub fn columns(&self) -> &[ColumnSchemaEntry] {
        &self.columns
    }

    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_column(&self) -> Option<&ColumnSchemaEntry> {
        self.selected.and_then(|idx| self.columns.get(idx))
    }

    pub fn select(&mut self, index: usize) -> Result<(), EditorError> {
        if index >= self.columns.len() {
            return validation_err_res!("Column index {index} out of range");
        }
        self.selected = Some(index);
        Ok(())
    }

    pub fn select_by_name(&mut self, name: &str) -> Result<usize, EditorError> {
        let name = name.trim();
        match self.columns.iter().position(|c| c.name.trim().eq_ignore_ascii_case(name)) {
            Some(index) => {
                self.selected = Some(index);
                Ok(index)
            }
            None => validation_err_res!("Column {name} not found"),
        }
    }

    fn unique_column_name(&self) -> String {
        let existing = lowercase_set(self.columns.iter().map(|c| c.name.as_str()));
        let mut candidate = NEW_COLUMN_NAME.to_string();
        let mut suffix = 1;
        while existing.contains(&candidate.to_lowercase()) {
            candidate = format!("{NEW_COLUMN_NAME}{suffix}");
            suffix += 1;
        }
        candidate
    }

    fn insert_after_selected(&mut self, column: ColumnSchemaEntry) -> usize {
        let index = self.selected.map_or(self.columns.len(), |idx| (idx + 1).min(self.columns.len()));
        self.columns.insert(index, column);
        self.selected = Some(index);
        index
    }

    /// Adds a column with a generated unique name after the selection and selects it.
    pub fn add_column(&mut self) -> usize {
        let name = self.unique_column_name();
        self.insert_after_selected(ColumnSchemaEntry::added(&name))
    }

    pub fn add_named_column(&mut self, name: &str) -> Result<usize, EditorError> {
        let name = name.trim();
        if self.columns.iter().any(|c| c.name.trim().eq_ignore_ascii_case(name)) {
            return validation_err_res!("Duplicate column name {name}");
        }
        if is_reserved_column(name) {
            return validation_err_res!("Column name {name} is reserved");
        }
        if !is_valid_attribute_key(name) {
            return validation_err_res!("Column name {name} may only contain letters, digits, '-' and '_'");
        }
        Ok(self.insert_after_selected(ColumnSchemaEntry::added(name)))
    }

    pub fn can_remove(&self) -> bool {
        self.selected_column().is_some_and(ColumnSchemaEntry::can_remove)
    }

    pub fn remove_selected(&mut self) -> Result<ColumnSchemaEntry, EditorError> {
        let Some(index) = self.selected.filter(|idx| *idx < self.columns.len()) else {
            return validation_err_res!("No column selected");
        };
        if self.columns[index].reserved {
            return create_editor_error_result!(EditorErrorKind::Validation, "Column {} is reserved and can't be removed", self.columns[index].name);
        }
        let removed = self.columns.remove(index);
        self.selected = if self.columns.is_empty() { None } else { Some(index.min(self.columns.len() - 1)) };
        Ok(removed)
    }

    pub fn rename(&mut self, index: usize, name: &str) -> Result<(), EditorError> {
        let Some(column) = self.columns.get_mut(index) else {
            return validation_err_res!("Column index {index} out of range");
        };
        let name = name.trim();
        if column.reserved {
            if column.name == name {
                return Ok(());
            }
            return validation_err_res!("Column {} is reserved and can't be renamed", column.name);
        }
        if name.is_empty() {
            return validation_err_res!("Column names can't be empty");
        }
        column.name = name.to_string();
        Ok(())
    }

    pub fn can_move(&self, offset: isize) -> bool {
        self.selected
            .and_then(|idx| idx.checked_add_signed(offset))
            .is_some_and(|target| target < self.columns.len())
    }

    pub fn move_selected(&mut self, offset: isize) -> Result<usize, EditorError> {
        let Some(index) = self.selected else {
            return validation_err_res!("No column selected");
        };
        if !self.can_move(offset) {
            return validation_err_res!("Column {} can't be moved any further", self.columns[index].name);
        }
        let target = index.saturating_add_signed(offset);
        let column = self.columns.remove(index);
        self.columns.insert(target, column);
        self.selected = Some(target);
        Ok(target)
    }

    pub fn validate(&self) -> Result<(), EditorError> {
        validate_schema(&self.columns)
    }

    /// The edited columns with trimmed names, if they pass validation.
    pub fn result(&self) -> Result<Vec<ColumnSchemaEntry>, EditorError> {
        self.validate()?;
        Ok(self.columns.iter()
            .map(|c| ColumnSchemaEntry { name: c.name.trim().to_string(), ..c.clone() })
            .collect())
    }
}
