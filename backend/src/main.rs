#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
mod modules;

include_modules!();

use crate::processing::editor::PlaylistEditor;
use crate::repository::{get_default_settings_path, load_settings, save_settings};
use crate::utils::{init_logger, resolve_file_path};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use shared::error::EditorError;
use shared::model::{AppSettings, Playlist, PlaylistEntry};
use shared::utils::{get_non_empty_str, FIELD_CHANNEL_NAME, FIELD_STREAM_URL};
use std::path::Path;

#[derive(Parser)]
#[command(name = "m3u-editor")]
#[command(version)]
#[command(about = "View and edit IPTV playlists (m3u, m3u8, txt, json)", long_about = None)]
struct Args {
    /// log level
    #[arg(short = 'l', long = "log-level", global = true, default_missing_value = "info")]
    log_level: Option<String>,

    /// The settings file, defaults to settings.json next to the executable
    #[arg(short = 's', long = "settings", global = true)]
    settings_file: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the channels of a playlist
    Show {
        file: String,
        /// Column to search in
        #[arg(short = 'c', long, default_value = FIELD_CHANNEL_NAME)]
        column: String,
        /// Only show rows whose column contains this text
        #[arg(short = 'f', long)]
        filter: Option<String>,
        /// Treat the filter as a regular expression
        #[arg(short = 'r', long, default_value_t = false)]
        regex: bool,
    },
    /// Convert a playlist, the formats follow the file extensions
    Convert { input: String, output: String },
    /// Insert a channel after a row, or at the end
    Insert {
        file: String,
        #[arg(short = 'a', long)]
        after: Option<usize>,
        #[arg(short = 'n', long)]
        name: Option<String>,
        #[arg(short = 'u', long)]
        url: Option<String>,
        #[arg(short = 'o', long)]
        output: Option<String>,
    },
    /// Change one cell of a row
    Set {
        file: String,
        index: usize,
        column: String,
        value: String,
        #[arg(short = 'o', long)]
        output: Option<String>,
    },
    /// Delete a row
    Delete {
        file: String,
        index: usize,
        #[arg(short = 'o', long)]
        output: Option<String>,
    },
    /// Move a row up or down
    Move {
        file: String,
        index: usize,
        direction: Direction,
        #[arg(short = 'o', long)]
        output: Option<String>,
    },
    /// List or edit the columns
    Columns {
        file: String,
        /// Rename a column, OLD=NEW
        #[arg(short = 'r', long)]
        rename: Vec<String>,
        /// Add an empty column after the last one
        #[arg(short = 'a', long)]
        add: Vec<String>,
        /// Remove a column
        #[arg(short = 'd', long)]
        remove: Vec<String>,
        #[arg(short = 'o', long)]
        output: Option<String>,
    },
    /// List the distinct group titles
    Groups { file: String },
    /// Find alternative stream urls in a data file
    Candidates {
        file: String,
        data: String,
        /// Replace the stream urls with the first candidate
        #[arg(long, default_value_t = false)]
        apply: bool,
        #[arg(short = 'o', long)]
        output: Option<String>,
    },
    /// List rows without a valid stream url
    Validate { file: String },
    /// Open the stream of a row in the external player
    Play {
        file: String,
        index: usize,
        /// Player executable, stored in the settings for later use
        #[arg(short = 'p', long)]
        player: Option<String>,
    },
    /// Show or change the settings
    Settings {
        #[arg(long, default_value_t = false)]
        toggle_theme: bool,
        #[arg(short = 'p', long)]
        player: Option<String>,
    },
}

#[derive(Copy, Clone, ValueEnum)]
enum Direction {
    Up,
    Down,
}

impl Direction {
    const fn offset(self) -> isize {
        match self {
            Self::Up => -1,
            Self::Down => 1,
        }
    }
}

const VERSION: &str = env!("CARGO_PKG_VERSION");
const BUILD_TIMESTAMP: Option<&str> = option_env!("VERGEN_BUILD_TIMESTAMP");

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logger(args.log_level.as_ref());

    info!("Version: {VERSION}");
    if let Some(bts) = BUILD_TIMESTAMP.and_then(|ts| ts.parse::<DateTime<Utc>>().ok()).map(|datetime| datetime.format("%Y-%m-%d %H:%M:%S %Z").to_string()) {
        info!("Build time: {bts}");
    }

    let settings_path = args.settings_file.as_deref().map_or_else(get_default_settings_path, resolve_file_path);
    info!("Settings file: {}", settings_path.display());

    if let Err(err) = run(args.command, &settings_path).await {
        exit!("{err}");
    }
}

async fn open(file: &str) -> Result<PlaylistEditor, EditorError> {
    let mut editor = PlaylistEditor::new();
    editor.load_playlist_from_path(&resolve_file_path(file)).await?;
    Ok(editor)
}

async fn store(editor: &mut PlaylistEditor, output: Option<&String>) -> Result<(), EditorError> {
    let target = output.map(|o| resolve_file_path(o));
    editor.save(target.as_deref()).await?;
    println!("{}", editor.status());
    Ok(())
}

fn print_entry(index: usize, entry: &PlaylistEntry) {
    println!("{index:>5}  {}  {}", entry.name, entry.url);
    for candidate in &entry.url_candidates {
        println!("       -> {candidate}");
    }
}

fn print_columns(playlist: &Playlist) {
    for (index, column) in playlist.column_schema().iter().enumerate() {
        let marker = if column.reserved { " (reserved)" } else { "" };
        println!("{index:>3}  {}{marker}", column.name);
    }
}

fn print_settings(settings: &AppSettings, path: &Path) {
    println!("Settings: {}", path.display());
    println!("Theme:    {}", settings.theme_mode);
    println!("Player:   {}", get_non_empty_str(settings.player_path().unwrap_or_default(), "-"));
}

async fn run(command: Command, settings_path: &Path) -> Result<(), EditorError> {
    match command {
        Command::Show { file, column, filter, regex } => {
            let mut editor = open(&file).await?;
            let filter = filter.as_deref().unwrap_or_default();
            let rows = if regex { editor.search_regex(&column, filter)? } else { editor.search(&column, filter) };
            if let Some(playlist) = editor.playlist() {
                for index in rows {
                    if let Some(entry) = playlist.entry(index) {
                        print_entry(index, entry);
                    }
                }
            }
            println!("{}", editor.status());
        }
        Command::Convert { input, output } => {
            let mut editor = open(&input).await?;
            store(&mut editor, Some(&output)).await?;
        }
        Command::Insert { file, after, name, url, output } => {
            let mut editor = open(&file).await?;
            let index = match after {
                Some(row) => {
                    editor.select(row)?;
                    editor.insert_after_selected()?
                }
                None => {
                    let last = editor.playlist().map_or(0, Playlist::len);
                    if last > 0 {
                        editor.select(last - 1)?;
                    }
                    editor.insert_after_selected()?
                }
            };
            if let Some(name) = name {
                editor.set_selected_field(FIELD_CHANNEL_NAME, &name)?;
            }
            if let Some(url) = url {
                editor.set_selected_field(FIELD_STREAM_URL, &url)?;
            }
            println!("Inserted row {index}");
            store(&mut editor, output.as_ref()).await?;
        }
        Command::Set { file, index, column, value, output } => {
            let mut editor = open(&file).await?;
            editor.select(index)?;
            editor.set_selected_field(&column, &value)?;
            println!("{}", editor.status());
            store(&mut editor, output.as_ref()).await?;
        }
        Command::Delete { file, index, output } => {
            let mut editor = open(&file).await?;
            editor.select(index)?;
            editor.delete_selected()?;
            println!("{}", editor.status());
            store(&mut editor, output.as_ref()).await?;
        }
        Command::Move { file, index, direction, output } => {
            let mut editor = open(&file).await?;
            editor.select(index)?;
            editor.move_selected(direction.offset())?;
            println!("{}", editor.status());
            store(&mut editor, output.as_ref()).await?;
        }
        Command::Columns { file, rename, add, remove, output } => {
            let mut editor = open(&file).await?;
            if rename.is_empty() && add.is_empty() && remove.is_empty() {
                if let Some(playlist) = editor.playlist() {
                    print_columns(playlist);
                }
                return Ok(());
            }
            editor.edit_columns(|columns| {
                for pair in &rename {
                    let Some((old, new)) = pair.split_once('=') else {
                        return shared::validation_err_res!("Invalid rename {pair}, expected OLD=NEW");
                    };
                    let index = columns.select_by_name(old)?;
                    columns.rename(index, new)?;
                }
                for name in &remove {
                    columns.select_by_name(name)?;
                    columns.remove_selected()?;
                }
                for name in &add {
                    let last = columns.columns().len().saturating_sub(1);
                    columns.select(last)?;
                    columns.add_named_column(name)?;
                }
                Ok(())
            })?;
            if let Some(playlist) = editor.playlist() {
                print_columns(playlist);
            }
            store(&mut editor, output.as_ref()).await?;
        }
        Command::Groups { file } => {
            let editor = open(&file).await?;
            for group in editor.group_titles() {
                println!("{group}");
            }
        }
        Command::Candidates { file, data, apply, output } => {
            let mut editor = open(&file).await?;
            let matched = editor.load_data_file(&resolve_file_path(&data)).await?;
            let rows: Vec<usize> = editor.playlist()
                .map(|playlist| playlist.entries().iter().enumerate()
                    .filter(|(_, entry)| !entry.url_candidates.is_empty())
                    .map(|(index, _)| index)
                    .collect())
                .unwrap_or_default();
            if apply {
                for index in rows {
                    editor.select(index)?;
                    editor.use_candidate(0)?;
                }
                store(&mut editor, output.as_ref()).await?;
            } else if let Some(playlist) = editor.playlist() {
                for index in rows {
                    if let Some(entry) = playlist.entry(index) {
                        print_entry(index, entry);
                    }
                }
            }
            println!("{matched} channels with candidates");
        }
        Command::Validate { file } => {
            let editor = open(&file).await?;
            if let Some(playlist) = editor.playlist() {
                let invalid = playlist.invalid_urls();
                for index in &invalid {
                    if let Some(entry) = playlist.entry(*index) {
                        print_entry(*index, entry);
                    }
                }
                println!("{} of {} channels without a valid stream url", invalid.len(), playlist.len());
            }
        }
        Command::Play { file, index, player } => {
            let mut settings = load_settings(settings_path);
            let mut editor = open(&file).await?;
            editor.select(index)?;
            editor.play(&settings, player.as_deref())?;
            if let Some(player) = player {
                settings.player_path = Some(player);
                save_settings(settings_path, &settings)?;
            }
            println!("{}", editor.status());
        }
        Command::Settings { toggle_theme, player } => {
            let mut settings = load_settings(settings_path);
            let mut changed = false;
            if toggle_theme {
                settings.toggle_theme();
                changed = true;
            }
            if let Some(player) = player {
                let player = player.trim();
                settings.player_path = if player.is_empty() { None } else { Some(player.to_string()) };
                changed = true;
            }
            if changed {
                save_settings(settings_path, &settings)?;
            }
            print_settings(&settings, settings_path);
        }
    }
    Ok(())
}
