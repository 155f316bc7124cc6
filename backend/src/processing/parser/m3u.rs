use shared::model::{is_valid_attribute_key, Playlist, PlaylistEntry};
use shared::utils::{is_blank, unescape_attribute_value, ATTR_GROUP_TITLE, ATTR_TVG_NAME, M3U_EXTINF};
use crate::utils::debug_if_enabled;
use std::iter::Peekable;
use std::str::Chars;

const M3U_EXTGRP: &str = "#EXTGRP";
const UTF8_BOM: char = '\u{feff}';

fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len()).is_some_and(|start| start.eq_ignore_ascii_case(prefix))
}

#[inline]
fn skip_whitespace(it: &mut Peekable<Chars>) {
    while it.next_if(|c| c.is_whitespace()).is_some() {}
}

fn token_till(it: &mut Peekable<Chars>, stop: impl Fn(char) -> bool) -> String {
    let mut token = String::with_capacity(32);
    while let Some(c) = it.next_if(|c| !stop(*c)) {
        token.push(c);
    }
    token
}

// `rest` starts right after a `\"`, the quote closes the value when the line ends,
// the name follows or another attribute starts
fn closes_value(mut rest: Peekable<Chars>) -> bool {
    let spaced = rest.peek().is_some_and(|c| c.is_whitespace());
    skip_whitespace(&mut rest);
    match rest.peek() {
        None => true,
        Some(',') => !rest.any(|c| c == '"'),
        Some(_) if spaced => {
            let key = token_till(&mut rest, |c| c == '=' || c == ',' || c == '"' || c.is_whitespace());
            is_valid_attribute_key(&key) && rest.next_if_eq(&'=').is_some()
        }
        Some(_) => false,
    }
}

// the opening quote is already consumed
fn quoted_value(it: &mut Peekable<Chars>) -> String {
    let mut raw = String::with_capacity(64);
    while let Some(c) = it.next() {
        match c {
            '"' => break,
            '\\' => {
                raw.push(c);
                if let Some(escaped) = it.next_if_eq(&'\\') {
                    raw.push(escaped);
                } else if it.peek() == Some(&'"') {
                    let mut rest = it.clone();
                    rest.next();
                    // a trailing backslash, e.g. a windows directory
                    if !closes_value(rest) {
                        raw.push('"');
                        it.next();
                    }
                }
            }
            _ => raw.push(c),
        }
    }
    unescape_attribute_value(&raw).into_owned()
}

fn process_header(line: &str) -> PlaylistEntry {
    let mut entry = PlaylistEntry::default();
    let content = &line[M3U_EXTINF.len()..];
    let content = content.strip_prefix(':').unwrap_or(content);
    let mut it = content.chars().peekable();

    skip_whitespace(&mut it);
    entry.duration = token_till(&mut it, |c| c.is_whitespace() || c == ',');

    loop {
        skip_whitespace(&mut it);
        match it.peek() {
            None => break,
            Some(',') => {
                it.next();
                entry.name = it.collect::<String>().trim().to_string();
                break;
            }
            Some(_) => {
                let key = token_till(&mut it, |c| c == '=' || c == ',' || c.is_whitespace());
                skip_whitespace(&mut it);
                if it.next_if_eq(&'=').is_none() {
                    // a key without value
                    continue;
                }
                skip_whitespace(&mut it);
                let value = if it.next_if_eq(&'"').is_some() {
                    quoted_value(&mut it)
                } else {
                    token_till(&mut it, |c| c.is_whitespace() || c == ',')
                };
                if is_valid_attribute_key(&key) {
                    entry.set_attribute(&key, &value);
                } else {
                    debug_if_enabled!("Skipping invalid attribute {} in {}", key, line);
                }
            }
        }
    }
    entry
}

/// Splits a url line, `http://host/stream name` carries a fallback channel name.
fn process_url_line(line: &str) -> (&str, &str) {
    match line.split_once([' ', '\t']) {
        Some((url, tail)) => (url, tail.trim()),
        None => (line, ""),
    }
}

fn finish_entry(mut entry: PlaylistEntry, group: Option<String>) -> PlaylistEntry {
    if is_blank(&entry.name) {
        if let Some(tvg_name) = entry.get_attribute(ATTR_TVG_NAME).filter(|n| !is_blank(n)) {
            entry.name = tvg_name.trim().to_string();
        }
    }
    if let Some(group_title) = group {
        if is_blank(entry.group_title()) {
            entry.set_attribute(ATTR_GROUP_TITLE, &group_title);
        }
    }
    entry
}

/// Visits every `#EXTINF` block in source order. A block without url line is visited with an
/// empty url, url lines without `#EXTINF` and other directives are skipped.
pub fn consume_m3u<'a, I, F>(lines: I, mut visit: F)
where
    I: Iterator<Item=&'a str>,
    F: FnMut(PlaylistEntry),
{
    let mut header: Option<PlaylistEntry> = None;
    let mut group: Option<String> = None;

    for raw_line in lines {
        let line = raw_line.trim_start_matches(UTF8_BOM).trim();
        if line.is_empty() {
            continue;
        }
        if starts_with_ignore_case(line, M3U_EXTINF) {
            if let Some(pending) = header.take() {
                visit(finish_entry(pending, group.take()));
            }
            header = Some(process_header(line));
            continue;
        }
        if starts_with_ignore_case(line, M3U_EXTGRP) {
            let value = line[M3U_EXTGRP.len()..].trim_start_matches(':').trim();
            if !value.is_empty() {
                group = Some(value.to_string());
            }
            continue;
        }
        if line.starts_with('#') {
            continue;
        }
        match header.take() {
            Some(mut entry) => {
                let (url, tail_name) = process_url_line(line);
                entry.url = url.to_string();
                if is_blank(&entry.name) && !tail_name.is_empty() {
                    entry.name = tail_name.to_string();
                }
                visit(finish_entry(entry, group.take()));
            }
            None => debug_if_enabled!("Skipping url without #EXTINF: {}", line),
        }
    }

    if let Some(pending) = header {
        visit(finish_entry(pending, group));
    }
}

pub fn parse_m3u(content: &str) -> Playlist {
    let mut playlist = Playlist::new();
    consume_m3u(content.lines(), |entry| {
        playlist.push_entry(entry);
    });
    playlist
}
