use log::error;
use path_clean::PathClean;
use shared::error::{EditorError, EditorErrorKind};
use shared::create_editor_error;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const IO_BUFFER_SIZE: usize = 256 * 1024; // 256kb

pub fn file_writer<W>(w: W) -> std::io::BufWriter<W>
where
    W: std::io::Write,
{
    std::io::BufWriter::with_capacity(IO_BUFFER_SIZE, w)
}

pub fn file_reader<R>(r: R) -> std::io::BufReader<R>
where
    R: std::io::Read,
{
    std::io::BufReader::with_capacity(IO_BUFFER_SIZE, r)
}

pub fn get_exe_path() -> PathBuf {
    let default_path = std::path::PathBuf::from("./");
    let current_exe = std::env::current_exe();
    match current_exe {
        Ok(exe) => {
            match fs::read_link(&exe) {
                Ok(f) => f.parent().map_or(default_path, std::path::Path::to_path_buf),
                Err(_) => exe.parent().map_or(default_path, std::path::Path::to_path_buf)
            }
        }
        Err(_) => default_path
    }
}

/// Relative paths are resolved against the working directory.
pub fn resolve_file_path(path: &str) -> PathBuf {
    let path = PathBuf::from(path.trim());
    if path.is_relative() {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(&path).clean(),
            Err(err) => {
                error!("Can't determine working directory: {err}");
                path.clean()
            }
        }
    } else {
        path.clean()
    }
}

pub fn path_exists(file_path: &Path) -> bool {
    if let Ok(metadata) = fs::metadata(file_path) {
        return metadata.is_file();
    }
    false
}

/// Writes to a temp file next to `path` and renames it over the target,
/// a failed write leaves an existing file untouched.
pub fn write_file_atomic(path: &Path, content: &[u8]) -> Result<(), EditorError> {
    let cant_write = |err: &dyn std::fmt::Display| create_editor_error!(EditorErrorKind::Io, "Can't write file {} - {err}", path.display());
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|err| cant_write(&err))?;
    let tempfile = NamedTempFile::new_in(&dir).map_err(|err| cant_write(&err))?;
    {
        let mut writer = file_writer(tempfile.as_file());
        writer.write_all(content).map_err(|err| cant_write(&err))?;
        writer.flush().map_err(|err| cant_write(&err))?;
    }
    // the temp file is created owner-only, a replaced file keeps its mode
    if let Ok(metadata) = fs::metadata(path) {
        tempfile.as_file().set_permissions(metadata.permissions()).map_err(|err| cant_write(&err))?;
    }
    tempfile.persist(path).map_err(|err| cant_write(&err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{path_exists, resolve_file_path, write_file_atomic};

    #[test]
    fn test_write_file_atomic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("list.m3u");
        write_file_atomic(&path, b"#EXTM3U\n").unwrap();
        assert!(path_exists(&path));
        write_file_atomic(&path, b"#EXTM3U\nsecond\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "#EXTM3U\nsecond\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_file_atomic_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.m3u");
        std::fs::write(&path, "#EXTM3U\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        write_file_atomic(&path, b"#EXTM3U\nsecond\n").unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[test]
    fn test_resolve_file_path() {
        let resolved = resolve_file_path("./a/../list.m3u");
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("list.m3u"));
        assert_eq!(resolve_file_path("/tmp/x/../list.m3u").to_str(), Some("/tmp/list.m3u"));
    }
}
