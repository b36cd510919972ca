//! UTF-8 file helpers for the SafePath tools, built on `cap-std` and `camino`.
//!
//! Every operation opens the containing directory with ambient authority and
//! then works relative to that capability.
#![forbid(unsafe_code)]

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io;
use std::path::Component;

/// Open the parent directory of `path` and return it with the file name.
pub fn open_dir_and_file(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Whether `path` exists and is a regular file.
///
/// A missing file or parent directory yields `Ok(false)`.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = match open_dir_and_file(path) {
        Ok(found) => found,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(err) => return Err(err),
    };
    match dir.metadata(name.as_str()) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Read a whole UTF-8 text file.
pub fn read_utf8(path: &Utf8Path) -> io::Result<String> {
    let (dir, name) = open_dir_and_file(path)?;
    dir.read_to_string(name.as_str())
}

/// Write `contents` to `path`, creating missing parent directories.
pub fn write_utf8(path: &Utf8Path, contents: &str) -> io::Result<()> {
    ensure_parent_dir(path)?;
    let (dir, name) = open_dir_and_file(path)?;
    dir.write(name.as_str(), contents)
}

/// Create the parent directory of `path` and its ancestors if needed.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() {
        return Ok(());
    }
    let (root, relative) = split_root(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    root.create_dir_all(&relative)
}

/// Split `path` into an opened root directory and the path beneath it.
///
/// Absolute paths are anchored at their root (or Windows prefix); relative
/// paths at the current directory.
fn split_root(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let std_path = path.as_std_path();
    let root = match std_path.components().next() {
        Some(Component::Prefix(prefix)) => {
            let prefix = prefix
                .as_os_str()
                .to_str()
                .ok_or_else(|| io::Error::other("non-UTF-8 path prefix"))?;
            Utf8PathBuf::from(format!("{prefix}{}", std::path::MAIN_SEPARATOR))
        }
        Some(Component::RootDir) => Utf8PathBuf::from(std::path::MAIN_SEPARATOR.to_string()),
        _ => Utf8PathBuf::from("."),
    };
    let relative = if root.as_str() == "." {
        path.to_path_buf()
    } else {
        path.strip_prefix(&root)
            .map_err(|_| io::Error::other(format!("cannot strip {root} from {path}")))?
            .to_path_buf()
    };
    let dir = fs_utf8::Dir::open_ambient_dir(&root, ambient_authority())?;
    Ok((dir, relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path")
    }

    #[rstest]
    fn write_creates_parents_and_reads_back(temp_dir: TempDir) {
        let path = utf8(&temp_dir).join("nested/deeper/out.json");

        write_utf8(&path, "{\"ok\":true}").expect("write file");

        assert!(file_is_file(&path).expect("stat file"));
        assert_eq!(read_utf8(&path).expect("read file"), "{\"ok\":true}");
    }

    #[rstest]
    fn missing_file_is_not_a_file(temp_dir: TempDir) {
        let path = utf8(&temp_dir).join("absent/contacts.json");
        assert!(!file_is_file(&path).expect("stat file"));
    }

    #[rstest]
    fn directory_is_not_a_file(temp_dir: TempDir) {
        let path = utf8(&temp_dir);
        std::fs::create_dir_all(path.join("sub")).expect("create dir");
        assert!(!file_is_file(&path.join("sub")).expect("stat dir"));
    }

    #[rstest]
    fn read_missing_file_fails(temp_dir: TempDir) {
        let err = read_utf8(&utf8(&temp_dir).join("nope.json")).expect_err("missing");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
