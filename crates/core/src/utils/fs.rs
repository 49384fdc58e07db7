//! Filesystem and path helpers

use std::io;
use std::path::{Component, Path, PathBuf};

/// Reports whether `path` exists and is a regular file (symlinks are followed).
pub fn regular_file_exists(path: &Path) -> io::Result<bool> {
    match std::fs::metadata(path) {
        Ok(meta) => Ok(meta.is_file()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Reports whether `path` exists as any kind of filesystem node.
pub fn node_exists(path: &Path) -> io::Result<bool> {
    match std::fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Lexically resolve `.` and `..` components without touching the filesystem.
///
/// Leading `..` components of relative paths are kept.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Reports whether `path` lies inside `parent` after lexical normalization.
///
/// Relative paths are resolved against `parent`. A path equal to `parent`
/// counts as inside it.
pub fn is_sub_dir(parent: &Path, path: &Path) -> bool {
    let parent = normalize_path(parent);
    let candidate = if path.is_absolute() {
        normalize_path(path)
    } else {
        normalize_path(&parent.join(path))
    };
    candidate.starts_with(&parent)
}

/// Join slash-separated import path elements and clean the result.
pub fn clean_import_path(base: &str, rel: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in base.split('/').chain(rel.split('/')) {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}
