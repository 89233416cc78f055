//! Path utilities

use std::path::{Component, Path, PathBuf};

/// Convert absolute path to relative path from base
pub fn path_relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// Render a relative path with `/` separators on every platform. Empty renders as `.`.
pub fn path_to_slash_string(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::ParentDir => Some("..".to_string()),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
        })
        .collect();
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

/// Task path for a walked entry: relative to `root`, slash separated.
pub fn task_rel_path(path: &Path, root: &Path) -> String {
    let rel = path_relative_to(path, root).unwrap_or_else(|| path.to_path_buf());
    path_to_slash_string(&rel)
}
