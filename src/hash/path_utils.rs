// Path helpers for report output
// Report paths always use '/' whatever the host separator is

use std::path::{Component, Path, PathBuf};

/// Join the components of `path` with '/'
///
/// "." components are dropped. Non-UTF-8 names are rendered lossily.
pub fn to_slash_path(path: &Path) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut absolute = false;

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => parts.push(prefix.as_os_str().to_string_lossy().into_owned()),
            Component::RootDir => absolute = true,
            Component::CurDir => continue,
            Component::ParentDir => parts.push("..".to_string()),
            Component::Normal(name) => parts.push(name.to_string_lossy().into_owned()),
        }
    }

    let joined = parts.join("/");
    if absolute && !matches!(path.components().next(), Some(Component::Prefix(_))) {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// Path of `path` relative to `root`, '/'-separated
///
/// Falls back to the full path when `path` is not under `root`.
pub fn relative_report_path(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(relative) => to_slash_path(relative),
        Err(_) => to_slash_path(path),
    }
}

/// Resolve `path` against the current directory without touching the filesystem
pub fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}
