use std::path::{Component, Path, PathBuf};

/// Make a user-supplied filename absolute.
///
/// During a package-manager install hook the working directory is the
/// installed package folder (`<project>/node_modules/cypress`), while the user
/// wrote the path relative to the project root, two levels up.
pub fn form_absolute_path(filename: &Path, cwd: &Path) -> PathBuf {
    if filename.is_absolute() {
        return filename.to_path_buf();
    }
    normalize_lexically(&cwd.join("..").join("..").join(filename))
}

/// Collapse `.` and `..` without touching the filesystem.
///
/// `..` at the root stays at the root; leading `..` of a relative path is kept.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

// Helper function for cross-platform path comparison
pub fn normalize_path_separator(s: &str) -> String {
    s.replace('\\', "/")
}
