use std::path::{Path, PathBuf};

/// Collects every file below `folder_path` with the given extension, sorted.
pub fn read_folder(folder_path: &Path, extension: &str) -> Result<Vec<PathBuf>, std::io::Error> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(folder_path)? {
        let path = entry?.path();
        if path.is_dir() {
            files.extend(read_folder(&path, extension)?);
        } else if path.is_file() && has_extension(&path, extension) {
            files.push(path);
        }
    }

    files.sort();

    Ok(files)
}

pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|value| value.to_str())
        .is_some_and(|value| value.eq_ignore_ascii_case(extension))
}
