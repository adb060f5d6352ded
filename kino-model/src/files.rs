use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// A media file reference derived purely from its path.
///
/// Identity is the full path, compared case-insensitively; there is no
/// independent identity beyond it.
#[derive(Debug, Clone)]
pub struct FileItem {
    full_path: PathBuf,
    directory: PathBuf,
    name: String,
}

impl FileItem {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let full_path = path.into();
        let directory = full_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let name = full_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            full_path,
            directory,
            name,
        }
    }

    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// File name without its extension.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches_path(&self, path: &Path) -> bool {
        fold_path(&self.full_path) == fold_path(path)
    }
}

fn fold_path(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

impl PartialEq for FileItem {
    fn eq(&self, other: &Self) -> bool {
        self.matches_path(&other.full_path)
    }
}

impl Eq for FileItem {}

impl Hash for FileItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        fold_path(&self.full_path).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_directory_and_stem() {
        let item = FileItem::new("/media/shows/pilot.mkv");
        assert_eq!(item.directory(), Path::new("/media/shows"));
        assert_eq!(item.name(), "pilot");
    }

    #[test]
    fn equality_ignores_case() {
        let a = FileItem::new("/Media/Movie.MKV");
        let b = FileItem::new("/media/movie.mkv");
        assert_eq!(a, b);
    }

    #[test]
    fn different_paths_are_unequal() {
        let a = FileItem::new("/media/one.mkv");
        let b = FileItem::new("/media/two.mkv");
        assert_ne!(a, b);
    }
}
