//! Line-oriented storage backends addressed by logical path.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use crate::StorageError;

/// Medium that stores line streams under logical paths.
///
/// Logical paths use `/` separators regardless of platform. Reading a path
/// that was never written yields `Ok(None)`.
pub trait LineStorage {
    /// Reads every line stored under `path`.
    fn read_lines(&self, path: &str) -> Result<Option<Vec<String>>, StorageError>;

    /// Replaces the content stored under `path`.
    fn write_lines(&mut self, path: &str, lines: &[String]) -> Result<(), StorageError>;
}

/// Stores each logical path as a text file beneath a root directory.
#[derive(Clone, Debug)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Creates a backend rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory logical paths are resolved against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem location of a logical path.
    #[must_use]
    pub fn resolve(&self, path: &str) -> PathBuf {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |resolved, segment| resolved.join(segment))
    }
}

impl LineStorage for FsStorage {
    fn read_lines(&self, path: &str) -> Result<Option<Vec<String>>, StorageError> {
        let file = self.resolve(path);
        match fs::read_to_string(&file) {
            Ok(contents) => Ok(Some(contents.lines().map(str::to_owned).collect())),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path: file, source }),
        }
    }

    fn write_lines(&mut self, path: &str, lines: &[String]) -> Result<(), StorageError> {
        let file = self.resolve(path);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut contents = lines.join("\n");
        contents.push('\n');
        fs::write(&file, contents).map_err(|source| StorageError::Io { path: file, source })
    }
}

/// Keeps line streams in memory; used by tests and share-code round trips.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    files: BTreeMap<String, Vec<String>>,
}

impl MemoryStorage {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Logical paths currently stored.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }
}

impl LineStorage for MemoryStorage {
    fn read_lines(&self, path: &str) -> Result<Option<Vec<String>>, StorageError> {
        Ok(self.files.get(path).cloned())
    }

    fn write_lines(&mut self, path: &str, lines: &[String]) -> Result<(), StorageError> {
        let _ = self.files.insert(path.to_owned(), lines.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_reports_missing_paths() {
        let mut storage = MemoryStorage::new();
        assert!(matches!(storage.read_lines("stages/a.stage"), Ok(None)));

        storage
            .write_lines("stages/a.stage", &["1".to_owned()])
            .expect("write");
        let lines = storage.read_lines("stages/a.stage").expect("read");
        assert_eq!(lines, Some(vec!["1".to_owned()]));
        assert_eq!(storage.paths().collect::<Vec<_>>(), vec!["stages/a.stage"]);
    }

    #[test]
    fn fs_storage_resolves_logical_segments() {
        let storage = FsStorage::new("/data");
        assert_eq!(
            storage.resolve("packs//default/stage.txt"),
            PathBuf::from("/data/packs/default/stage.txt")
        );
    }
}
