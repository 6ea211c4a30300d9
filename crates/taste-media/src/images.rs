//! Image file persistence.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;
use uuid::Uuid;

/// Errors produced by the image store.
#[derive(Error, Debug)]
pub enum MediaError {
    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Reading the source or writing the destination failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MediaError>;

/// Copies user-picked images into app-owned storage.
///
/// Saved files are named `dish_<uuid>.jpg` so references stay stable for as
/// long as the record pointing at them lives.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Open the default image directory inside the platform data dir,
    /// creating it if needed.
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("com", "tastejournal", "taste-journal").ok_or(MediaError::NoDataDir)?;
        Self::open_at(&project_dirs.data_dir().join("images"))
    }

    /// Open an image directory at an explicit path, creating it if needed.
    ///
    /// This is useful for tests and for embedding the store inside custom
    /// directory layouts.
    pub fn open_at(root: &Path) -> Result<Self> {
        std::fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Directory the copies live in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Copy `source` into app-owned storage and return the stable path string
    /// to record alongside the dish.
    ///
    /// The source is opened before the destination is created, and a copy
    /// that fails midway removes the partial destination, so an unreadable
    /// source never leaves an empty file behind.
    pub fn save_image(&self, source: &Path) -> Result<String> {
        let mut input = File::open(source)?;

        let file_name = format!("dish_{}.jpg", Uuid::new_v4());
        let dest = self.root.join(file_name);

        let mut output = File::create(&dest)?;
        if let Err(e) = io::copy(&mut input, &mut output) {
            drop(output);
            let _ = std::fs::remove_file(&dest);
            return Err(e.into());
        }

        tracing::debug!(source = %source.display(), dest = %dest.display(), "image saved");

        Ok(dest.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_copies_bytes_under_a_fresh_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::open_at(&dir.path().join("images")).unwrap();

        let source = dir.path().join("picked.jpg");
        std::fs::write(&source, b"jpeg bytes").unwrap();

        let saved = store.save_image(&source).unwrap();
        let saved_path = PathBuf::from(&saved);
        assert!(saved_path.starts_with(store.root()));
        assert_eq!(std::fs::read(&saved_path).unwrap(), b"jpeg bytes");

        let name = saved_path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("dish_") && name.ends_with(".jpg"));
    }

    #[test]
    fn saves_of_the_same_source_get_distinct_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::open_at(&dir.path().join("images")).unwrap();

        let source = dir.path().join("picked.jpg");
        std::fs::write(&source, b"x").unwrap();

        let a = store.save_image(&source).unwrap();
        let b = store.save_image(&source).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn unreadable_source_leaves_no_destination_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::open_at(&dir.path().join("images")).unwrap();

        let missing = dir.path().join("nope.jpg");
        assert!(matches!(
            store.save_image(&missing),
            Err(MediaError::Io(_))
        ));

        let leftovers: Vec<_> = std::fs::read_dir(store.root()).unwrap().collect();
        assert!(leftovers.is_empty());
    }
}
