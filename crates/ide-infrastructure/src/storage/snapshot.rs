//! Whole-file JSON snapshots.
//!
//! A save serializes the full value into `.<name>.tmp` beside the target,
//! syncs it and renames it into place, so readers see either the previous
//! snapshot or the new one. Writers, including other processes, serialize on
//! `<stem>.lock`; [`JsonSnapshot::update`] re-reads under that lock so
//! concurrent handles only overwrite what they change.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed snapshot {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to lock {}: {source}", path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Snapshot path has no file name: {}", .0.display())]
    InvalidPath(PathBuf),
}

impl From<SnapshotError> for ide_core::IdeError {
    fn from(err: SnapshotError) -> Self {
        ide_core::IdeError::storage(err.to_string())
    }
}

fn io_error(path: &Path) -> impl FnOnce(io::Error) -> SnapshotError + '_ {
    move |source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// A JSON document on disk that is only ever replaced as a whole.
pub struct JsonSnapshot<T> {
    path: PathBuf,
    _value: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> JsonSnapshot<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _value: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the current snapshot. A missing or blank file is `None`.
    pub fn read(&self) -> Result<Option<T>, SnapshotError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&self.path)(e)),
        };
        if content.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| SnapshotError::Malformed {
                path: self.path.clone(),
                source,
            })
    }

    /// Replaces the snapshot with `value`.
    pub fn write(&self, value: &T) -> Result<(), SnapshotError> {
        let _lock = self.lock()?;
        self.replace(value)
    }

    /// Re-reads the snapshot under the write lock, applies `change` and
    /// writes the result back. Returns the value now on disk.
    ///
    /// Changes made by other handles since this one last read are kept.
    pub fn update<F>(&self, change: F) -> Result<T, SnapshotError>
    where
        T: Default,
        F: FnOnce(&mut T),
    {
        let _lock = self.lock()?;
        let mut value = self.read()?.unwrap_or_default();
        change(&mut value);
        self.replace(&value)?;
        Ok(value)
    }

    fn dir(&self) -> &Path {
        self.path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
    }

    fn lock(&self) -> Result<WriteLock, SnapshotError> {
        let dir = self.dir();
        fs::create_dir_all(dir).map_err(io_error(dir))?;
        WriteLock::acquire(self.path.with_extension("lock"))
    }

    /// Writes `value` through a staging file. The caller holds the lock.
    fn replace(&self, value: &T) -> Result<(), SnapshotError> {
        let name = self
            .path
            .file_name()
            .ok_or_else(|| SnapshotError::InvalidPath(self.path.clone()))?
            .to_string_lossy()
            .into_owned();

        let body = serde_json::to_vec_pretty(value).map_err(|source| SnapshotError::Malformed {
            path: self.path.clone(),
            source,
        })?;

        let staging = self.dir().join(format!(".{name}.tmp"));
        {
            let mut file = File::create(&staging).map_err(io_error(&staging))?;
            file.write_all(&body).map_err(io_error(&staging))?;
            file.sync_all().map_err(io_error(&staging))?;
        }
        fs::rename(&staging, &self.path).map_err(io_error(&self.path))
    }
}

/// Advisory exclusive lock, released on drop.
///
/// The lock file itself stays in place: unlinking it would let a blocked
/// waiter and a newcomer lock two different inodes at once.
struct WriteLock {
    _file: File,
}

impl WriteLock {
    fn acquire(path: PathBuf) -> Result<Self, SnapshotError> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(io_error(&path))?;

        fs2::FileExt::lock_exclusive(&file)
            .map_err(|source| SnapshotError::Lock { path, source })?;

        Ok(Self { _file: file })
    }
}
