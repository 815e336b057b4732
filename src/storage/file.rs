use super::{Error, Storage};
use parking_lot::Mutex;
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument, warn};

/// JSON object on disk holding string records. Every write replaces the file
/// atomically so a crash never leaves half a record behind.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> Error {
        Error::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, Error> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| Error::Corrupt {
                path: self.path.clone(),
                source,
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(self.io_error(err)),
        }
    }

    fn store(&self, entries: &BTreeMap<String, String>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
            }
        }

        let contents = serde_json::to_vec_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");

        fs::write(&tmp, contents).map_err(|err| self.io_error(err))?;
        restrict_permissions(&tmp).map_err(|err| self.io_error(err))?;
        fs::rename(&tmp, &self.path).map_err(|err| self.io_error(err))?;

        debug!(path = %self.path.display(), "state file written");
        Ok(())
    }
}

// The file holds a bearer credential.
#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(key))
    }

    #[instrument(skip(self, value))]
    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.store(&entries)
    }

    /// A corrupt file is replaced by an empty one, so purging always leaves a
    /// writable record behind.
    #[instrument(skip(self))]
    fn remove(&self, key: &str) -> Result<(), Error> {
        let _guard = self.lock.lock();
        let mut entries = match self.load() {
            Ok(entries) => entries,
            Err(err @ Error::Corrupt { .. }) => {
                warn!("Resetting state file: {err}");
                return self.store(&BTreeMap::new());
            }
            Err(err) => return Err(err),
        };
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.store(&entries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_missing_file_reads_as_empty() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path().join("state.json"));
        assert_eq!(storage.get("token")?, None);
        storage.remove("token")?;
        assert!(!storage.path().exists());
        Ok(())
    }

    #[test]
    fn test_values_survive_reopen() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("state.json");

        let storage = FileStorage::new(&path);
        storage.set("token", "a.b.c")?;
        storage.set("themeMode", "light")?;
        drop(storage);

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get("token")?.as_deref(), Some("a.b.c"));
        assert_eq!(reopened.get("themeMode")?.as_deref(), Some("light"));

        reopened.remove("token")?;
        assert_eq!(reopened.get("token")?, None);
        assert_eq!(reopened.get("themeMode")?.as_deref(), Some("light"));
        assert!(!path.with_extension("tmp").exists());
        Ok(())
    }

    #[test]
    fn test_corrupt_file_is_reported() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json")?;

        let storage = FileStorage::new(&path);
        let err = storage.get("token").unwrap_err();
        assert!(matches!(err, Error::Corrupt { .. }));
        Ok(())
    }

    #[test]
    fn test_remove_resets_corrupt_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json")?;

        let storage = FileStorage::new(&path);
        storage.remove("token")?;
        assert_eq!(storage.get("token")?, None);
        assert_eq!(storage.get("user")?, None);

        storage.set("token", "a.b.c")?;
        assert_eq!(storage.get("token")?.as_deref(), Some("a.b.c"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_state_file_is_private() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("state.json");
        FileStorage::new(&path).set("token", "secret")?;

        let mode = fs::metadata(&path)?.permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        Ok(())
    }
}
