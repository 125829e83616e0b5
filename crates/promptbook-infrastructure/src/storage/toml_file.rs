//! Typed TOML documents stored through [`AtomicFile`].

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use promptbook_core::error::Result;

use super::atomic_file::{AtomicFile, FileLock};

/// A TOML file that deserializes into `T`.
pub struct TomlFile<T> {
    file: AtomicFile,
    _phantom: PhantomData<T>,
}

impl<T> TomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicFile::new(path),
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Loads the document, `None` if the file is missing or blank.
    pub fn load(&self) -> Result<Option<T>> {
        match self.file.read_to_string()? {
            Some(content) => Ok(Some(toml::from_str(&content)?)),
            None => Ok(None),
        }
    }

    pub fn save(&self, data: &T) -> Result<()> {
        let toml_string = toml::to_string_pretty(data)?;
        self.file.write(toml_string.as_bytes())
    }

    /// Read-modify-write under the file lock.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<T>
    where
        F: FnOnce(&mut T),
    {
        let _lock = FileLock::acquire(self.file.path())?;
        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data);

        let toml_string = toml::to_string_pretty(&data)?;
        super::atomic_file::write_atomic(self.file.path(), toml_string.as_bytes())?;
        Ok(data)
    }
}
