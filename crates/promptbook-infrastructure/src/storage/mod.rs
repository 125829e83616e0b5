//! File storage primitives shared by the repositories.

mod atomic_file;
mod toml_file;

pub use atomic_file::{AtomicFile, FileLock, write_atomic};
pub use toml_file::TomlFile;
