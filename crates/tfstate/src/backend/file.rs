//! Local state files

use super::Backend;
use crate::error::{Error, Result};
use std::path::PathBuf;

pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Backend for FileBackend {
    fn read(&self) -> Result<Vec<u8>> {
        log::debug!("reading state file {}", self.path.display());
        std::fs::read(&self.path).map_err(|source| Error::Read {
            path: self.path.clone(),
            source,
        })
    }
}
