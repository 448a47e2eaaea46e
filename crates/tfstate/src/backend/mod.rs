//! State document retrieval

pub mod file;
pub mod http;

use crate::error::Result;
use crate::location::{BackendKind, StateLocation};

pub use file::FileBackend;
pub use http::HttpBackend;

/// Fetches the raw bytes of a state document.
pub trait Backend: Send + Sync {
    /// Read the whole document.
    fn read(&self) -> Result<Vec<u8>>;
}

/// Backend serving a location.
pub fn for_location(location: &StateLocation) -> Box<dyn Backend> {
    match location.url() {
        Some(url) => Box::new(HttpBackend::new(url)),
        None => {
            debug_assert_eq!(location.kind(), BackendKind::File);
            Box::new(FileBackend::new(location.path()))
        }
    }
}
