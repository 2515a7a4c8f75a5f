//! Filesystem infrastructure: implements `ProjectFs`.

use std::path::Path;

use crate::application::ports::ProjectFs;

/// Production filesystem implementation of `ProjectFs`.
pub struct LocalFs;

impl ProjectFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
