//! File operations

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tokio::fs;
use tokio::io::AsyncReadExt;

use crate::errors::NotifierError;

/// A file wrapper with path
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
}

impl File {
    /// Create a new file reference
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the file exists
    pub async fn exists(&self) -> bool {
        fs::metadata(&self.path).await.is_ok()
    }

    /// Read file contents as string
    pub async fn read_string(&self) -> Result<String, NotifierError> {
        let mut file = fs::File::open(&self.path).await?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).await?;
        Ok(contents)
    }

    /// Read file as JSON
    pub async fn read_json<T: DeserializeOwned>(&self) -> Result<T, NotifierError> {
        let contents = self.read_string().await?;
        let value = serde_json::from_str(&contents)?;
        Ok(value)
    }

    /// Whether group or others can read the file.
    ///
    /// Always `false` on non-Unix platforms.
    pub async fn is_shared(&self) -> Result<bool, NotifierError> {
        let meta = fs::metadata(&self.path).await?;
        Ok(readable_by_others(&meta.permissions()))
    }
}

#[cfg(unix)]
fn readable_by_others(perms: &std::fs::Permissions) -> bool {
    use std::os::unix::fs::PermissionsExt;
    perms.mode() & 0o044 != 0
}

#[cfg(not(unix))]
fn readable_by_others(_perms: &std::fs::Permissions) -> bool {
    false
}
