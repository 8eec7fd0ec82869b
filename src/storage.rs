//! Upload intake
//!
//! Uploaded files are written to a single directory under the client's
//! filename. Same-name uploads overwrite each other.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ProfitError, ProfitResult};

/// Where uploads land unless configured otherwise
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";

#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl Default for UploadStore {
    fn default() -> Self {
        Self::new(DEFAULT_UPLOAD_DIR)
    }
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ensure_dir(&self) -> ProfitResult<()> {
        fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Target path for a client filename.
    ///
    /// Only the final path component is kept, so `../x.csv` and
    /// `C:\tmp\x.csv` both land as `x.csv` inside the upload directory.
    pub fn resolve(&self, filename: &str) -> ProfitResult<PathBuf> {
        let name = filename.rsplit(['/', '\\']).next().unwrap_or("").trim();

        if name.is_empty() || name == "." || name == ".." {
            return Err(ProfitError::Upload(format!(
                "invalid upload filename '{}'",
                filename
            )));
        }

        Ok(self.dir.join(name))
    }

    /// Persist an upload, replacing any previous file with the same name
    pub fn save(&self, filename: &str, bytes: &[u8]) -> ProfitResult<PathBuf> {
        let path = self.resolve(filename)?;
        self.ensure_dir()?;
        fs::write(&path, bytes)?;
        debug!(path = %path.display(), bytes = bytes.len(), "upload stored");
        Ok(path)
    }
}
