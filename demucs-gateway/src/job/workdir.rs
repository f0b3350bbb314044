//! Per-job working directory
//!
//! Holds the upload side-channel file and receives the tool's output. The
//! directory lives exactly as long as the [`JobDir`] value; dropping it
//! removes the tree on every exit path, error returns and panics included.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::TempDir;
use tracing::debug;

use super::request::{JobSpec, ProjectId};

/// Directory name prefix for job directories
pub const JOB_DIR_PREFIX: &str = "demucs-cerebrium-";

/// Side-channel file read by the separation tool
pub const UPLOAD_CONFIG_FILE: &str = "r2_config.json";

/// Upload target handed to the tool
#[derive(Debug, Serialize)]
struct UploadTarget<'a> {
    upload_token: &'a str,
    worker_url: &'a str,
    id_projet: Option<&'a ProjectId>,
}

/// Scoped temporary job directory
#[derive(Debug)]
pub struct JobDir {
    dir: TempDir,
}

impl JobDir {
    /// Create a uniquely named directory under `root`
    pub fn create_in(root: &Path) -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix(JOB_DIR_PREFIX).tempdir_in(root)?;
        debug!(dir = %dir.path().display(), "Created job directory");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `r2_config.json` for the tool
    pub fn write_upload_config(&self, spec: &JobSpec) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(UPLOAD_CONFIG_FILE);
        let target = UploadTarget {
            upload_token: &spec.upload_token,
            worker_url: &spec.worker_url,
            id_projet: spec.id_projet.as_ref(),
        };

        let mut file = std::fs::File::create(&path)?;
        serde_json::to_writer(&mut file, &target)?;
        file.flush()?;
        Ok(path)
    }

    /// Remove the directory now, logging (but otherwise ignoring) failures
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        match self.dir.close() {
            Ok(()) => debug!(dir = %path.display(), "Removed job directory"),
            Err(e) => debug!(dir = %path.display(), "Ignoring job directory removal error: {}", e),
        }
    }
}
