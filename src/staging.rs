use crate::config::ReleaseMode;
use crate::release::ReleaseFile;
use crate::result::Result;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const METADATA_DIR: &str = "metadata";
pub const RELEASES_DIR: &str = "releases";
pub const MIGRATIONS_DIR: &str = "migrations";
pub const METADATA_FILENAME: &str = "metadata.yml";

/// Top-level archive directories, in the order they are archived
pub const TOP_LEVEL: [&str; 3] = [MIGRATIONS_DIR, RELEASES_DIR, METADATA_DIR];

/// Temporary product layout; removed from disk when dropped
pub struct Staging {
    dir: TempDir,
}

impl Staging {
    /// Create a fresh staging tree with `metadata/`, `releases/` and `migrations/v1/`
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("tile-pack-").tempdir()?;
        fs::create_dir_all(dir.path().join(METADATA_DIR))?;
        fs::create_dir_all(dir.path().join(RELEASES_DIR))?;
        fs::create_dir_all(dir.path().join(MIGRATIONS_DIR).join("v1"))?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write the generated manifest to `metadata/metadata.yml`
    pub fn write_metadata(&self, manifest: &str) -> Result<PathBuf> {
        let path = self.root().join(METADATA_DIR).join(METADATA_FILENAME);
        fs::write(&path, manifest)?;
        Ok(path)
    }

    /// Place the release under `releases/`, copied or as an empty placeholder
    pub fn add_release(&self, release: &ReleaseFile, mode: ReleaseMode) -> Result<PathBuf> {
        let path = self.root().join(RELEASES_DIR).join(&release.filename);
        match mode {
            ReleaseMode::Copy => {
                fs::copy(&release.path, &path)?;
            }
            ReleaseMode::Placeholder => {
                File::create(&path)?;
            }
        }
        Ok(path)
    }
}
