use crate::error::Error;
use crate::result::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const RELEASE_EXTENSION: &str = ".tgz";

static SEMVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\.[0-9]+\.[0-9]+").expect("semver pattern is valid"));

/// A BOSH release tarball and the naming facts derived from its filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseFile {
    /// Path as given on the command line
    pub path: PathBuf,
    /// Basename including the `.tgz` extension
    pub filename: String,
    /// Text before the first hyphen
    pub name: String,
    /// First `major.minor.patch` found in the basename
    pub version: String,
}

impl ReleaseFile {
    /// Derive name and version from the basename of `path`.
    ///
    /// Only the filename is inspected; the file itself is not opened.
    pub fn parse(path: &Path) -> Result<Self> {
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .ok_or_else(|| Error::invalid_release(path.display().to_string(), "no filename"))?
            .to_string();

        let stem = filename
            .strip_suffix(RELEASE_EXTENSION)
            .ok_or_else(|| Error::invalid_release(&filename, "expected a .tgz release tarball"))?;

        let name = stem.split('-').next().unwrap_or_default();
        if name.is_empty() {
            return Err(Error::invalid_release(&filename, "release name is empty"));
        }

        let version = SEMVER
            .find(stem)
            .ok_or_else(|| {
                Error::invalid_release(&filename, "no version matching MAJOR.MINOR.PATCH")
            })?
            .as_str()
            .to_string();

        Ok(Self {
            path: path.to_path_buf(),
            name: name.to_string(),
            version,
            filename,
        })
    }

    /// Basename without the `.tgz` extension
    pub fn stem(&self) -> &str {
        self.filename
            .strip_suffix(RELEASE_EXTENSION)
            .unwrap_or(&self.filename)
    }

    /// Variables merged into the metadata template, in a fixed order
    pub fn variables(&self) -> [(&'static str, &str); 3] {
        [
            ("bosh_release_name", self.name.as_str()),
            ("bosh_release_filename", self.filename.as_str()),
            ("bosh_release_version", self.version.as_str()),
        ]
    }
}
