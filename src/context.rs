use std::path::{Path, PathBuf};

/// Context passed throughout the application containing global configuration
#[derive(Clone)]
pub struct Context {
    /// Echo executed commands and their output
    pub verbose: bool,

    /// Directory receiving `metadata.yml` and the product archive
    pub work_dir: PathBuf,
}

impl Context {
    pub fn new(work_dir: PathBuf, verbose: bool) -> Self {
        Self { verbose, work_dir }
    }

    /// Resolve `path` against the working directory unless it is absolute
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.work_dir.join(path)
        }
    }
}
