use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Custom(String),

    #[error("invalid release filename `{filename}`: {reason}")]
    InvalidReleaseFilename { filename: String, reason: String },

    #[error("release not found: {}", .0.display())]
    ReleaseNotFound(PathBuf),

    #[error("metadata template not found: {}", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("{0}")]
    CommandFailed(String),

    #[error("unable to run `{program}`: {source}")]
    CommandSpawn {
        program: String,
        source: std::io::Error,
    },

    #[error("invalid configuration in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

impl Error {
    pub fn custom<T: Into<String>>(msg: T) -> Self {
        Error::Custom(msg.into())
    }

    pub fn invalid_release<F: Into<String>, R: Into<String>>(filename: F, reason: R) -> Self {
        Error::InvalidReleaseFilename {
            filename: filename.into(),
            reason: reason.into(),
        }
    }
}
