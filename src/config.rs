use crate::args::Args;
use crate::context::Context;
use crate::error::Error;
use crate::result::Result;
use crate::staging::METADATA_FILENAME;
use serde::Deserialize;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "tile-pack.toml";
pub const DEFAULT_TEMPLATE: &str = "example/metadata.yml";
pub const DEFAULT_PRODUCT: &str = "example-0.0-build.0.pivotal";
pub const DEFAULT_GENERATOR: &str = "tile-builder";

/// Contents of `tile-pack.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub template: Option<PathBuf>,

    #[serde(default)]
    pub product: Option<String>,

    #[serde(default)]
    pub generator: Option<String>,

    #[serde(default)]
    pub interpolator: Option<String>,

    #[serde(default)]
    pub archiver: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| Error::Config {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        toml::from_str(&content).map_err(|err| Error::Config {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }
}

/// How the release tarball lands in `releases/`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseMode {
    /// Byte-for-byte copy of the tarball
    Copy,
    /// Empty file carrying the tarball's name
    Placeholder,
}

impl ReleaseMode {
    /// Interpret the raw `DEBUG` environment value.
    ///
    /// Any non-empty value selects placeholder mode, `DEBUG=false` included.
    pub fn from_debug_env(value: Option<&OsStr>) -> Self {
        match value {
            Some(v) if !v.is_empty() => ReleaseMode::Placeholder,
            _ => ReleaseMode::Copy,
        }
    }
}

/// Where merge variables get substituted into the metadata template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpolator {
    Builtin,
    External { program: String },
}

/// Which facility writes the product archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Archiver {
    Builtin,
    External { program: String },
}

/// Fully resolved settings for one packaging run
#[derive(Debug, Clone)]
pub struct Settings {
    pub template: PathBuf,
    /// Product filename, possibly containing `$RELEASE_NAME` / `$RELEASE_VERSION`
    pub product: String,
    pub generator: String,
    pub interpolator: Interpolator,
    pub archiver: Archiver,
    pub release_mode: ReleaseMode,
}

impl Settings {
    /// Merge CLI arguments over the configuration file over defaults.
    ///
    /// An explicit `--config` must exist; the implicit `tile-pack.toml` is optional.
    pub fn resolve(ctx: &Context, args: &Args, debug: Option<&OsStr>) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(&ctx.resolve(path))?,
            None => {
                let implicit = ctx.work_dir.join(CONFIG_FILENAME);
                if implicit.is_file() {
                    FileConfig::load(&implicit)?
                } else {
                    FileConfig::default()
                }
            }
        };

        let template = args
            .template
            .clone()
            .or(file.template)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE));
        let template = ctx.resolve(&template);
        if overwrites_output(&template, &ctx.work_dir.join(METADATA_FILENAME)) {
            return Err(Error::custom(format!(
                "template {} would be overwritten by the generated {}",
                template.display(),
                METADATA_FILENAME
            )));
        }

        let product = args
            .product
            .clone()
            .or(file.product)
            .unwrap_or_else(|| DEFAULT_PRODUCT.to_string());
        if product.is_empty() || product.contains(['/', '\\']) {
            return Err(Error::custom(format!(
                "product filename must be a plain file name, got `{}`",
                product
            )));
        }

        let generator = args
            .generator
            .clone()
            .or(file.generator)
            .unwrap_or_else(|| DEFAULT_GENERATOR.to_string());

        let interpolator = match args.interpolator.clone().or(file.interpolator) {
            Some(program) => Interpolator::External { program },
            None => Interpolator::Builtin,
        };

        let archiver = match args.archiver.clone().or(file.archiver) {
            Some(program) => Archiver::External { program },
            None => Archiver::Builtin,
        };

        let release_mode = if args.placeholder {
            ReleaseMode::Placeholder
        } else {
            ReleaseMode::from_debug_env(debug)
        };

        Ok(Self {
            template,
            product,
            generator,
            interpolator,
            archiver,
            release_mode,
        })
    }
}

/// Whether `template` and `output` name the same file, lexically or on disk
fn overwrites_output(template: &Path, output: &Path) -> bool {
    if template == output {
        return true;
    }
    match (fs::canonicalize(template), fs::canonicalize(output)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
