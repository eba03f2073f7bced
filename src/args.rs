use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

/// Command-line arguments for tile-pack
#[derive(Debug, Default)]
pub struct Args {
    /// Path to the BOSH release tarball
    pub release: PathBuf,

    /// Echo executed commands
    pub verbose: bool,

    /// Directory receiving metadata.yml and the product archive
    pub work_dir: Option<PathBuf>,

    /// Configuration file
    pub config: Option<PathBuf>,

    /// Metadata template merged into the generated manifest
    pub template: Option<PathBuf>,

    /// Product archive filename
    pub product: Option<String>,

    /// Manifest generator program
    pub generator: Option<String>,

    /// External interpolator program
    pub interpolator: Option<String>,

    /// External zip program
    pub archiver: Option<String>,

    /// Store an empty placeholder instead of the release tarball
    pub placeholder: bool,
}

fn command() -> Command {
    Command::new("tile-pack")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Assemble a BOSH release and generated metadata into a product archive")
        .arg(
            Arg::new("release")
                .value_name("RELEASE")
                .required(true)
                .help("Path to the release tarball (<name>-<version>.tgz)")
        )
        .arg(
            Arg::new("work-dir")
                .short('C')
                .long("work-dir")
                .value_name("DIR")
                .help("Directory receiving metadata.yml and the product archive [default: current directory]")
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file [default: tile-pack.toml in the working directory, if present]")
        )
        .arg(
            Arg::new("template")
                .short('t')
                .long("template")
                .value_name("FILE")
                .help("Metadata template merged into the generated manifest")
        )
        .arg(
            Arg::new("product")
                .short('o')
                .long("product")
                .value_name("NAME")
                .help("Product archive filename; $RELEASE_NAME and $RELEASE_VERSION are expanded")
        )
        .arg(
            Arg::new("generator")
                .long("generator")
                .value_name("PROGRAM")
                .env("TILE_PACK_GENERATOR")
                .help("Manifest generator invoked as `PROGRAM generate --path .. --merge ..`")
        )
        .arg(
            Arg::new("interpolator")
                .long("interpolator")
                .value_name("PROGRAM")
                .help("External interpolator invoked as `PROGRAM int TEMPLATE -v key=value..` [default: built-in]")
        )
        .arg(
            Arg::new("archiver")
                .long("archiver")
                .value_name("PROGRAM")
                .help("External zip program invoked as `PROGRAM -r OUTPUT migrations releases metadata` [default: built-in]")
        )
        .arg(
            Arg::new("placeholder")
                .long("placeholder")
                .action(ArgAction::SetTrue)
                .help("Store an empty placeholder instead of copying the release (also enabled by a non-empty DEBUG)")
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable verbose output")
        )
}

impl Args {
    /// Parse command-line arguments
    pub fn parse() -> Self {
        Self::from_matches(&command().get_matches())
    }

    #[cfg(test)]
    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::from_matches(&command().get_matches_from(itr))
    }

    fn from_matches(matches: &clap::ArgMatches) -> Self {
        let path = |id: &str| matches.get_one::<String>(id).map(PathBuf::from);
        let string = |id: &str| matches.get_one::<String>(id).cloned();

        Self {
            release: path("release").unwrap_or_default(),
            verbose: matches.get_flag("verbose"),
            work_dir: path("work-dir"),
            config: path("config"),
            template: path("template"),
            product: string("product"),
            generator: string("generator"),
            interpolator: string("interpolator"),
            archiver: string("archiver"),
            placeholder: matches.get_flag("placeholder"),
        }
    }
}
