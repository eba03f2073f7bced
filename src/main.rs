mod archive;
mod args;
mod cmd;
mod config;
mod context;
mod error;
mod generator;
mod package;
mod release;
mod result;
mod staging;
mod tpl;

#[cfg(test)]
mod test_utils;

use args::Args;
use config::{Archiver, Interpolator, ReleaseMode, Settings};
use context::Context;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> result::Result<()> {
    let args = Args::parse();

    let work_dir = match &args.work_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    let ctx = Context::new(work_dir, args.verbose);

    // DEBUG is read raw: any non-empty value means placeholder mode.
    let debug = std::env::var_os("DEBUG");
    let settings = Settings::resolve(&ctx, &args, debug.as_deref())?;

    cliclack::intro("tile-pack")?;

    if settings.release_mode == ReleaseMode::Placeholder {
        cliclack::log::warning(
            "Placeholder mode: releases/ will contain an empty file instead of the tarball",
        )?;
    }
    if ctx.verbose {
        cliclack::log::remark(format!(
            "template: {}\ngenerator: {}\ninterpolator: {}\narchiver: {}",
            settings.template.display(),
            settings.generator,
            match &settings.interpolator {
                Interpolator::Builtin => "built-in",
                Interpolator::External { program } => program.as_str(),
            },
            match &settings.archiver {
                Archiver::Builtin => "built-in",
                Archiver::External { program } => program.as_str(),
            },
        ))?;
    }

    let output = package::package(&ctx, &settings, &args.release)?;

    cliclack::log::success(format!(
        "Packaged {} {}; metadata written to {}",
        output.release.name,
        output.release.version,
        output.metadata_path.display()
    ))?;
    cliclack::outro(format!("Product created: {}", output.product_path.display()))?;
    Ok(())
}
