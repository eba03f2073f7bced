use crate::cmd;
use crate::config::Archiver;
use crate::context::Context;
use crate::error::Error;
use crate::result::Result;
use crate::staging::TOP_LEVEL;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Remove a previous product archive, ignoring any failure
pub fn remove_existing(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => log::debug!("removed previous archive {}", path.display()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => log::debug!("ignoring failure to remove {}: {}", path.display(), err),
    }
}

/// Archive the staging tree into `output_path`.
///
/// Entries are named relative to `source_dir`. The archive is assembled in a
/// scratch directory beside `output_path` and renamed into place only once
/// complete, so a failure never leaves a truncated archive at the target.
pub fn create(
    ctx: &Context,
    archiver: &Archiver,
    source_dir: &Path,
    output_path: &Path,
) -> Result<()> {
    let parent = output_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let filename = output_path
        .file_name()
        .ok_or_else(|| Error::custom(format!("invalid archive path {}", output_path.display())))?;

    let scratch = tempfile::Builder::new()
        .prefix(".tile-pack-")
        .tempdir_in(parent)?;
    let partial = std::path::absolute(scratch.path().join(filename))?;

    match archiver {
        Archiver::Builtin => create_zip_file(source_dir, &partial)?,
        Archiver::External { program } => {
            let mut args: Vec<OsString> = vec!["-r".into(), partial.clone().into()];
            args.extend(TOP_LEVEL.into_iter().map(OsString::from));
            cmd::execute_in(ctx, source_dir, program, &args)?;
            if !partial.is_file() {
                return Err(Error::CommandFailed(format!(
                    "{} did not create {}",
                    program,
                    partial.display()
                )));
            }
        }
    }

    fs::rename(&partial, output_path)?;
    Ok(())
}

/// Zip entry name for a path relative to the archive root, always `/`-separated
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn create_zip_file(source_dir: &Path, output_path: &Path) -> Result<()> {
    let file = File::create(output_path)?;
    let mut zip = ZipWriter::new(file);

    let dir_options = SimpleFileOptions::default().unix_permissions(0o755);
    let file_options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for top in TOP_LEVEL {
        for entry in WalkDir::new(source_dir.join(top)).sort_by_file_name() {
            let entry = entry?;
            let relative = entry.path().strip_prefix(source_dir).map_err(|_| {
                Error::custom(format!(
                    "{} is outside {}",
                    entry.path().display(),
                    source_dir.display()
                ))
            })?;
            let name = entry_name(relative);

            if entry.file_type().is_dir() {
                zip.add_directory(format!("{}/", name), dir_options)?;
            } else {
                zip.start_file(name, file_options)?;
                let mut f = File::open(entry.path())?;
                io::copy(&mut f, &mut zip)?;
            }
        }
    }

    zip.finish()?;
    Ok(())
}
