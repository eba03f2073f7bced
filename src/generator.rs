use crate::cmd;
use crate::config::{Interpolator, Settings};
use crate::context::Context;
use crate::error::Error;
use crate::release::ReleaseFile;
use crate::result::Result;
use crate::tpl::Tpl;
use std::ffi::OsString;
use std::fs;
use std::io::Write;

/// Substitute the release variables into the metadata template
pub fn merge_document(ctx: &Context, settings: &Settings, release: &ReleaseFile) -> Result<String> {
    if !settings.template.is_file() {
        return Err(Error::TemplateNotFound(settings.template.clone()));
    }

    match &settings.interpolator {
        Interpolator::Builtin => {
            let content = fs::read_to_string(&settings.template)?;
            let mut tpl = Tpl::new();
            for (key, value) in release.variables() {
                tpl.register(key, value);
            }
            Ok(tpl.interpolate(&content))
        }
        Interpolator::External { program } => {
            let mut args: Vec<OsString> = vec!["int".into(), settings.template.clone().into()];
            for (key, value) in release.variables() {
                args.push("-v".into());
                args.push(format!("{}={}", key, value).into());
            }
            cmd::execute_with_output(ctx, program, &args)
        }
    }
}

/// Run the manifest generator against the release and return the manifest text.
///
/// The merge document travels through a temporary file that is removed
/// once the generator exits.
pub fn generate(ctx: &Context, settings: &Settings, release: &ReleaseFile) -> Result<String> {
    let merge = merge_document(ctx, settings, release)?;

    let mut merge_file = tempfile::Builder::new()
        .prefix("tile-pack-merge-")
        .suffix(".yml")
        .tempfile()?;
    merge_file.write_all(merge.as_bytes())?;
    merge_file.flush()?;

    let args: Vec<OsString> = vec![
        "generate".into(),
        "--path".into(),
        release.path.clone().into(),
        "--merge".into(),
        merge_file.path().into(),
    ];
    let manifest = cmd::execute_with_output(ctx, &settings.generator, &args)?;

    if manifest.trim().is_empty() {
        return Err(Error::CommandFailed(format!(
            "{} produced an empty manifest",
            settings.generator
        )));
    }

    Ok(manifest)
}
